use rand::Rng;
use tracing::{debug, info, instrument};

use crate::{
    error::PreflightError,
    heuristic::{heuristic::Heuristic, heuristic_tournament::batch_heuristic},
    params::PreflightParams,
    sub_problem::SubProblem,
};

use super::variation_generator::generate_matrix;

/// Result of an expansion: problems that pass through as submitted and the
/// sub-problems derived from the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    pub untouched: Vec<SubProblem>,
    pub expanded: Vec<SubProblem>,
}

pub struct ProblemExpander<'a> {
    params: &'a PreflightParams,
}

impl<'a> ProblemExpander<'a> {
    pub fn new(params: &'a PreflightParams) -> Self {
        ProblemExpander { params }
    }

    #[instrument(skip_all, level = "debug")]
    pub fn expand<R>(
        &self,
        sub_problems: Vec<SubProblem>,
        rng: &mut R,
    ) -> Result<Expansion, PreflightError>
    where
        R: Rng,
    {
        if sub_problems
            .iter()
            .any(|sub_problem| sub_problem.problem.configuration.resolution.repetition > 1)
        {
            if sub_problems.len() > 1 {
                return Err(PreflightError::DiscordantProblem(sub_problems.len()));
            }

            let expanded = sub_problems
                .first()
                .map(|sub_problem| self.repeat(sub_problem))
                .unwrap_or_default();

            info!(repetitions = expanded.len(), "problem repeated");
            return Ok(Expansion {
                untouched: vec![],
                expanded,
            });
        }

        let mut expansion = Expansion::default();
        let mut batched = vec![];

        for sub_problem in sub_problems {
            let resolution = &sub_problem.problem.configuration.resolution;

            if let Some(solutions) = resolution.several_solutions.filter(|&count| count > 0) {
                expansion
                    .expanded
                    .extend(self.several_solutions(&sub_problem, solutions, rng));
            } else if resolution.batch_heuristic {
                batched.extend(batch_heuristic(&sub_problem, &Heuristic::ALL));
            } else {
                expansion.untouched.push(sub_problem);
            }
        }

        expansion.expanded.append(&mut batched);

        info!(
            untouched = expansion.untouched.len(),
            expanded = expansion.expanded.len(),
            "problems expanded"
        );

        Ok(expansion)
    }

    /// Independent copies of `sub_problem`, one per requested repetition.
    fn repeat(&self, sub_problem: &SubProblem) -> Vec<SubProblem> {
        let repetition = sub_problem.problem.configuration.resolution.repetition;

        (0..repetition)
            .map(|_| {
                let mut repeated = sub_problem.clone();
                repeated.problem.configuration.resolution.repetition = 1;
                for partition in repeated
                    .problem
                    .configuration
                    .preprocessing
                    .partitions
                    .iter_mut()
                {
                    partition.restarts = Some(self.params.repetition_partition_restarts);
                }
                repeated
            })
            .collect()
    }

    fn several_solutions<R>(
        &self,
        sub_problem: &SubProblem,
        solutions: usize,
        rng: &mut R,
    ) -> Vec<SubProblem>
    where
        R: Rng,
    {
        (0..solutions)
            .map(|index| self.variate(sub_problem.clone(), index, rng))
            .collect()
    }

    /// Variant `index` of a several solutions request. The first variant keeps
    /// the exact time grid as costing matrix, the others get a perturbed one.
    fn variate<R>(&self, mut variant: SubProblem, index: usize, rng: &mut R) -> SubProblem
    where
        R: Rng,
    {
        let problem = &mut variant.problem;
        let variation_ratio = problem
            .configuration
            .resolution
            .variation_ratio
            .map(|ratio| ratio.min(self.params.max_variation_ratio));

        match variation_ratio {
            Some(ratio) if index > 0 => generate_matrix(problem, ratio, rng),
            _ => {
                if let Some(matrix) = problem.matrices.first_mut() {
                    matrix.value = matrix.time.clone();
                }
            }
        }

        for vehicle in problem.vehicles.iter_mut() {
            vehicle.cost_time_multiplier = 0.0;
            vehicle.cost_distance_multiplier = 0.0;
            vehicle.cost_value_multiplier = 1.0;
        }

        if let Some(name) = problem.name.as_mut() {
            name.push_str(&format!("_{index}"));
        }

        problem.configuration.restitution.allow_empty_result = true;
        problem.configuration.resolution.several_solutions = None;

        debug!(index, ?variation_ratio, "generated problem variant");
        variant
    }
}
