use jiff::{SignedDuration, Timestamp};
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::{
    admission::backend::Backend,
    error::PreflightError,
    params::PreflightParams,
    problem::vehicle_routing_problem::VehicleRoutingProblem,
    sub_problem::{SolveEntryPoint, SolveResult, SubProblem},
};

use super::{
    heuristic::{FirstSolutionStrategy, Heuristic},
    heuristic_selector::select_best_heuristic,
    synthesis::SynthesisRecord,
};

/// Candidate heuristics for a problem. Self-selection yields the selector's
/// pick plus alternates, any other strategy list is taken as is.
pub fn collect_heuristics(problem: &VehicleRoutingProblem) -> Vec<Heuristic> {
    let strategies = problem.first_solution_strategy();

    if strategies.first() != Some(&FirstSolutionStrategy::SELF_SELECTION) {
        return strategies
            .iter()
            .filter_map(FirstSolutionStrategy::heuristic)
            .collect();
    }

    let mandatory = select_best_heuristic(problem);
    let mut heuristics = if problem.vehicles.iter().any(|vehicle| vehicle.forces_start()) {
        vec![
            mandatory,
            Heuristic::LocalCheapestInsertion,
            Heuristic::GlobalCheapestArc,
        ]
    } else if matches!(
        mandatory,
        Heuristic::Savings | Heuristic::ParallelCheapestInsertion
    ) {
        vec![
            mandatory,
            Heuristic::GlobalCheapestArc,
            Heuristic::LocalCheapestInsertion,
        ]
    } else {
        vec![mandatory]
    };

    // The selector underrates savings on problems with rests
    if problem.total_rests() > 0 {
        heuristics.push(Heuristic::Savings);
    }

    let mut unique = Vec::with_capacity(heuristics.len());
    for heuristic in heuristics {
        if !unique.contains(&heuristic) {
            unique.push(heuristic);
        }
    }

    unique
}

/// One independent copy of `sub_problem` per heuristic, each pinned to it.
pub fn batch_heuristic(sub_problem: &SubProblem, heuristics: &[Heuristic]) -> Vec<SubProblem> {
    heuristics
        .iter()
        .map(|&heuristic| {
            let mut candidate = sub_problem.clone();
            candidate
                .problem
                .set_first_solution_strategy(vec![heuristic.into()]);
            candidate
                .problem
                .configuration
                .restitution
                .allow_empty_result = true;
            candidate
        })
        .collect()
}

/// Time given to each of `candidates` heuristics out of the configured
/// resolution duration.
pub fn candidate_duration(
    duration: Option<SignedDuration>,
    candidates: usize,
    params: &PreflightParams,
) -> SignedDuration {
    let Some(duration) = duration else {
        return params.max_candidate_duration;
    };

    let tournament_millis = duration.as_millis() as f64 * params.tournament_time_ratio;
    let allocated = SignedDuration::from_millis((tournament_millis / candidates as f64) as i64);

    allocated.min(params.max_candidate_duration)
}

pub struct HeuristicTournament<'a, S>
where
    S: SolveEntryPoint,
{
    solver: &'a S,
    params: &'a PreflightParams,
}

impl<'a, S> HeuristicTournament<'a, S>
where
    S: SolveEntryPoint,
{
    pub fn new(solver: &'a S, params: &'a PreflightParams) -> Self {
        HeuristicTournament { solver, params }
    }

    /// Backend hook: runs the heuristic selection when the backend builds its
    /// own first solution.
    pub fn custom_heuristics(&self, sub_problem: SubProblem) -> Result<SubProblem, PreflightError> {
        if sub_problem.backend == Backend::Vroom {
            return Ok(sub_problem);
        }

        let strategies = sub_problem.problem.first_solution_strategy();
        if strategies.is_empty() || sub_problem.problem.strategy_includes_periodic() {
            Ok(sub_problem)
        } else {
            self.find_best_heuristic(sub_problem)
        }
    }

    #[instrument(skip_all, level = "debug")]
    pub fn find_best_heuristic(
        &self,
        mut sub_problem: SubProblem,
    ) -> Result<SubProblem, PreflightError> {
        let started_at = Timestamp::now();
        let heuristics = collect_heuristics(&sub_problem.problem);

        if heuristics.len() <= 1 {
            if !heuristics.is_empty() {
                sub_problem.problem.set_first_solution_strategy(
                    heuristics.into_iter().map(FirstSolutionStrategy::from).collect(),
                );
            }
            return Ok(sub_problem);
        }

        let resolution_duration = sub_problem.problem.configuration.resolution.duration;
        let allocated = candidate_duration(resolution_duration, heuristics.len(), self.params);

        let mut candidates = batch_heuristic(&sub_problem, &heuristics);
        for candidate in candidates.iter_mut() {
            let resolution = &mut candidate.problem.configuration.resolution;
            resolution.batch_heuristic = true;
            resolution.initial_time_out = None;
            resolution.min_duration = None;
            resolution.duration = Some(allocated);
        }

        debug!(
            candidates = heuristics.len(),
            allocated = %allocated,
            "running heuristic tournament"
        );

        let dispatched_at = Timestamp::now();
        let outcomes = candidates
            .par_iter()
            .map(|candidate| {
                let dispatched_at = Timestamp::now();
                let result = self.solver.solve(candidate);
                let time_spent = match &result {
                    Some(result) => result.elapsed,
                    None => Timestamp::now().duration_since(dispatched_at),
                };
                (result, time_spent)
            })
            .collect::<Vec<_>>();

        if outcomes.iter().all(|(result, _)| result.is_none()) {
            warn!("no heuristic candidate produced a solution");
            return Err(PreflightError::NoSolution);
        }

        let mut synthesis = heuristics
            .iter()
            .zip(outcomes.iter())
            .map(|(&heuristic, (result, time_spent))| SynthesisRecord {
                heuristic,
                quality: result
                    .as_ref()
                    .map(|result| result.cost + time_spent.as_secs() as f64),
                cost: result.as_ref().map(|result| result.cost),
                time_spent: *time_spent,
                used: false,
            })
            .collect::<Vec<_>>();

        let winner = best_candidate(&synthesis);
        synthesis[winner].used = true;

        for record in synthesis.iter().filter(|record| record.quality.is_none()) {
            warn!(heuristic = %record.heuristic, "heuristic candidate produced no solution");
        }

        let best_heuristic = synthesis[winner].heuristic;
        let total_time_spent = tournament_time_spent(
            Timestamp::now().duration_since(dispatched_at),
            outcomes.iter().map(|(_, time_spent)| *time_spent),
        );

        let problem = &mut sub_problem.problem;
        problem.configuration.preprocessing.heuristic_result = outcomes[winner]
            .0
            .clone()
            .map(prefix_solvers);
        problem.configuration.preprocessing.heuristic_synthesis = synthesis;
        problem.configuration.resolution.batch_heuristic = false;
        problem.set_first_solution_strategy(vec![best_heuristic.into()]);
        problem.configuration.resolution.duration =
            resolution_duration.map(|duration| remaining_duration(duration, total_time_spent));

        info!(
            heuristic = %best_heuristic,
            elapsed = %Timestamp::now().duration_since(started_at),
            "find_best_heuristic"
        );

        Ok(sub_problem)
    }
}

/// Index of the minimal quality record. Failed candidates always rank after
/// successful ones.
fn best_candidate(synthesis: &[SynthesisRecord]) -> usize {
    synthesis
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| match (a.quality, b.quality) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (a, b) => a.is_none().cmp(&b.is_none()),
        })
        .map(|(index, _)| index)
        .unwrap_or(0)
}

/// Budget consumed by candidates solved concurrently: the wall-clock span of
/// the dispatch, and never less than the slowest reported candidate.
fn tournament_time_spent(
    wall_clock: SignedDuration,
    times_spent: impl Iterator<Item = SignedDuration>,
) -> SignedDuration {
    times_spent.fold(wall_clock, SignedDuration::max)
}

fn prefix_solvers(mut result: SolveResult) -> SolveResult {
    result.solvers = result
        .solvers
        .into_iter()
        .map(|solver| format!("preprocessing_{solver}"))
        .collect();
    result
}

/// Duration left once the tournament has run, floored to the millisecond.
fn remaining_duration(duration: SignedDuration, spent: SignedDuration) -> SignedDuration {
    let remaining = duration.saturating_sub(spent).max(SignedDuration::ZERO);
    SignedDuration::from_millis(remaining.as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        problem::vehicle::Rest,
        test_utils::{
            create_basic_services, create_basic_vehicles, create_test_problem, square_matrix,
        },
    };

    fn self_selection_problem(vehicles: usize) -> VehicleRoutingProblem {
        let mut problem = create_test_problem(
            square_matrix(4, 10.0),
            create_basic_services(vec![1, 2, 3]),
            create_basic_vehicles(vec![0; vehicles]),
        );
        problem.set_first_solution_strategy(vec![FirstSolutionStrategy::SELF_SELECTION]);
        problem
    }

    fn record(heuristic: Heuristic, quality: Option<f64>) -> SynthesisRecord {
        SynthesisRecord {
            heuristic,
            quality,
            cost: quality,
            time_spent: SignedDuration::ZERO,
            used: false,
        }
    }

    #[test]
    fn test_collect_heuristics_savings() {
        let problem = self_selection_problem(3);

        assert_eq!(
            collect_heuristics(&problem),
            vec![
                Heuristic::Savings,
                Heuristic::GlobalCheapestArc,
                Heuristic::LocalCheapestInsertion,
            ]
        );
    }

    #[test]
    fn test_collect_heuristics_force_start() {
        let mut problem = self_selection_problem(2);
        problem.vehicles[0].force_start = true;

        assert_eq!(
            collect_heuristics(&problem),
            vec![
                Heuristic::PathCheapestArc,
                Heuristic::LocalCheapestInsertion,
                Heuristic::GlobalCheapestArc,
            ]
        );
    }

    #[test]
    fn test_collect_heuristics_adds_savings_with_rests() {
        let mut problem = self_selection_problem(1);
        problem.vehicles[0].rests.push(Rest::default());

        assert_eq!(
            collect_heuristics(&problem),
            vec![Heuristic::LocalCheapestInsertion, Heuristic::Savings]
        );
    }

    #[test]
    fn test_collect_heuristics_explicit_strategy() {
        let mut problem = self_selection_problem(1);
        problem.set_first_solution_strategy(vec![
            Heuristic::Christofides.into(),
            Heuristic::FirstUnbound.into(),
        ]);

        assert_eq!(
            collect_heuristics(&problem),
            vec![Heuristic::Christofides, Heuristic::FirstUnbound]
        );
    }

    #[test]
    fn test_batch_heuristic_pins_each_copy() {
        let sub_problem = SubProblem::new(self_selection_problem(2), Backend::Ortools);
        let batch = batch_heuristic(&sub_problem, &Heuristic::ALL);

        assert_eq!(batch.len(), Heuristic::ALL.len());
        for (candidate, heuristic) in batch.iter().zip(Heuristic::ALL) {
            assert_eq!(
                candidate.problem.first_solution_strategy(),
                &[FirstSolutionStrategy::Heuristic(heuristic)]
            );
            assert!(candidate.problem.configuration.restitution.allow_empty_result);
        }
        assert_eq!(
            sub_problem.problem.first_solution_strategy(),
            &[FirstSolutionStrategy::SELF_SELECTION]
        );
    }

    #[test]
    fn test_candidate_duration() {
        let params = PreflightParams::default();

        assert_eq!(
            candidate_duration(Some(SignedDuration::from_millis(300)), 3, &params),
            SignedDuration::from_millis(30)
        );
        assert_eq!(
            candidate_duration(Some(SignedDuration::from_hours(10)), 3, &params),
            SignedDuration::from_mins(5)
        );
        assert_eq!(
            candidate_duration(None, 3, &params),
            params.max_candidate_duration
        );
    }

    #[test]
    fn test_best_candidate_ignores_failures() {
        let synthesis = vec![
            record(Heuristic::Savings, Some(50.0)),
            record(Heuristic::GlobalCheapestArc, None),
            record(Heuristic::LocalCheapestInsertion, Some(80.0)),
        ];

        assert_eq!(best_candidate(&synthesis), 0);
    }

    #[test]
    fn test_best_candidate_zero_cost_beats_failure() {
        let synthesis = vec![
            record(Heuristic::Savings, None),
            record(Heuristic::GlobalCheapestArc, Some(0.0)),
        ];

        assert_eq!(best_candidate(&synthesis), 1);
    }

    #[test]
    fn test_best_candidate_negative_costs() {
        let synthesis = vec![
            record(Heuristic::Savings, None),
            record(Heuristic::GlobalCheapestArc, Some(-20.0)),
            record(Heuristic::LocalCheapestInsertion, Some(-50.0)),
        ];

        assert_eq!(best_candidate(&synthesis), 2);
    }

    #[test]
    fn test_tournament_time_spent_is_not_summed() {
        let times = [
            SignedDuration::from_millis(500),
            SignedDuration::from_millis(501),
            SignedDuration::from_millis(499),
        ];

        assert_eq!(
            tournament_time_spent(SignedDuration::from_millis(10), times.into_iter()),
            SignedDuration::from_millis(501)
        );
        // Fewer workers than candidates queue them up
        assert_eq!(
            tournament_time_spent(SignedDuration::from_millis(1002), times.into_iter()),
            SignedDuration::from_millis(1002)
        );
        assert_eq!(
            tournament_time_spent(SignedDuration::from_millis(3), std::iter::empty()),
            SignedDuration::from_millis(3)
        );
    }

    #[test]
    fn test_remaining_duration_floors() {
        assert_eq!(
            remaining_duration(
                SignedDuration::from_millis(1000),
                SignedDuration::from_micros(250_500)
            ),
            SignedDuration::from_millis(749)
        );
        assert_eq!(
            remaining_duration(SignedDuration::from_millis(10), SignedDuration::from_secs(1)),
            SignedDuration::ZERO
        );
    }

    #[test]
    fn test_vroom_skips_selection() {
        let solver = |_: &SubProblem| -> Option<SolveResult> { None };
        let params = PreflightParams::default();
        let tournament = HeuristicTournament::new(&solver, &params);

        let sub_problem = SubProblem::new(self_selection_problem(3), Backend::Vroom);
        let result = tournament.custom_heuristics(sub_problem.clone()).unwrap();

        assert_eq!(result, sub_problem);
    }

    #[test]
    fn test_single_candidate_is_pinned_without_solving() {
        let solver = |_: &SubProblem| -> Option<SolveResult> {
            panic!("no tournament expected with a single candidate")
        };
        let params = PreflightParams::default();
        let tournament = HeuristicTournament::new(&solver, &params);

        let mut problem = self_selection_problem(2);
        problem.vehicles[0].overall_duration = Some(1000.0);
        let result = tournament
            .custom_heuristics(SubProblem::new(problem, Backend::Ortools))
            .unwrap();

        assert_eq!(
            result.problem.first_solution_strategy(),
            &[FirstSolutionStrategy::Heuristic(Heuristic::Christofides)]
        );
        assert!(result.problem.configuration.preprocessing.heuristic_synthesis.is_empty());
    }
}
