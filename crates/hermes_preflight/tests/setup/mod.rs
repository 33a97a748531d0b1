#![allow(dead_code)]

use std::sync::Mutex;

use hermes_preflight::{
    heuristic::heuristic::{FirstSolutionStrategy, Heuristic},
    problem::{
        point::Point,
        service::{Activity, Service},
        travel_matrix::{Grid, Matrix},
        vehicle::Vehicle,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    sub_problem::{SolveEntryPoint, SolveResult, SubProblem},
};
use jiff::SignedDuration;

pub fn square_matrix(size: usize, cost: f64) -> Grid {
    (0..size)
        .map(|from| {
            (0..size)
                .map(|to| if from == to { 0.0 } else { cost })
                .collect()
        })
        .collect()
}

pub fn create_test_problem(size: usize, vehicles: usize) -> VehicleRoutingProblem {
    VehicleRoutingProblem {
        name: Some("test".to_owned()),
        points: (0..size)
            .map(|index| Point::new(format!("point_{index}"), index))
            .collect(),
        matrices: vec![Matrix::from_time("m", square_matrix(size, 10.0))],
        services: (1..size)
            .map(|index| Service {
                id: format!("service_{index}"),
                activity: Some(Activity::at(format!("point_{index}"))),
                ..Service::default()
            })
            .collect(),
        vehicles: (0..vehicles)
            .map(|index| Vehicle {
                id: format!("vehicle_{index}"),
                start_point_id: Some("point_0".to_owned()),
                end_point_id: Some("point_0".to_owned()),
                matrix_id: Some("m".to_owned()),
                ..Vehicle::default()
            })
            .collect(),
        ..VehicleRoutingProblem::default()
    }
}

pub fn pinned_heuristic(sub_problem: &SubProblem) -> Heuristic {
    match sub_problem.problem.first_solution_strategy() {
        [FirstSolutionStrategy::Heuristic(heuristic)] => *heuristic,
        other => panic!("candidate not pinned to a heuristic: {other:?}"),
    }
}

/// Solve entry point answering from a fixed table of costs per heuristic and
/// recording every candidate it receives.
pub struct ScriptedSolver {
    costs: Vec<(Heuristic, Option<f64>)>,
    elapsed: SignedDuration,
    pub received: Mutex<Vec<SubProblem>>,
}

impl ScriptedSolver {
    pub fn new(costs: Vec<(Heuristic, Option<f64>)>) -> Self {
        ScriptedSolver {
            costs,
            elapsed: SignedDuration::from_secs(2),
            received: Mutex::new(vec![]),
        }
    }

    pub fn received(&self) -> Vec<SubProblem> {
        self.received.lock().unwrap().clone()
    }
}

impl SolveEntryPoint for ScriptedSolver {
    fn solve(&self, sub_problem: &SubProblem) -> Option<SolveResult> {
        self.received.lock().unwrap().push(sub_problem.clone());

        let heuristic = pinned_heuristic(sub_problem);
        let cost = self
            .costs
            .iter()
            .find(|(candidate, _)| *candidate == heuristic)
            .and_then(|(_, cost)| *cost)?;

        Some(SolveResult {
            cost,
            elapsed: self.elapsed,
            solvers: vec!["ortools".to_owned()],
        })
    }
}
