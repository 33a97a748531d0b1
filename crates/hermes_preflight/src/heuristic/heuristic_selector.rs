use fxhash::FxHashSet;
use tracing::debug;

use crate::problem::{
    travel_matrix::MatrixDimension, vehicle::Vehicle,
    vehicle_routing_problem::VehicleRoutingProblem,
};

use super::heuristic::Heuristic;

/// Shape of a problem as seen by the heuristic selection rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProblemFeatures {
    /// Every vehicle ends where it starts
    pub loop_route: bool,
    /// All vehicles share router mode, dimension, start and end
    pub unique_configuration: bool,
    pub multi_timewindow_services: usize,
    pub multi_timewindow_ratio: f64,
    pub rests: usize,
    pub has_shipments: bool,
    pub vehicles: usize,
    pub any_duration: bool,
    pub any_overall_duration: bool,
    pub any_force_start: bool,
}

impl ProblemFeatures {
    pub fn from_problem(problem: &VehicleRoutingProblem) -> Self {
        let multi_timewindow_services = problem
            .services
            .iter()
            .filter(|service| service.timewindows().len() > 1)
            .count();

        let activities = problem
            .services
            .iter()
            .map(|service| service.visits_number as usize)
            .sum::<usize>()
            + problem.shipments.len() * 2;

        let multi_timewindow_ratio = if activities == 0 {
            0.0
        } else {
            multi_timewindow_services as f64 / activities as f64
        };

        ProblemFeatures {
            loop_route: problem
                .vehicles
                .iter()
                .all(|vehicle| is_loop_route(problem, vehicle)),
            unique_configuration: has_unique_configuration(&problem.vehicles),
            multi_timewindow_services,
            multi_timewindow_ratio,
            rests: problem.total_rests(),
            has_shipments: !problem.shipments.is_empty(),
            vehicles: problem.vehicles.len(),
            any_duration: problem
                .vehicles
                .iter()
                .any(|vehicle| vehicle.duration.is_some()),
            any_overall_duration: problem
                .vehicles
                .iter()
                .any(|vehicle| vehicle.overall_duration.is_some()),
            any_force_start: problem.vehicles.iter().any(Vehicle::forces_start),
        }
    }
}

fn is_loop_route(problem: &VehicleRoutingProblem, vehicle: &Vehicle) -> bool {
    let (Some(start_id), Some(end_id)) = (&vehicle.start_point_id, &vehicle.end_point_id) else {
        return true;
    };

    if start_id == end_id {
        return true;
    }

    let (Some(start), Some(end)) = (problem.point(start_id), problem.point(end_id)) else {
        return true;
    };

    if start.same_location(end) {
        return true;
    }

    match (start.matrix_index, end.matrix_index) {
        (Some(from), Some(to)) => {
            !problem.matrices.is_empty()
                && problem
                    .matrices
                    .iter()
                    .all(|matrix| matrix.cost(MatrixDimension::Time, from, to) == Some(0.0))
        }
        _ => false,
    }
}

fn has_unique_configuration(vehicles: &[Vehicle]) -> bool {
    fn distinct<'a, T: std::hash::Hash + Eq + 'a>(values: impl Iterator<Item = T>) -> usize {
        values.collect::<FxHashSet<T>>().len()
    }

    distinct(vehicles.iter().map(|vehicle| &vehicle.router_mode)) == 1
        && distinct(vehicles.iter().map(|vehicle| vehicle.router_dimension)) == 1
        && distinct(vehicles.iter().map(|vehicle| &vehicle.start_point_id)) == 1
        && distinct(vehicles.iter().map(|vehicle| &vehicle.end_point_id)) == 1
}

pub struct SelectionRule {
    pub name: &'static str,
    pub applies: fn(&ProblemFeatures) -> bool,
    pub heuristic: Heuristic,
}

fn overall_duration(features: &ProblemFeatures) -> bool {
    features.any_overall_duration
}

fn force_start(features: &ProblemFeatures) -> bool {
    features.any_force_start
}

fn global_loop(features: &ProblemFeatures) -> bool {
    features.loop_route
        && features.unique_configuration
        && ((features.any_duration && features.vehicles == 1)
            || (features.multi_timewindow_ratio > 0.2 && features.rests == 0))
}

fn local_constraints(features: &ProblemFeatures) -> bool {
    (features.vehicles == 1 && features.rests > 0)
        || features.has_shipments
        || features.multi_timewindow_services > 0
}

fn small_loop_fleet(features: &ProblemFeatures) -> bool {
    features.loop_route
        && features.unique_configuration
        && features.vehicles < 10
        && !features.any_duration
}

fn shared_structure(features: &ProblemFeatures) -> bool {
    features.rests > 0 || features.unique_configuration || features.loop_route
}

fn fallback(_: &ProblemFeatures) -> bool {
    true
}

/// Evaluated top to bottom, the first matching rule wins.
pub const SELECTION_RULES: [SelectionRule; 7] = [
    SelectionRule {
        name: "overall_duration",
        applies: overall_duration,
        heuristic: Heuristic::Christofides,
    },
    SelectionRule {
        name: "force_start",
        applies: force_start,
        heuristic: Heuristic::PathCheapestArc,
    },
    SelectionRule {
        name: "global_loop",
        applies: global_loop,
        heuristic: Heuristic::GlobalCheapestArc,
    },
    SelectionRule {
        name: "local_constraints",
        applies: local_constraints,
        heuristic: Heuristic::LocalCheapestInsertion,
    },
    SelectionRule {
        name: "small_loop_fleet",
        applies: small_loop_fleet,
        heuristic: Heuristic::Savings,
    },
    SelectionRule {
        name: "shared_structure",
        applies: shared_structure,
        heuristic: Heuristic::ParallelCheapestInsertion,
    },
    SelectionRule {
        name: "fallback",
        applies: fallback,
        heuristic: Heuristic::FirstUnbound,
    },
];

pub fn select_best_heuristic(problem: &VehicleRoutingProblem) -> Heuristic {
    let features = ProblemFeatures::from_problem(problem);
    select_from_features(&features)
}

pub fn select_from_features(features: &ProblemFeatures) -> Heuristic {
    let rule = SELECTION_RULES
        .iter()
        .find(|rule| (rule.applies)(features))
        .unwrap_or(&SELECTION_RULES[SELECTION_RULES.len() - 1]);

    debug!(rule = rule.name, heuristic = %rule.heuristic, "selected heuristic");
    rule.heuristic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        problem::{time_window::TimeWindow, vehicle::Rest},
        test_utils::{
            create_basic_services, create_basic_vehicles, create_test_problem, square_matrix,
        },
    };

    fn loop_problem(vehicles: usize) -> VehicleRoutingProblem {
        create_test_problem(
            square_matrix(4, 10.0),
            create_basic_services(vec![1, 2, 3]),
            create_basic_vehicles(vec![0; vehicles]),
        )
    }

    #[test]
    fn test_overall_duration_wins() {
        let mut problem = loop_problem(2);
        problem.vehicles[0].overall_duration = Some(3600.0);
        problem.vehicles[1].force_start = true;

        assert_eq!(select_best_heuristic(&problem), Heuristic::Christofides);
    }

    #[test]
    fn test_force_start() {
        let mut problem = loop_problem(2);
        problem.vehicles[1].force_start = true;

        assert_eq!(select_best_heuristic(&problem), Heuristic::PathCheapestArc);
    }

    #[test]
    fn test_single_vehicle_duration_loop() {
        let mut problem = loop_problem(1);
        problem.vehicles[0].duration = Some(1000.0);

        assert_eq!(select_best_heuristic(&problem), Heuristic::GlobalCheapestArc);
    }

    #[test]
    fn test_high_multi_timewindow_ratio() {
        let mut problem = loop_problem(3);
        let activity = problem.services[0].activity.as_mut().unwrap();
        activity.timewindows = vec![
            TimeWindow::bounded(0.0, 10.0),
            TimeWindow::bounded(20.0, 30.0),
        ];

        // 1 of 3 visits has several timewindows
        assert_eq!(select_best_heuristic(&problem), Heuristic::GlobalCheapestArc);

        problem.vehicles[0].rests.push(Rest::default());
        assert_eq!(
            select_best_heuristic(&problem),
            Heuristic::LocalCheapestInsertion
        );
    }

    #[test]
    fn test_single_vehicle_with_rests() {
        let mut problem = loop_problem(1);
        problem.vehicles[0].rests.push(Rest::default());

        assert_eq!(
            select_best_heuristic(&problem),
            Heuristic::LocalCheapestInsertion
        );
    }

    #[test]
    fn test_small_loop_fleet() {
        let problem = loop_problem(3);

        assert_eq!(select_best_heuristic(&problem), Heuristic::Savings);
    }

    #[test]
    fn test_large_loop_fleet() {
        let problem = loop_problem(12);

        assert_eq!(
            select_best_heuristic(&problem),
            Heuristic::ParallelCheapestInsertion
        );
    }

    #[test]
    fn test_fallback() {
        let mut problem = create_test_problem(
            square_matrix(4, 10.0),
            create_basic_services(vec![3]),
            create_basic_vehicles(vec![0, 1]),
        );
        problem.vehicles[0].end_point_id = Some("point_2".to_owned());
        problem.vehicles[1].end_point_id = Some("point_3".to_owned());

        let features = ProblemFeatures::from_problem(&problem);
        assert!(!features.loop_route);
        assert!(!features.unique_configuration);
        assert_eq!(select_best_heuristic(&problem), Heuristic::FirstUnbound);
    }

    #[test]
    fn test_zero_travel_time_is_loop() {
        let mut matrix = square_matrix(3, 10.0);
        matrix[0][2] = 0.0;
        let mut problem = create_test_problem(
            matrix,
            create_basic_services(vec![1]),
            create_basic_vehicles(vec![0]),
        );
        problem.vehicles[0].end_point_id = Some("point_2".to_owned());

        assert!(ProblemFeatures::from_problem(&problem).loop_route);
    }

    #[test]
    fn test_rule_order() {
        let names = SELECTION_RULES.iter().map(|rule| rule.name).collect::<Vec<_>>();

        assert_eq!(
            names,
            vec![
                "overall_duration",
                "force_start",
                "global_loop",
                "local_constraints",
                "small_loop_fleet",
                "shared_structure",
                "fallback",
            ]
        );
    }
}
