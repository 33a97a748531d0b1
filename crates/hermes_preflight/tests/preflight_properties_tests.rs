mod setup;

use hermes_preflight::{
    admission::backend::Backend,
    error::PreflightError,
    expansion::problem_expander::ProblemExpander,
    params::{PreflightParams, UNREACHABLE_COST},
    problem::{
        service::Quantity, time_window::TimeWindow, vehicle::VehicleCapacity,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    sub_problem::SubProblem,
    unfeasible::{unassigned_record::UnfeasibleReason, unfeasibility_detector::detect},
};
use rand::{SeedableRng, rngs::SmallRng};
use setup::create_test_problem;

#[test]
fn test_inapplicable_solve_is_idempotent() {
    let mut problem = create_test_problem(5, 2);
    problem.vehicles[0].force_start = true;
    problem.vehicles[1].cost_late_multiplier = Some(1.0);

    for backend in Backend::ALL {
        assert_eq!(
            backend.inapplicable_solve(&problem),
            backend.inapplicable_solve(&problem)
        );
    }
    assert!(!Backend::Vroom.inapplicable_solve(&problem).is_empty());
}

#[test]
fn test_duration_exceeds_shift() {
    let mut problem = create_test_problem(2, 1);
    problem.vehicles[0].timewindow = Some(TimeWindow::bounded(0.0, 10.0));
    problem.services[0].activity.as_mut().unwrap().duration = 20.0;

    let records = detect(&problem, &PreflightParams::default());

    assert_eq!(records.len(), 1);
    assert!(
        records[0]
            .reason()
            .contains(UnfeasibleReason::DurationExceedsShift.as_str())
    );
}

#[test]
fn test_one_record_per_service() {
    let mut problem = create_test_problem(3, 2);
    for vehicle in problem.vehicles.iter_mut() {
        vehicle.capacities = vec![VehicleCapacity::new("kg", 5.0)];
    }
    problem.services[0].visits_number = 0;
    problem.services[0].quantities = vec![Quantity::new("kg", 8.0)];

    let records = detect(&problem, &PreflightParams::default());

    assert_eq!(records.len(), 1);
    assert!(records[0].has_reason(UnfeasibleReason::ZeroVisits));
    assert!(records[0].has_reason(UnfeasibleReason::InsufficientCapacity));
}

#[test]
fn test_repetition_with_two_problems() {
    let params = PreflightParams::default();
    let mut first = create_test_problem(3, 1);
    first.configuration.resolution.repetition = 3;
    let second = create_test_problem(3, 1);

    let result = ProblemExpander::new(&params).expand(
        vec![
            SubProblem::new(first, Backend::Ortools),
            SubProblem::new(second, Backend::Ortools),
        ],
        &mut SmallRng::seed_from_u64(7),
    );

    assert!(matches!(result, Err(PreflightError::DiscordantProblem(2))));
}

fn isolate_point(problem: &mut VehicleRoutingProblem, index: usize) {
    let grid = problem.matrices[0].time.as_mut().unwrap();
    let size = grid.len();
    for other in (0..size).filter(|&other| other != index) {
        grid[index][other] = UNREACHABLE_COST;
        grid[other][index] = UNREACHABLE_COST;
    }
}

#[test]
fn test_isolated_point_is_unreachable() {
    let mut problem = create_test_problem(4, 2);
    problem.services[1].activity.as_mut().unwrap().point_id = "point_3".to_owned();
    isolate_point(&mut problem, 3);

    let records = detect(&problem, &PreflightParams::default());

    let ids = records
        .iter()
        .map(|record| record.service_id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["service_2", "service_3"]);
    assert!(
        records
            .iter()
            .all(|record| record.has_reason(UnfeasibleReason::Unreachable))
    );
}
