use rand::{SeedableRng, rngs::SmallRng};

use crate::{
    heuristic::heuristic::FirstSolutionStrategy,
    problem::{
        point::Point,
        service::{Activity, Service},
        time_window::TimeWindow,
        travel_matrix::{Grid, Matrix},
        vehicle::Vehicle,
        vehicle_routing_problem::{DayRange, Schedule, VehicleRoutingProblem},
    },
};

pub const TEST_MATRIX_ID: &str = "m";

pub fn point_id(index: usize) -> String {
    format!("point_{index}")
}

/// Square grid with a zero diagonal and `cost` everywhere else.
pub fn square_matrix(size: usize, cost: f64) -> Grid {
    (0..size)
        .map(|from| {
            (0..size)
                .map(|to| if from == to { 0.0 } else { cost })
                .collect()
        })
        .collect()
}

pub fn create_basic_services(location_ids: Vec<usize>) -> Vec<Service> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| Service {
            id: format!("service_{index}"),
            activity: Some(Activity::at(point_id(location_id))),
            ..Service::default()
        })
        .collect()
}

pub fn create_basic_vehicles(location_ids: Vec<usize>) -> Vec<Vehicle> {
    location_ids
        .iter()
        .enumerate()
        .map(|(index, &location_id)| Vehicle {
            id: format!("vehicle_{index}"),
            start_point_id: Some(point_id(location_id)),
            end_point_id: Some(point_id(location_id)),
            matrix_id: Some(TEST_MATRIX_ID.to_owned()),
            ..Vehicle::default()
        })
        .collect()
}

/// One point per row of `time`, all referencing a single time matrix.
pub fn create_test_problem(
    time: Grid,
    services: Vec<Service>,
    vehicles: Vec<Vehicle>,
) -> VehicleRoutingProblem {
    VehicleRoutingProblem {
        points: (0..time.len())
            .map(|index| Point::new(point_id(index), index))
            .collect(),
        matrices: vec![Matrix::from_time(TEST_MATRIX_ID, time)],
        services,
        vehicles,
        ..VehicleRoutingProblem::default()
    }
}

/// Three services served by two vehicles based at `point_0`.
pub fn create_simple_problem() -> VehicleRoutingProblem {
    let mut problem = create_test_problem(
        square_matrix(4, 10.0),
        create_basic_services(vec![1, 2, 3]),
        create_basic_vehicles(vec![0, 0]),
    );
    problem.configuration.resolution.duration = Some(jiff::SignedDuration::from_secs(60));
    problem
}

/// Simple problem planned with the periodic heuristic over one week.
pub fn create_periodic_problem() -> VehicleRoutingProblem {
    let mut problem = create_simple_problem();
    problem.set_first_solution_strategy(vec![FirstSolutionStrategy::PERIODIC]);
    problem.configuration.schedule = Some(Schedule {
        range_indices: Some(DayRange { start: 0, end: 6 }),
        range_date: None,
    });

    for vehicle in problem.vehicles.iter_mut() {
        vehicle.timewindow = Some(TimeWindow::bounded(0.0, 36_000.0));
    }

    problem
}

pub fn seeded_rng() -> SmallRng {
    SmallRng::seed_from_u64(2427121)
}
