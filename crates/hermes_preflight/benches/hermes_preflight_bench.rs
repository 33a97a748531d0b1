use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use hermes_preflight::{
    admission::backend::Backend,
    expansion::variation_generator::{perturb_grid, relax_triangle_inequality},
    params::PreflightParams,
    problem::{
        point::Point,
        service::{Activity, Service},
        travel_matrix::{Grid, Matrix},
        vehicle::Vehicle,
        vehicle_routing_problem::VehicleRoutingProblem,
    },
    unfeasible::unfeasibility_detector::detect,
};
use rand::{Rng, SeedableRng, rngs::SmallRng};

fn random_grid(size: usize, rng: &mut SmallRng) -> Grid {
    (0..size)
        .map(|from| {
            (0..size)
                .map(|to| {
                    if from == to {
                        0.0
                    } else {
                        rng.random_range(60.0..3600.0)
                    }
                })
                .collect()
        })
        .collect()
}

fn random_problem(size: usize, rng: &mut SmallRng) -> VehicleRoutingProblem {
    VehicleRoutingProblem {
        points: (0..size)
            .map(|index| Point::new(format!("point_{index}"), index))
            .collect(),
        matrices: vec![Matrix::from_time("bench", random_grid(size, rng))],
        services: (1..size)
            .map(|index| Service {
                id: format!("service_{index}"),
                activity: Some(Activity::at(format!("point_{index}"))),
                ..Service::default()
            })
            .collect(),
        vehicles: (0..5)
            .map(|index| Vehicle {
                id: format!("vehicle_{index}"),
                start_point_id: Some("point_0".to_owned()),
                end_point_id: Some("point_0".to_owned()),
                matrix_id: Some("bench".to_owned()),
                ..Vehicle::default()
            })
            .collect(),
        ..VehicleRoutingProblem::default()
    }
}

fn variation_benchmark(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let grid = random_grid(100, &mut rng);

    c.bench_function("perturb and relax 100x100", |b| {
        b.iter(|| {
            let mut perturbed = perturb_grid(black_box(&grid), 20, &mut rng);
            relax_triangle_inequality(&mut perturbed);
            perturbed
        })
    });
}

fn admission_benchmark(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let problem = random_problem(200, &mut rng);
    let params = PreflightParams::default();

    c.bench_function("inapplicable_solve ortools", |b| {
        b.iter(|| Backend::Ortools.inapplicable_solve(black_box(&problem)))
    });

    c.bench_function("detect unfeasible services", |b| {
        b.iter(|| detect(black_box(&problem), &params))
    });
}

criterion_group!(benches, variation_benchmark, admission_benchmark);
criterion_main!(benches);
