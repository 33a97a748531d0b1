use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::problem::{
    travel_matrix::{Grid, find_triangle_violation, is_square},
    vehicle_routing_problem::VehicleRoutingProblem,
};

/// Randomly perturbs every cell of `grid` by up to `variation_ratio` percent
/// of its value. Cells decrease with probability 1/3 and increase otherwise.
pub fn perturb_grid<R>(grid: &Grid, variation_ratio: u32, rng: &mut R) -> Grid
where
    R: Rng,
{
    grid.iter()
        .map(|row| {
            row.iter()
                .map(|&value| {
                    if variation_ratio == 0 {
                        return value;
                    }

                    let sign = if rng.random_ratio(1, 3) { -1.0 } else { 1.0 };
                    let percent = f64::from(rng.random_range(0..variation_ratio));
                    value + sign * value * percent / 100.0
                })
                .collect()
        })
        .collect()
}

/// Relaxes `grid` until it satisfies the triangle inequality. Values only
/// ever decrease. `grid` must be square.
pub fn relax_triangle_inequality(grid: &mut Grid) {
    let size = grid.len();
    let mut passes = 0;

    while find_triangle_violation(grid).is_some() {
        for k in 0..size {
            for i in 0..size {
                for j in 0..size {
                    let through = grid[i][k] + grid[k][j];
                    if through < grid[i][j] {
                        grid[i][j] = through;
                    }
                }
            }
        }
        passes += 1;
    }

    debug!(passes, size, "triangle inequality restored");
}

/// Replaces the costing matrix of the first matrix with a perturbed copy of
/// its time grid. Time and distance grids are left untouched.
#[instrument(skip_all, level = "debug")]
pub fn generate_matrix<R>(problem: &mut VehicleRoutingProblem, variation_ratio: u32, rng: &mut R)
where
    R: Rng,
{
    let Some(matrix) = problem.matrices.first_mut() else {
        warn!("no matrix to vary");
        return;
    };

    let Some(time) = matrix.time.as_ref() else {
        warn!(matrix = %matrix.id, "matrix has no time grid to vary");
        return;
    };

    if !is_square(time) {
        warn!(matrix = %matrix.id, "time grid is not square, skipping variation");
        return;
    }

    let mut value = perturb_grid(time, variation_ratio, rng);
    relax_triangle_inequality(&mut value);
    matrix.value = Some(value);
}
