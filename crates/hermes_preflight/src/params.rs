use jiff::SignedDuration;

use crate::problem::travel_matrix::Cost;

#[derive(Clone, Debug)]
pub struct PreflightParams {
    /// Share of the resolution duration spent on the heuristic tournament
    pub tournament_time_ratio: f64,
    pub max_candidate_duration: SignedDuration,

    /// Partition restarts given to every repeated problem
    pub repetition_partition_restarts: u32,

    pub max_variation_ratio: u32,

    /// Any matrix cell at or above this cost is considered unreachable
    pub unreachable_cost: Cost,
}

impl Default for PreflightParams {
    fn default() -> Self {
        Self {
            tournament_time_ratio: 0.30,
            max_candidate_duration: SignedDuration::from_mins(5),
            repetition_partition_restarts: 5,
            max_variation_ratio: 100,
            unreachable_cost: UNREACHABLE_COST,
        }
    }
}

pub const UNREACHABLE_COST: Cost = 2_147_483_647.0;
