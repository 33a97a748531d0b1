use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::problem::travel_matrix::Cost;

use super::heuristic::Heuristic;

/// Outcome of one heuristic candidate during the tournament.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct SynthesisRecord {
    pub heuristic: Heuristic,
    /// `None` when the candidate produced no solution
    pub quality: Option<f64>,
    pub cost: Option<Cost>,
    pub time_spent: SignedDuration,
    pub used: bool,
}

