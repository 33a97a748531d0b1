use std::{fmt::Display, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PreflightError;

/// Construction heuristics known to the solver backends. The set is closed:
/// names outside of it are rejected when parsed.
#[derive(Deserialize, Serialize, JsonSchema, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    PathCheapestArc,
    GlobalCheapestArc,
    LocalCheapestInsertion,
    Savings,
    ParallelCheapestInsertion,
    FirstUnbound,
    Christofides,
}

impl Heuristic {
    pub const ALL: [Heuristic; 7] = [
        Heuristic::PathCheapestArc,
        Heuristic::GlobalCheapestArc,
        Heuristic::LocalCheapestInsertion,
        Heuristic::Savings,
        Heuristic::ParallelCheapestInsertion,
        Heuristic::FirstUnbound,
        Heuristic::Christofides,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Heuristic::PathCheapestArc => "path_cheapest_arc",
            Heuristic::GlobalCheapestArc => "global_cheapest_arc",
            Heuristic::LocalCheapestInsertion => "local_cheapest_insertion",
            Heuristic::Savings => "savings",
            Heuristic::ParallelCheapestInsertion => "parallel_cheapest_insertion",
            Heuristic::FirstUnbound => "first_unbound",
            Heuristic::Christofides => "christofides",
        }
    }
}

impl Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Heuristic {
    type Err = PreflightError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Heuristic::ALL
            .into_iter()
            .find(|heuristic| heuristic.as_str() == name)
            .ok_or_else(|| PreflightError::UnregisteredHeuristic(name.to_owned()))
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StrategyMode {
    /// Pick the heuristic automatically
    SelfSelection,
    /// Multi-day scheduling construction
    Periodic,
}

#[derive(Deserialize, Serialize, JsonSchema, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum FirstSolutionStrategy {
    Mode(StrategyMode),
    Heuristic(Heuristic),
}

impl FirstSolutionStrategy {
    pub const SELF_SELECTION: FirstSolutionStrategy =
        FirstSolutionStrategy::Mode(StrategyMode::SelfSelection);
    pub const PERIODIC: FirstSolutionStrategy = FirstSolutionStrategy::Mode(StrategyMode::Periodic);

    pub fn heuristic(&self) -> Option<Heuristic> {
        match self {
            FirstSolutionStrategy::Heuristic(heuristic) => Some(*heuristic),
            FirstSolutionStrategy::Mode(_) => None,
        }
    }
}

impl From<Heuristic> for FirstSolutionStrategy {
    fn from(heuristic: Heuristic) -> Self {
        FirstSolutionStrategy::Heuristic(heuristic)
    }
}

impl Display for FirstSolutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FirstSolutionStrategy::Mode(StrategyMode::SelfSelection) => write!(f, "self_selection"),
            FirstSolutionStrategy::Mode(StrategyMode::Periodic) => write!(f, "periodic"),
            FirstSolutionStrategy::Heuristic(heuristic) => write!(f, "{heuristic}"),
        }
    }
}
