use jiff::SignedDuration;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    admission::backend::Backend,
    problem::{travel_matrix::Cost, vehicle_routing_problem::VehicleRoutingProblem},
};

/// Unit of work dispatched to a solver backend.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SubProblem {
    pub problem: VehicleRoutingProblem,
    pub backend: Backend,
}

impl SubProblem {
    pub fn new(problem: VehicleRoutingProblem, backend: Backend) -> Self {
        SubProblem { problem, backend }
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub cost: Cost,
    pub elapsed: SignedDuration,
    /// Names of the solver stages that produced the result
    pub solvers: Vec<String>,
}

/// Entry point of the route construction solvers. Returning `None` means the
/// solve produced nothing, which includes running out of its time budget.
pub trait SolveEntryPoint: Sync {
    fn solve(&self, sub_problem: &SubProblem) -> Option<SolveResult>;
}

impl<F> SolveEntryPoint for F
where
    F: Fn(&SubProblem) -> Option<SolveResult> + Sync,
{
    fn solve(&self, sub_problem: &SubProblem) -> Option<SolveResult> {
        self(sub_problem)
    }
}
