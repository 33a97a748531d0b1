pub mod admission;
pub mod error;
pub mod expansion;
pub mod heuristic;
pub mod json;
pub mod params;
pub mod problem;
pub mod sub_problem;
pub mod unfeasible;

#[cfg(test)]
pub(crate) mod test_utils;
