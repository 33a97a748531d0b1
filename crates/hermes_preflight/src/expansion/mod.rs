pub mod problem_expander;
pub mod variation_generator;
