pub mod admission_rule;
pub mod backend;
pub mod rules;
