pub mod heuristic;
pub mod heuristic_selector;
pub mod heuristic_tournament;
pub mod synthesis;
