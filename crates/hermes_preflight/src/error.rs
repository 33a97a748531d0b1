#[derive(thiserror::Error, Debug)]
pub enum PreflightError {
    /// Repetition can only be applied to a single problem.
    #[error("Can only repeat one single problem, got {0} problems")]
    DiscordantProblem(usize),

    #[error("Inconsistent first solution strategy used internally: '{0}'")]
    UnregisteredHeuristic(String),

    #[error("No solution found by any heuristic candidate")]
    NoSolution,
}
