use std::path::PathBuf;

use clap::Args;
use comfy_table::Table;
use hermes_preflight::{
    heuristic::{
        heuristic::FirstSolutionStrategy,
        heuristic_selector::{ProblemFeatures, SELECTION_RULES, select_best_heuristic},
        heuristic_tournament::{candidate_duration, collect_heuristics},
    },
    params::PreflightParams,
};

use crate::file_utils::read_problem;

#[derive(Args)]
pub struct SelectArgs {
    /// Problem file
    #[arg(short, long)]
    input: PathBuf,
}

pub fn run(args: SelectArgs) -> Result<(), anyhow::Error> {
    let mut problem = read_problem(&args.input)?;
    let features = ProblemFeatures::from_problem(&problem);

    let mut table = Table::new();
    table.set_header(vec!["Rule", "Applies", "Heuristic"]);
    for rule in SELECTION_RULES.iter() {
        table.add_row(vec![
            rule.name.to_owned(),
            (rule.applies)(&features).to_string(),
            rule.heuristic.to_string(),
        ]);
    }
    println!("{table}");
    println!("Selected heuristic: {}", select_best_heuristic(&problem));

    if problem.first_solution_strategy().is_empty() {
        problem.set_first_solution_strategy(vec![FirstSolutionStrategy::SELF_SELECTION]);
    }

    let candidates = collect_heuristics(&problem);
    let allocated = candidate_duration(
        problem.configuration.resolution.duration,
        candidates.len().max(1),
        &PreflightParams::default(),
    );

    let mut table = Table::new();
    table.set_header(vec!["Candidate", "Allocated"]);
    for heuristic in &candidates {
        table.add_row(vec![heuristic.to_string(), format!("{allocated:#}")]);
    }
    println!("{table}");

    Ok(())
}
