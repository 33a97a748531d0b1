use std::path::{Path, PathBuf};

use clap::Args;
use hermes_preflight::{
    admission::backend::Backend, expansion::problem_expander::ProblemExpander,
    params::PreflightParams, sub_problem::SubProblem,
};
use rand::{SeedableRng, rngs::SmallRng};
use tracing::info;

use crate::{file_utils::read_problem, parsers};

#[derive(Args)]
pub struct ExpandArgs {
    /// Problem file to expand
    #[arg(short, long)]
    input: PathBuf,

    /// Output folder of the sub-problem files
    #[arg(short, long)]
    output: PathBuf,

    #[arg(short, long, default_value = "ortools")]
    backend: Backend,

    /// Seed of the matrix variations, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the resolution duration (e.g., "30s", "5m", "PT1H30M")
    #[arg(short, long, value_parser = parsers::parse_resolution_duration)]
    duration: Option<jiff::SignedDuration>,

    /// Overrides the variation ratio of several solutions requests
    #[arg(long)]
    variation_ratio: Option<u32>,
}

pub fn run(args: ExpandArgs) -> Result<(), anyhow::Error> {
    let mut problem = read_problem(&args.input)?;
    if let Some(duration) = args.duration {
        problem.configuration.resolution.duration = Some(duration);
    }
    if let Some(ratio) = args.variation_ratio {
        problem.configuration.resolution.variation_ratio = Some(ratio);
    }

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    };

    let params = PreflightParams::default();
    let expansion = ProblemExpander::new(&params)
        .expand(vec![SubProblem::new(problem, args.backend)], &mut rng)?;

    let stem = args
        .input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("problem");

    std::fs::create_dir_all(&args.output)?;
    write_sub_problems(&args.output, stem, "untouched", &expansion.untouched)?;
    write_sub_problems(&args.output, stem, "expanded", &expansion.expanded)?;

    info!(
        "Wrote {} untouched and {} expanded problems to {:?}",
        expansion.untouched.len(),
        expansion.expanded.len(),
        args.output
    );

    Ok(())
}

fn write_sub_problems(
    output: &Path,
    stem: &str,
    kind: &str,
    sub_problems: &[SubProblem],
) -> Result<(), anyhow::Error> {
    for (index, sub_problem) in sub_problems.iter().enumerate() {
        let path = output.join(format!("{stem}_{kind}_{index}.json"));
        std::fs::write(&path, serde_json::to_string_pretty(sub_problem)?)?;
    }

    Ok(())
}
