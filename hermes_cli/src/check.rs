use std::path::PathBuf;

use clap::Args;
use comfy_table::Table;
use hermes_preflight::{
    admission::backend::Backend, params::PreflightParams,
    unfeasible::unfeasibility_detector::detect,
};
use tracing::info;

use crate::file_utils::{problem_paths, read_problem};

#[derive(Args)]
pub struct CheckArgs {
    /// Problem file, or folder of problem files
    #[arg(short, long)]
    input: PathBuf,

    /// Backend whose admission rules are evaluated
    #[arg(short, long, default_value = "ortools")]
    backend: Backend,
}

pub fn run(args: CheckArgs) -> Result<(), anyhow::Error> {
    let params = PreflightParams::default();

    for path in problem_paths(&args.input)? {
        let problem = read_problem(&path)?;
        info!("Checking {:?} against {}", path, args.backend);

        let failing = args.backend.inapplicable_solve(&problem);
        if failing.is_empty() {
            println!("{} accepts {}", args.backend, path.display());
        } else {
            let mut table = Table::new();
            table.set_header(vec!["Rejected by", "Rule"]);
            for rule in &failing {
                table.add_row(vec![args.backend.to_string(), rule.to_string()]);
            }
            println!("{table}");
        }

        let unfeasible = detect(&problem, &params);
        if unfeasible.is_empty() {
            println!("No unfeasible service in {}", path.display());
        } else {
            let mut table = Table::new();
            table.set_header(vec!["Service", "Point", "Reason"]);
            for record in &unfeasible {
                table.add_row(vec![
                    record.service_id.clone(),
                    record.point_id.clone().unwrap_or_default(),
                    record.reason(),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
