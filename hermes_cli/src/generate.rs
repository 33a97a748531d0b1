use std::path::PathBuf;

use clap::Subcommand;
use tracing::info;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    /// JSON schema of the problems accepted by `check`, `expand` and `select`
    JsonSchema {
        /// Schema file, printed on stdout when omitted
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => {
            let schema = hermes_preflight::json::schema::generate_json_schema()?;

            let Some(out) = out else {
                println!("{schema}");
                return Ok(());
            };

            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&out, schema)?;
            info!(path = %out.display(), "problem schema written");
        }
    }

    Ok(())
}
