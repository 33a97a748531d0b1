use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{check::CheckArgs, expand::ExpandArgs, generate::GenerateSubcommands, select::SelectArgs};

mod check;
mod expand;
mod file_utils;
mod generate;
mod parsers;
mod select;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the admission rules a backend rejects and the unfeasible services
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
    /// Writes the sub-problems derived from repetition, several solutions and
    /// batch heuristic requests
    Expand {
        #[command(flatten)]
        args: ExpandArgs,
    },
    /// Shows the heuristic picked by self selection and the tournament candidates
    Select {
        #[command(flatten)]
        args: SelectArgs,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Check { args }) => check::run(args)?,
        Some(Commands::Expand { args }) => expand::run(args)?,
        Some(Commands::Select { args }) => select::run(args)?,
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        None => {}
    }

    Ok(())
}
