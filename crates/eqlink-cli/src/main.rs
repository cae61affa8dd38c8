use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod error;
mod run;

#[derive(Parser)]
#[command(
    name = "eqlink",
    version,
    about = "Equipment catalog maintenance: merge duplicates, canonicalize key order",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge duplicate equipment definitions and write a canonical catalog
    Merge {
        /// Input catalog (YAML)
        input: PathBuf,

        /// Output file (defaults to <input>.merged.yaml next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Reorder catalog keys to the canonical order without changing content
    Reorder {
        /// Input catalog (YAML)
        input: PathBuf,

        /// Output file (defaults to <input>.reordered.yaml next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Merge { input, output } => run::run_merge(&input, output),
        Command::Reorder { input, output } => run::run_reorder(&input, output),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code as i32);
        }
    }
}
