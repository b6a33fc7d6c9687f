use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gherkin_dict_cli::config::DEFAULT_CONFIG_PATH;
use gherkin_dict_cli::{load_config, run_generate, run_search, run_stats, CliError, GenerateArgs, SearchArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gherkin-dict", version, about = "Gherkin step dictionary")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a snapshot document from an export file.
    Generate(GenerateArgs),
    /// Search a snapshot document.
    Search(SearchArgs),
    /// Print snapshot metrics.
    Stats {
        #[arg(long)]
        snapshot: PathBuf,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("gherkin-dict failed: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let lines = match cli.command {
        Command::Generate(args) => {
            let config = load_config(&cli.config)?;
            let report = run_generate(&args, &config)?;
            vec![format!(
                "Generated {} steps into {}",
                report.steps,
                report.output.display()
            )]
        }
        Command::Search(args) => run_search(&args)?,
        Command::Stats { snapshot } => run_stats(&snapshot)?,
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
