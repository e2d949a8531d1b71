//! powertopsis CLI
//!
//! Runs the PowerAware ranking engine against cluster snapshot files.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// powertopsis - power-aware TOPSIS node scoring
#[derive(Parser, Debug)]
#[command(name = "powertopsis")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Scoring configuration file (TOML); built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every node of a snapshot for its workload
    Score {
        /// Cluster snapshot (TOML or JSON)
        #[arg(long)]
        snapshot: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Place the snapshot's pending workloads one by one
    Place {
        /// Cluster snapshot (TOML or JSON)
        #[arg(long)]
        snapshot: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the effective scoring configuration
    Config,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        parse_level(&cli.log_level)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Score { snapshot, json } => {
            commands::score(&mut out, cli.config.as_deref(), &snapshot, json)?;
        }
        Commands::Place { snapshot, json } => {
            commands::place(&mut out, cli.config.as_deref(), &snapshot, json)?;
        }
        Commands::Config => {
            commands::show_config(&mut out, cli.config.as_deref())?;
        }
    }

    Ok(())
}
