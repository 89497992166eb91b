//! Snake risk daemon
//!
//! Scores Snake gameplay telemetry and asks a language model for a
//! narrative of the result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use riskd::config::Config;
use riskd::{scorecard, server};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "riskd")]
#[command(about = "Snake gameplay risk analysis service", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: /etc/riskd/config.toml, then ./riskd.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve {
        /// Address to listen on, overrides config and environment
        #[arg(long)]
        bind: Option<String>,
    },

    /// Score a metrics JSON document locally, without the narrative
    Score {
        /// JSON file; reads stdin when omitted
        file: Option<PathBuf>,
    },
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    init_logging(&config.log_level);

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => {
            if let Some(addr) = bind {
                config.server.bind_addr = addr;
            }
            info!("riskd v{} starting", env!("CARGO_PKG_VERSION"));
            server::run(config).await
        }
        Commands::Score { file } => {
            let input = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let card = scorecard::score_document(&input)?;
            println!("{}", serde_json::to_string_pretty(&card)?);
            Ok(())
        }
    }
}
