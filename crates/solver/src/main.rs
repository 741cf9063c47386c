//! dns01-solver - Main entry point
//!
//! Runs a single Present or CleanUp against SoftLayer DNS, the way the
//! challenge host would invoke the solver.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use dns01_config::SolverSettings;
use dns01_solver::{ChallengeRequest, ChallengeSolver, SoftLayerSolver};

/// ACME DNS-01 challenge solver for SoftLayer DNS
#[derive(Parser, Debug)]
#[command(name = "dns01-solver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Publish the challenge TXT record
    Present(ChallengeArgs),
    /// Remove the challenge TXT record
    #[command(name = "cleanup")]
    CleanUp(ChallengeArgs),
}

#[derive(Args, Debug)]
struct ChallengeArgs {
    /// Fully-qualified challenge name (e.g. _acme-challenge.example.com.)
    #[arg(long)]
    fqdn: String,

    /// Zone the challenge name lives in (e.g. example.com.)
    #[arg(long)]
    zone: String,

    /// TXT value to publish or remove
    #[arg(long)]
    key: String,

    /// Namespace holding the credential secret
    #[arg(long, default_value = "default")]
    namespace: String,

    /// Solver config as inline JSON
    #[arg(long, conflicts_with = "config_file")]
    config: Option<String>,

    /// Solver config read from a JSON file
    #[arg(long)]
    config_file: Option<PathBuf>,
}

impl ChallengeArgs {
    fn into_request(self) -> Result<ChallengeRequest> {
        let config = match (self.config, self.config_file) {
            (Some(inline), _) => Some(inline.into_bytes()),
            (None, Some(path)) => Some(
                std::fs::read(&path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?,
            ),
            (None, None) => None,
        };

        let mut request = ChallengeRequest::new(self.fqdn, self.zone, self.key, self.namespace);
        request.config = config;
        Ok(request)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let settings = SolverSettings::from_env().context("Failed to load solver settings")?;
    let solver = SoftLayerSolver::from_settings(&settings)
        .await
        .context("Failed to initialize solver")?;

    info!(solver = %solver.name(), group_name = %settings.group_name, "Solver ready");

    match cli.command {
        Commands::Present(args) => {
            let request = args.into_request()?;
            solver
                .present(&request)
                .await
                .with_context(|| {
                    format!("Failed to present challenge for {}", request.resolved_fqdn)
                })?;
            info!(fqdn = %request.resolved_fqdn, "Challenge record presented");
        }
        Commands::CleanUp(args) => {
            let request = args.into_request()?;
            solver
                .cleanup(&request)
                .await
                .with_context(|| {
                    format!("Failed to clean up challenge for {}", request.resolved_fqdn)
                })?;
            info!(fqdn = %request.resolved_fqdn, "Challenge record cleaned up");
        }
    }

    Ok(())
}
