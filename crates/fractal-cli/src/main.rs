//! Fractal - cluster configuration front-end
//!
//! The `fractal` command reads clusters declared in a Nix flake and shows
//! their properties, manifests and validation results.
//!
//! ## Commands
//!
//! - `cluster validate`: Validate every resource of a cluster
//! - `cluster list`: Show all clusters and their properties
//! - `cluster show`: Show the properties of one cluster
//! - `cluster manifests`: List the resources a cluster declares

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fractal_core::render::{render_cluster, render_clusters, render_manifests, render_validation};
use fractal_core::telemetry::init_tracing;
use fractal_core::{spinner, wait_with_progress, OutputConfig, Repository, ValidationResult};
use nix_flake::{Evaluator, Flake, FlakeConfig};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "fractal")]
#[command(author = "Arctarus Limited")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and validate clusters declared in a Nix flake", long_about = None)]
struct Cli {
    /// Flake reference holding the cluster configuration
    #[arg(long, global = true, env = "FRACTAL_FLAKE", default_value = ".")]
    flake: String,

    /// `nix` executable used to evaluate the flake
    #[arg(long, global = true, env = "FRACTAL_NIX", default_value = "nix")]
    nix: PathBuf,

    /// Disable colours and progress spinners
    #[arg(long, global = true)]
    plain: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster operations
    Cluster {
        #[command(subcommand)]
        action: ClusterAction,
    },
}

#[derive(Subcommand)]
enum ClusterAction {
    /// Validate the resources of a cluster
    ///
    /// Exits with status 1 when any resource fails validation.
    Validate {
        /// Cluster name
        cluster: String,
    },

    /// List all clusters and their properties
    List,

    /// Show the properties of a cluster
    Show {
        /// Cluster name
        cluster: String,
    },

    /// List the resources declared by a cluster
    Manifests {
        /// Cluster name
        cluster: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(cli.log_json, level);

    let output = OutputConfig {
        pretty: !cli.plain,
        json: cli.json,
    };
    let repo = Repository::new(Flake::new(flake_config(&cli)));
    let mut stdout = std::io::stdout().lock();

    let Commands::Cluster { action } = cli.command;
    match action {
        ClusterAction::Validate { cluster } => {
            let result = cmd_cluster_validate(&repo, &cluster, &output, &mut stdout).await?;
            Ok(ExitCode::from(validation_exit_code(&result)))
        }
        ClusterAction::List => {
            cmd_cluster_list(&repo, &output, &mut stdout).await?;
            Ok(ExitCode::SUCCESS)
        }
        ClusterAction::Show { cluster } => {
            cmd_cluster_show(&repo, &cluster, &output, &mut stdout).await?;
            Ok(ExitCode::SUCCESS)
        }
        ClusterAction::Manifests { cluster } => {
            cmd_cluster_manifests(&repo, &cluster, &output, &mut stdout).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Flake settings after clap has applied `FRACTAL_FLAKE` and `FRACTAL_NIX`
fn flake_config(cli: &Cli) -> FlakeConfig {
    FlakeConfig::new(&cli.flake).with_nix_bin(&cli.nix)
}

/// 1 when any resource failed validation, 0 otherwise
fn validation_exit_code(result: &ValidationResult) -> u8 {
    if result.has_errors() {
        1
    } else {
        0
    }
}

/// Run a repository query on a worker thread, with a spinner in pretty mode.
///
/// The spinner is cleared before returning so rendering starts on a clean line.
async fn evaluate<E, T, F>(
    repo: &Repository<E>,
    output: &OutputConfig,
    message: &str,
    query: F,
) -> fractal_core::Result<T>
where
    E: Evaluator + Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&Repository<E>) -> fractal_core::Result<T> + Send + 'static,
{
    let bar = output.pretty.then(|| spinner(message));
    let worker = repo.clone();

    let result = wait_with_progress(move || query(&worker), bar.as_ref()).await;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    result
}

// ========== Cluster Commands ==========

/// Validate a cluster and render the result
async fn cmd_cluster_validate<E>(
    repo: &Repository<E>,
    cluster: &str,
    output: &OutputConfig,
    out: &mut dyn Write,
) -> Result<ValidationResult>
where
    E: Evaluator + Send + Sync + 'static,
{
    let name = cluster.to_string();
    let result = evaluate(repo, output, "validating cluster resources", move |repo| {
        repo.validate_cluster(&name)
    })
    .await
    .with_context(|| format!("Failed to validate cluster {}", cluster))?;

    render_validation(&result, output, out).context("Failed to render validation result")?;

    let counts = result.counts();
    info!(
        cluster,
        success = counts.success,
        warning = counts.warning,
        error = counts.error,
        "Cluster validated"
    );

    Ok(result)
}

/// Show all clusters
async fn cmd_cluster_list<E>(
    repo: &Repository<E>,
    output: &OutputConfig,
    out: &mut dyn Write,
) -> Result<()>
where
    E: Evaluator + Send + Sync + 'static,
{
    let clusters = evaluate(repo, output, "reading clusters", |repo| {
        repo.get_clusters_properties()
    })
    .await
    .context("Failed to read clusters")?;

    render_clusters(&clusters, output, out).context("Failed to render clusters")?;
    info!(count = clusters.len(), "Clusters listed");

    Ok(())
}

/// Show one cluster's properties
async fn cmd_cluster_show<E>(
    repo: &Repository<E>,
    cluster: &str,
    output: &OutputConfig,
    out: &mut dyn Write,
) -> Result<()>
where
    E: Evaluator + Send + Sync + 'static,
{
    let name = cluster.to_string();
    let properties = evaluate(repo, output, "reading cluster", move |repo| {
        repo.get_cluster_properties(&name)
    })
    .await
    .with_context(|| format!("Failed to read cluster {}", cluster))?;

    render_cluster(&properties, output, out).context("Failed to render cluster")?;

    Ok(())
}

/// List the manifests of a cluster
async fn cmd_cluster_manifests<E>(
    repo: &Repository<E>,
    cluster: &str,
    output: &OutputConfig,
    out: &mut dyn Write,
) -> Result<()>
where
    E: Evaluator + Send + Sync + 'static,
{
    let name = cluster.to_string();
    let manifests = evaluate(repo, output, "evaluating cluster manifests", move |repo| {
        repo.get_cluster_manifests(&name)
    })
    .await
    .with_context(|| format!("Failed to read manifests of cluster {}", cluster))?;

    render_manifests(&manifests, output, out).context("Failed to render manifests")?;
    info!(cluster, count = manifests.len(), "Manifests listed");

    Ok(())
}
