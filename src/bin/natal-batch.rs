//! # Natal Batch CLI
//!
//! Normalizes profile batches for the scoring pipeline, follows a running
//! batch through its output artifacts, and exposes the translation table.
//!
//! ## Usage
//!
//! ```bash
//! natal-batch normalize profiles.json -o profiles_converted.txt
//! natal-batch monitor --target 1000 --artifact-dir outputs
//! natal-batch translate planets Sun
//! natal-batch export-translations signs
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use natal_batch::logging;
use natal_batch::monitor::{ConsoleReporter, MonitorOutcome, ProgressMonitor, TracingReporter};
use natal_batch::normalizer;
use natal_batch::{BatchConfig, Category, TranslationTable};

#[derive(Parser)]
#[command(name = "natal-batch")]
#[command(about = "Prepare, follow, and localize natal-chart scoring batches")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file (default: ./natal-batch.toml or ./config/natal-batch.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON array of profiles into the canonical stream
    Normalize {
        /// Input container (JSON array of profile objects)
        input: PathBuf,

        /// Destination of the canonical stream
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Follow a running batch through its output artifacts
    Monitor {
        /// Expected number of profiles
        #[arg(short, long)]
        target: Option<usize>,

        /// Delay between polls in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Directory holding the default artifact file names
        #[arg(long)]
        artifact_dir: Option<PathBuf>,

        #[arg(long)]
        summary: Option<PathBuf>,

        #[arg(long)]
        results: Option<PathBuf>,

        #[arg(long)]
        totals: Option<PathBuf>,

        /// Emit structured log events instead of the console progress line
        #[arg(long)]
        quiet: bool,
    },

    /// Translate one canonical term
    Translate {
        /// Category (aspects, planets, signs)
        category: Category,
        term: String,
    },

    /// Print translation mappings as JSON
    ExportTranslations {
        /// Restrict to one category
        category: Option<Category>,
    },

    /// Decode a canonical stream and print its profiles as a JSON array
    Decode { stream: PathBuf },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logging::init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            let mut config = BatchConfig::load_from_file(path)?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            config
        }
        None => BatchConfig::load()?,
    };

    match cli.command {
        Commands::Normalize {
            input,
            output,
            json,
        } => {
            let output = output.unwrap_or(config.normalizer.output_path);
            let report = normalizer::normalize_file(&input, &output)
                .with_context(|| format!("Failed to normalize {}", input.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "✅ Converted {} profiles to batch processor format",
                    report.accepted
                );
                for rejected in &report.rejected {
                    println!("⚠️  Profile {}: {}", rejected.index, rejected.reason);
                }
                println!("📁 Saved to {}", output.display());
            }
        }

        Commands::Monitor {
            target,
            interval_ms,
            artifact_dir,
            summary,
            results,
            totals,
            quiet,
        } => {
            let mut monitor_config = config.monitor;
            if let Some(dir) = artifact_dir {
                monitor_config = monitor_config.with_artifact_dir(&dir);
            }
            if let Some(target) = target {
                monitor_config.target_count = target;
            }
            if let Some(interval_ms) = interval_ms {
                monitor_config.poll_interval_ms = interval_ms;
            }
            if let Some(path) = summary {
                monitor_config.summary_path = path;
            }
            if let Some(path) = results {
                monitor_config.results_path = path;
            }
            if let Some(path) = totals {
                monitor_config.totals_path = path;
            }

            let cancel = CancellationToken::new();
            tokio::spawn(cancel_on_shutdown(cancel.clone()));

            let outcome = if quiet {
                let mut monitor = ProgressMonitor::new(monitor_config, TracingReporter)?;
                monitor.run(cancel).await
            } else {
                println!(
                    "🔍 Monitoring batch processing - {} profiles",
                    monitor_config.target_count
                );
                println!("{}", "=".repeat(60));
                let mut monitor = ProgressMonitor::new(monitor_config, ConsoleReporter::stdout())?;
                monitor.run(cancel).await
            };

            match outcome {
                MonitorOutcome::Completed(snapshot) => {
                    info!(processed = snapshot.processed_count, "Batch complete");
                }
                MonitorOutcome::Cancelled(snapshot) => {
                    info!(processed = snapshot.processed_count, "Monitoring cancelled");
                }
            }
        }

        Commands::Translate { category, term } => {
            let table = TranslationTable::french();
            println!("{}", table.lookup(category, &term));
        }

        Commands::ExportTranslations { category } => {
            let table = TranslationTable::french();
            let categories = match category {
                Some(category) => vec![category],
                None => Category::ALL.to_vec(),
            };
            let export: BTreeMap<String, BTreeMap<String, String>> = categories
                .into_iter()
                .map(|category| (category.to_string(), table.category_map(category)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&export)?);
        }

        Commands::Decode { stream } => {
            let content = std::fs::read_to_string(&stream)
                .with_context(|| format!("Failed to read {}", stream.display()))?;
            let profiles = normalizer::decode_canonical_stream(&content)?;
            println!("{}", serde_json::to_string_pretty(&profiles)?);
        }
    }

    Ok(())
}

/// Cancel `token` on Ctrl+C or SIGTERM
async fn cancel_on_shutdown(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    token.cancel();
}
