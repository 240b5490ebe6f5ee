use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use chronic_risk::shell::{Assessment, console, http};
use chronic_risk::utils::logging::init_logging;
use chronic_risk::{AppConfig, Disease, FsArtifactStore, InferenceEngine, RawInput, Trainer};
use clap::{Parser, Subcommand};
use log::info;

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

/// Chronic disease risk assessment
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file (defaults to chronic-risk.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train models from the configured datasets
    Train {
        /// Disease to train, repeatable; all when omitted
        #[arg(short, long)]
        disease: Vec<Disease>,
    },
    /// Answer the questionnaire interactively
    Assess {
        #[arg(short, long)]
        disease: Option<Disease>,
    },
    /// Score a JSON input record and print the assessment as JSON
    Predict {
        #[arg(short, long)]
        disease: Disease,
        /// JSON object mapping feature names to values
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Run the HTTP service
    Serve {
        /// Address to listen on, overriding the configuration
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Print the effective configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let store = Arc::new(FsArtifactStore::new(&config.artifact_dir));

    match cli.command {
        Command::Train { disease } => {
            let diseases = if disease.is_empty() {
                Disease::ALL.to_vec()
            } else {
                disease
            };
            let trainer = Trainer::new(config.training.clone(), store);
            let run = tokio::task::spawn_blocking(move || trainer.train_all(&diseases)).await??;
            for summary in &run.succeeded {
                info!(
                    "{}: test accuracy {:.2}% on {} samples",
                    summary.disease,
                    summary.test.accuracy * 100.0,
                    summary.test.samples
                );
            }
            if !run.is_success() {
                let failed: Vec<String> =
                    run.failed.iter().map(|(d, e)| format!("{d} ({e})")).collect();
                bail!("Training failed for: {}", failed.join(", "));
            }
        }
        Command::Assess { disease } => {
            let engine = InferenceEngine::new(store);
            let stdin = io::stdin();
            console::run_assessment(&engine, disease, stdin.lock(), io::stdout())?;
        }
        Command::Predict { disease, input } => {
            let engine = InferenceEngine::new(store);
            let raw = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let record: RawInput = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid input record in {}", input.display()))?;
            let result = engine.compute_risk(disease, &record)?;
            println!("{}", serde_json::to_string_pretty(&Assessment::new(disease, result))?);
        }
        Command::Serve { bind } => {
            let engine = Arc::new(InferenceEngine::new(store));
            let bind = bind.unwrap_or(config.server.bind);
            http::serve(&bind, engine).await?;
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
