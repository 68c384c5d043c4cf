//! cardiorisk: Heart disease risk inference
//!
//! Command-line delivery for the prediction service. Reads a JSON record,
//! prints `{"status": <code>, "body": <response>}` on stdout.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cardiorisk::adapters::sanitize::{install_panic_hook, SanitizingMakeWriter};
use cardiorisk::application::{ExtraFields, ModelSlot, ResponseMode, ValueCheck};
use cardiorisk::domain::FEATURE_ORDER;
use cardiorisk::{PredictionService, ServiceConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Heart disease risk prediction")]
struct Cli {
    /// Candidate artifact location (repeatable, highest priority first).
    /// Overrides CARDIORISK_MODEL_PATHS.
    #[arg(long = "model-path", global = true)]
    model_paths: Vec<PathBuf>,

    /// Require a matching <artifact>.sha256 sidecar.
    #[arg(long, global = true)]
    require_digest: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict from a JSON record (file or stdin).
    Predict {
        /// Input file; reads stdin when omitted.
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Emit only prediction and probability.
        #[arg(long)]
        basic: bool,

        /// Check flag and categorical codes against their domains.
        #[arg(long)]
        strict: bool,

        /// Reject fields outside the canonical set.
        #[arg(long)]
        reject_extra: bool,
    },
    /// Resolve the model artifact and report every candidate tried.
    CheckModel,
    /// Print the canonical feature order.
    Fields,
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // stdout carries the response; logs go to stderr unless a file is requested.
    let log_mode = std::env::var("CARDIORISK_LOG_MODE").unwrap_or_else(|_| "stderr".to_string());

    let (writer, guard) = if log_mode == "file" {
        let log_file = std::env::var("CARDIORISK_LOG_FILE")
            .unwrap_or_else(|_| "cardiorisk.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("Failed to open log file {log_file}"))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stderr())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    Ok(guard)
}

fn main() -> Result<ExitCode> {
    let _guard = init_logging()?;
    install_panic_hook();
    let cli = Cli::parse();

    let mut config = ServiceConfig::from_env()?;
    if !cli.model_paths.is_empty() {
        config.model_paths = cli.model_paths.clone();
    }
    config.require_digest |= cli.require_digest;

    match cli.command {
        Command::Fields => {
            println!("{}", serde_json::to_string_pretty(&FEATURE_ORDER)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::CheckModel => {
            let report = config.loader().load();
            let attempts: Vec<_> = report
                .attempts
                .iter()
                .map(|a| json!({ "path": a.path, "outcome": a.outcome.to_string() }))
                .collect();
            let loaded = report.handle.as_ref().map(|h| {
                json!({
                    "source": h.source(),
                    "classifier": h.classifier().name(),
                    "scaled": h.scaler().is_some(),
                })
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "loaded": loaded, "attempts": attempts }))?
            );
            Ok(if report.is_loaded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Predict {
            input,
            basic,
            strict,
            reject_extra,
        } => {
            if basic {
                config.response_mode = ResponseMode::Basic;
            }
            if strict {
                config.value_check = ValueCheck::Strict;
            }
            if reject_extra {
                config.extra_fields = ExtraFields::Reject;
            }

            let body = match &input {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read input {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };

            let slot = Arc::new(ModelSlot::eager(config.loader()));
            let service = PredictionService::from_config(slot, &config);
            let response = service.handle_json(&body);

            println!(
                "{}",
                serde_json::to_string_pretty(
                    &json!({ "status": response.status, "body": response.body })
                )?
            );
            Ok(if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
