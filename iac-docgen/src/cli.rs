///
/// This module implements the CLI interface for iac-docgen: command parsing,
/// configuration loading and the async entrypoint used by `main()` and tests.
///
/// All pipeline logic (aggregation, request building, splitting, writing) lives in
/// the [`iac-docgen-core`] crate. This module is CLI glue only.
///
/// ## How To Use
/// - From the shell: `iac-docgen generate --config docgen.yaml` (see `--help`).
/// - Programmatically: call [`run`] with a constructed [`Cli`].
///
/// [`iac-docgen-core`]: ../../iac-docgen-core/
use crate::generate::OpenAiClient;
use crate::load_config::{load_config, CliConfig, Overrides};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iac_docgen_core::pipeline::{process_repository, FolderOutcome};
use iac_docgen_core::split::FenceSplitter;
use std::path::PathBuf;

/// CLI for iac-docgen: document infrastructure-as-code folders.
#[derive(Parser)]
#[clap(
    name = "iac-docgen",
    version,
    about = "Generate a README and an architecture diagram script for every infrastructure folder"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate README.md and generate_diagram.py for each folder under the source directory
    Generate {
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Directory whose immediate subfolders are documented (overrides `source_dir`)
        #[clap(long)]
        source: Option<PathBuf>,
        /// Root directory for the generated artifacts (overrides `output_dir`)
        #[clap(long)]
        output: Option<PathBuf>,
        /// Number of folders processed at once (overrides `concurrency`)
        #[clap(long)]
        concurrency: Option<usize>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Generate {
            config,
            source,
            output,
            concurrency,
        } => {
            let file_config = match config {
                Some(path) => load_config(path)?,
                None => CliConfig::default(),
            };
            let overrides = Overrides {
                source_dir: source,
                output_dir: output,
                concurrency,
            };
            let pipeline_config = file_config
                .pipeline_config(&overrides)
                .context("Invalid pipeline configuration")?;
            let generation_config = file_config
                .generation_config()
                .context("Invalid generation configuration")?;
            pipeline_config.trace_loaded();
            generation_config.trace_loaded();

            let client = OpenAiClient::new(generation_config)
                .context("Failed to construct generation client")?;

            tracing::info!(command = "generate", "Starting documentation generation");
            let report = process_repository(&pipeline_config, &client, &FenceSplitter)
                .await
                .context("Documentation run failed")?;

            for outcome in &report.outcomes {
                match outcome {
                    FolderOutcome::Written { folder, directory } => {
                        println!("[written] {folder} -> {}", directory.display())
                    }
                    FolderOutcome::Skipped { folder, reason } => {
                        println!("[skipped] {folder}: {reason}")
                    }
                    FolderOutcome::Failed {
                        folder,
                        stage,
                        error,
                    } => println!("[failed]  {folder} ({stage:?}): {error}"),
                }
            }

            if report.failed() > 0 {
                tracing::error!(
                    command = "generate",
                    failed = report.failed(),
                    "Documentation generation finished with failures"
                );
                anyhow::bail!(
                    "{} of {} folders failed",
                    report.failed(),
                    report.outcomes.len()
                );
            }
            tracing::info!(
                command = "generate",
                written = report.written(),
                skipped = report.skipped(),
                "Documentation generation complete"
            );
            Ok(())
        }
    }
}
