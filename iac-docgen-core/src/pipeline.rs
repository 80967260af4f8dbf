//! High-level pipeline: walks a repository and documents each infrastructure folder.
//!
//! For every immediate subfolder of the configured source directory this module runs
//!   - aggregation of the folder's Terraform/CDK sources into one corpus ([`crate::aggregate`])
//!   - request construction ([`crate::prompt`])
//!   - the generation call through a [`Generator`]
//!   - splitting of the response through a [`ResponseSplitter`]
//!   - writing of `README.md` and `generate_diagram.py` ([`crate::write`])
//!
//! # Isolation
//! A failure in one folder is logged with the folder name, recorded in the
//! [`RunReport`], and the run moves on to the next folder. Nothing is written
//! for a folder unless both artifacts were derived. Folders without any
//! recognized source are skipped before a request is sent.
//!
//! # Concurrency
//! `PipelineConfig::concurrency == 1` processes folders strictly one after the
//! other. Larger values keep at most that many folder pipelines in flight.
//!
//! # Navigation
//! - Main entrypoint: [`process_repository`]
//! - Single folder: [`process_folder`]

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::aggregate::aggregate;
use crate::config::PipelineConfig;
use crate::contract::{Generator, ResponseSplitter, SourceCorpus};
use crate::error::{AggregationError, FolderError, PipelineError};
use crate::prompt::build_request;
use crate::write::ArtifactWriter;

/// Pipeline step a folder failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Aggregate,
    Generate,
    Split,
    Write,
}

impl From<&FolderError> for Stage {
    fn from(e: &FolderError) -> Self {
        match e {
            FolderError::Aggregation(_) => Stage::Aggregate,
            FolderError::Generation(_) => Stage::Generate,
            FolderError::MalformedResponse(_) => Stage::Split,
            FolderError::Write(_) => Stage::Write,
        }
    }
}

/// What happened to one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FolderOutcome {
    Written { folder: String, directory: PathBuf },
    Skipped { folder: String, reason: String },
    Failed { folder: String, stage: Stage, error: String },
}

impl FolderOutcome {
    pub fn folder(&self) -> &str {
        match self {
            FolderOutcome::Written { folder, .. }
            | FolderOutcome::Skipped { folder, .. }
            | FolderOutcome::Failed { folder, .. } => folder,
        }
    }
}

/// Outcome of every folder in one run, in folder-name order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub outcomes: Vec<FolderOutcome>,
}

impl RunReport {
    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, FolderOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FolderOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FolderOutcome::Failed { .. }))
    }

    pub fn outcome(&self, folder: &str) -> Option<&FolderOutcome> {
        self.outcomes.iter().find(|o| o.folder() == folder)
    }

    fn count(&self, pred: impl Fn(&FolderOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Immediate, non-hidden subdirectories of `source_dir`, sorted by name.
///
/// `output_dir` is left out when it lives inside `source_dir`, so earlier
/// artifacts are never documented again.
pub fn list_folders(source_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let to_error = |source: std::io::Error| PipelineError::SourceDir {
        path: source_dir.to_path_buf(),
        source,
    };
    let output_root = std::fs::canonicalize(output_dir).ok();
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(source_dir).map_err(to_error)? {
        let entry = entry.map_err(to_error)?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !path.is_dir() || hidden {
            continue;
        }
        if output_root.is_some() && std::fs::canonicalize(&path).ok() == output_root {
            debug!(path = %path.display(), "[PIPELINE] Skipping output directory");
            continue;
        }
        folders.push(path);
    }
    folders.sort();
    Ok(folders)
}

/// Documents every infrastructure folder under `config.source_dir`.
///
/// Only a source directory that cannot be listed fails the run; per-folder
/// problems end up in the returned [`RunReport`].
pub async fn process_repository<G, S>(
    config: &PipelineConfig,
    generator: &G,
    splitter: &S,
) -> Result<RunReport, PipelineError>
where
    G: Generator + ?Sized,
    S: ResponseSplitter + ?Sized,
{
    let run_id = Uuid::new_v4().to_string();
    let span = info_span!("run", run_id = %run_id);

    async move {
        info!(source_dir = %config.source_dir.display(), "[PIPELINE] Starting documentation run");
        let folders = list_folders(&config.source_dir, &config.output_dir).map_err(|e| {
            error!(error = %e, "[PIPELINE][ERROR] Cannot list infrastructure folders");
            e
        })?;
        info!(folders = folders.len(), "[PIPELINE] Discovered infrastructure folders");

        let writer = ArtifactWriter::new(&config.output_dir);
        let writer = &writer;
        let outcomes: Vec<FolderOutcome> = stream::iter(folders)
            .map(move |folder| async move { process_folder(&folder, generator, splitter, writer).await })
            .buffered(config.concurrency.max(1))
            .collect()
            .await;

        let report = RunReport { run_id, outcomes };
        info!(
            written = report.written(),
            skipped = report.skipped(),
            failed = report.failed(),
            "[PIPELINE] Documentation run finished"
        );
        match serde_json::to_string_pretty(&report) {
            Ok(json) => debug!(json = %json, "[PIPELINE][DEBUG] Run report"),
            Err(e) => error!(error = ?e, "[PIPELINE][DEBUG] Failed to serialize run report"),
        }
        Ok(report)
    }
    .instrument(span)
    .await
}

/// Runs the whole pipeline for one folder. Never fails: errors become [`FolderOutcome::Failed`].
pub async fn process_folder<G, S>(
    folder: &Path,
    generator: &G,
    splitter: &S,
    writer: &ArtifactWriter,
) -> FolderOutcome
where
    G: Generator + ?Sized,
    S: ResponseSplitter + ?Sized,
{
    let folder_name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string());

    let corpus = match load_corpus(folder).await {
        Ok(corpus) => corpus,
        Err(e) => {
            warn!(folder = %folder_name, error = %e, "[PIPELINE] Folder unreadable, skipping");
            return FolderOutcome::Skipped {
                folder: folder_name,
                reason: e.to_string(),
            };
        }
    };
    if corpus.is_blank() {
        info!(folder = %folder_name, "[PIPELINE] No infrastructure code found, skipping");
        return FolderOutcome::Skipped {
            folder: folder_name,
            reason: "no recognized infrastructure files".to_string(),
        };
    }

    match synthesize(&folder_name, &corpus, generator, splitter, writer).await {
        Ok(directory) => {
            info!(folder = %folder_name, path = %directory.display(), "[PIPELINE] Documentation generated");
            FolderOutcome::Written {
                folder: folder_name,
                directory,
            }
        }
        Err(e) => {
            let stage = Stage::from(&e);
            error!(folder = %folder_name, ?stage, error = %e, "[PIPELINE][ERROR] Folder failed");
            FolderOutcome::Failed {
                folder: folder_name,
                stage,
                error: e.to_string(),
            }
        }
    }
}

async fn load_corpus(folder: &Path) -> Result<SourceCorpus, AggregationError> {
    let path = folder.to_path_buf();
    tokio::task::spawn_blocking(move || aggregate(&path))
        .await
        .map_err(|e| AggregationError::Interrupted(e.to_string()))?
}

async fn synthesize<G, S>(
    folder_name: &str,
    corpus: &SourceCorpus,
    generator: &G,
    splitter: &S,
    writer: &ArtifactWriter,
) -> Result<PathBuf, FolderError>
where
    G: Generator + ?Sized,
    S: ResponseSplitter + ?Sized,
{
    let request = build_request(folder_name, corpus);
    info!(folder = %folder_name, files = corpus.file_count, "[PIPELINE] Requesting documentation");
    let response = generator.generate(&request).await?;
    debug!(folder = %folder_name, bytes = response.len(), "[PIPELINE] Received generation response");

    // Both artifacts exist in memory before anything touches the disk.
    let artifacts = splitter.split(&response)?;
    Ok(writer.write(folder_name, &artifacts)?)
}
