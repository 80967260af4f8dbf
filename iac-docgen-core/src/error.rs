//! Error types for every pipeline stage.
//!
//! Per-folder failures ([`AggregationError`], [`GenerationError`],
//! [`MalformedResponseError`], [`WriteError`]) are caught by the repository
//! walker and recorded against the folder; only [`ConfigError`] and
//! [`PipelineError`] abort a whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Startup-time configuration problems. Fatal for the whole process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("invalid configuration value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// The folder (or one of its files) could not be read.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("aggregation task did not complete: {0}")]
    Interrupted(String),
}

/// The generation service call failed. No retry is attempted.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to generation service failed: {0}")]
    Transport(String),

    #[error("generation service rate limited the request")]
    RateLimited,

    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode generation response: {0}")]
    Decode(String),

    #[error("generation service returned no content")]
    EmptyResponse,
}

/// The combined response could not be split into both artifacts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedResponseError {
    #[error("response contains no ```python fence for the diagram script")]
    MissingDiagramFence,

    #[error("diagram script block is empty")]
    EmptyDiagram,

    #[error("documentation section is empty")]
    EmptyDocument,
}

/// The output directory or one of the artifact files could not be written.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure that aborts a single folder's processing.
#[derive(Debug, Error)]
pub enum FolderError {
    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponseError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Failures that stop the whole run before any folder is attempted.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to list infrastructure folders in {path}: {source}")]
    SourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
