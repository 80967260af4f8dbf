//! # contract: data passed between pipeline stages, and the traits at its seams
//!
//! The pipeline is linear per folder:
//! folder → [`SourceCorpus`] → [`GenerationRequest`] → response `String` → [`ArtifactPair`] → files.
//!
//! Two seams are traits so they can be swapped or mocked:
//! - [`Generator`]: the external text-generation service. The real client lives in the
//!   CLI crate; tests use the `mockall` generated `MockGenerator`.
//! - [`ResponseSplitter`]: the strategy that turns free-form model output into the two
//!   artifacts. The default is [`crate::split::FenceSplitter`].
//!
//! ## Mocking & Testing
//! Both traits are annotated for `mockall`. Mocks are exported under the
//! `test-export-mocks` feature so integration tests and downstream crates can use them.

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

use crate::error::{GenerationError, MalformedResponseError};

/// Concatenated infrastructure source for one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceCorpus {
    /// Display name of the infrastructure folder (its directory name).
    pub folder_name: String,
    /// File contents, each followed by a blank line, in discovery order.
    pub text: String,
    /// Number of recognized files that contributed to `text`.
    pub file_count: usize,
}

impl SourceCorpus {
    /// True when nothing but whitespace was collected; such folders are skipped.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Message role understood by chat-style generation services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// The two-message request sent once per folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub folder_name: String,
    /// Fixed instructions: output format, icon vocabulary, diagram rules, the corpus.
    pub instruction: Message,
    /// The task itself, restating the corpus.
    pub task: Message,
}

impl GenerationRequest {
    /// Messages in the order they are sent.
    pub fn messages(&self) -> [&Message; 2] {
        [&self.instruction, &self.task]
    }
}

/// Cleaned README text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentArtifact(pub String);

/// Cleaned diagram script body. Never executed or validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramArtifact(pub String);

impl DocumentArtifact {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DiagramArtifact {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Both artifacts for a folder. Only ever built once both halves were derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPair {
    pub document: DocumentArtifact,
    pub diagram: DiagramArtifact,
}

/// Text-generation backend: request in, one combined string out.
///
/// Implementations must not retry; every failure is surfaced as a
/// [`GenerationError`] and aborts the current folder only.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Strategy for decomposing a combined response into the two artifacts.
///
/// Must be a pure function of `response`, and must fail rather than return
/// an empty artifact.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait ResponseSplitter: Send + Sync {
    fn split(&self, response: &str) -> Result<ArtifactPair, MalformedResponseError>;
}
