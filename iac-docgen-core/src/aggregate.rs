//! Collects the infrastructure source files of one folder into a single corpus.

use std::path::Path;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::contract::SourceCorpus;
use crate::error::AggregationError;

/// Recognized source formats, in the order their files are appended to the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Terraform `.tf`
    Terraform,
    /// CDK in TypeScript, `.ts`
    CdkTypeScript,
    /// CDK in Python, `.py`
    CdkPython,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 3] = [
        SourceFormat::Terraform,
        SourceFormat::CdkTypeScript,
        SourceFormat::CdkPython,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Terraform => "tf",
            SourceFormat::CdkTypeScript => "ts",
            SourceFormat::CdkPython => "py",
        }
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.extension())
    }
}

/// Directories never descended into: dependency trees and synthesized output.
const SKIPPED_DIRS: [&str; 2] = ["node_modules", "cdk.out"];

fn is_walkable(entry: &DirEntry) -> bool {
    // The root itself is always walked, whatever its name.
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_str().unwrap_or("");
    if name.starts_with('.') {
        return false;
    }
    !(entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name))
}

/// Reads every recognized file below `folder` and concatenates the contents.
///
/// One recursive pass is made per [`SourceFormat`], so Terraform files come
/// first, then TypeScript, then Python. Within a pass the order is whatever the
/// filesystem yields and is not stable across platforms.
///
/// A folder with no recognized files yields an empty corpus, not an error.
pub fn aggregate(folder: &Path) -> Result<SourceCorpus, AggregationError> {
    let folder_name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string());
    debug!(folder = %folder_name, path = %folder.display(), "Aggregating infrastructure sources");

    let mut text = String::new();
    let mut file_count = 0;

    for format in SourceFormat::ALL {
        for entry in WalkDir::new(folder).into_iter().filter_entry(is_walkable) {
            let entry = entry.map_err(|source| AggregationError::Walk {
                path: folder.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !format.matches(path) {
                continue;
            }
            let content =
                std::fs::read_to_string(path).map_err(|source| AggregationError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            debug!(path = %path.display(), size = content.len(), ?format, "Collected source file");
            text.push_str(&content);
            text.push_str("\n\n");
            file_count += 1;
        }
    }

    info!(folder = %folder_name, files = file_count, bytes = text.len(), "Aggregated corpus");
    Ok(SourceCorpus {
        folder_name,
        text,
        file_count,
    })
}
