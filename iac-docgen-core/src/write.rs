//! Materializes an [`ArtifactPair`] under `<output_root>/<folder>/`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::contract::ArtifactPair;
use crate::error::WriteError;

/// Fixed file name of the documentation artifact.
pub const DOCUMENT_FILENAME: &str = "README.md";
/// Fixed file name of the diagram script artifact.
pub const DIAGRAM_FILENAME: &str = "generate_diagram.py";

#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_root: PathBuf,
}

impl ArtifactWriter {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// Directory the artifacts of `folder_name` are written to.
    pub fn folder_dir(&self, folder_name: &str) -> PathBuf {
        self.output_root.join(folder_name)
    }

    /// Writes both artifacts, replacing whatever was there before.
    ///
    /// Both contents are staged in temp files next to their targets. A failure
    /// at any point leaves the previous pair (or nothing) in place and no staged
    /// file behind.
    pub fn write(&self, folder_name: &str, artifacts: &ArtifactPair) -> Result<PathBuf, WriteError> {
        let dir = self.folder_dir(folder_name);
        fs::create_dir_all(&dir).map_err(|source| {
            error!(error = ?source, path = %dir.display(), "[WRITE] Failed to create output directory");
            WriteError::CreateDir {
                path: dir.clone(),
                source,
            }
        })?;

        let doc_target = dir.join(DOCUMENT_FILENAME);
        let diagram_target = dir.join(DIAGRAM_FILENAME);

        // Staged files are removed on drop, so every early return cleans up.
        let staged_doc = stage(&dir, &doc_target, artifacts.document.as_str())?;
        let staged_diagram = stage(&dir, &diagram_target, artifacts.diagram.as_str())?;

        let previous_doc = fs::read(&doc_target).ok();
        persist(staged_doc, &doc_target)?;
        if let Err(e) = persist(staged_diagram, &diagram_target) {
            restore(&dir, &doc_target, previous_doc.as_deref());
            return Err(e);
        }

        info!(
            folder = folder_name,
            output_root = %self.output_root.display(),
            path = %dir.display(),
            "[WRITE] Artifacts written"
        );
        Ok(dir)
    }
}

fn staging_file(dir: &Path, target: &Path) -> std::io::Result<NamedTempFile> {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = format!(".{name}.");
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(".tmp");
    // Regular file mode (minus umask) rather than the 0600 of a private temp file.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    builder.tempfile_in(dir)
}

fn stage(dir: &Path, target: &Path, content: &str) -> Result<NamedTempFile, WriteError> {
    let to_error = |source: std::io::Error| {
        error!(error = ?source, path = %target.display(), "[WRITE] Failed to stage artifact");
        WriteError::File {
            path: target.to_path_buf(),
            source,
        }
    };
    let mut staged = staging_file(dir, target).map_err(to_error)?;
    staged.write_all(content.as_bytes()).map_err(to_error)?;
    staged.flush().map_err(to_error)?;
    debug!(path = %target.display(), bytes = content.len(), "[WRITE] Staged artifact");
    Ok(staged)
}

fn persist(staged: NamedTempFile, target: &Path) -> Result<(), WriteError> {
    staged.persist(target).map(|_| ()).map_err(|e| {
        error!(error = ?e.error, path = %target.display(), "[WRITE] Failed to move artifact into place");
        WriteError::File {
            path: target.to_path_buf(),
            source: e.error,
        }
    })
}

/// Puts the document back the way it was before this write started.
fn restore(dir: &Path, target: &Path, previous: Option<&[u8]>) {
    let outcome = match previous {
        Some(bytes) => staging_file(dir, target)
            .and_then(|mut staged| {
                staged.write_all(bytes)?;
                Ok(staged)
            })
            .and_then(|staged| staged.persist(target).map(|_| ()).map_err(|e| e.error)),
        None => fs::remove_file(target),
    };
    match outcome {
        Ok(()) => debug!(path = %target.display(), "[WRITE] Rolled back artifact"),
        Err(e) => warn!(error = ?e, path = %target.display(), "[WRITE] Failed to roll back artifact"),
    }
}
