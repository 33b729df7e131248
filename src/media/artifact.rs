//! Artifact classification.

use std::path::Path;

/// What the pipeline does with a downloaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Media bytes: hashed into the manifest.
    Binary,
    /// JSON metadata sidecar: hashed and transcoded to text.
    Metadata,
    /// Already human-readable text: left alone.
    PlainText,
}

/// Classify an artifact by its extension.
pub fn classify_artifact(path: &Path) -> ArtifactKind {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("json") => ArtifactKind::Metadata,
        Some("txt") => ArtifactKind::PlainText,
        _ => ArtifactKind::Binary,
    }
}
