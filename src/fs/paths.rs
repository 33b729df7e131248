//! Per-profile directory layout.
//!
//! ```text
//! <base>/<username>/
//!   posts/                        permanent artifacts
//!   temp_download/<shortcode>/    per-post staging
//!   hash.txt                      custody manifest
//!   download_log_<timestamp>.txt  per-run log
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{Error, Result};

/// Resolved paths for one profile's on-disk tree.
#[derive(Debug, Clone)]
pub struct ProfileLayout {
    root: PathBuf,
    posts: PathBuf,
    staging_root: PathBuf,
    manifest: PathBuf,
}

impl ProfileLayout {
    /// Build the layout for `username` under `base_dir`.
    ///
    /// The username is validated as a single path component so a crafted
    /// profile input can never escape the download directory.
    pub fn new(base_dir: &Path, username: &str) -> Result<Self> {
        let folder = sanitize_path_component(username)?;
        let root = base_dir.join(folder);

        Ok(Self {
            posts: root.join("posts"),
            staging_root: root.join("temp_download"),
            manifest: root.join("hash.txt"),
            root,
        })
    }

    /// Create the profile root and posts directories.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.posts)?;
        Ok(())
    }

    /// Profile root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Permanent posts directory.
    pub fn posts(&self) -> &Path {
        &self.posts
    }

    /// Root of the staging area.
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Staging subdirectory for one post.
    pub fn staging_for(&self, shortcode: &str) -> PathBuf {
        self.staging_root.join(shortcode)
    }

    /// Custody manifest path.
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    /// Per-run log file path, timestamped at `now`.
    pub fn log_file(&self, now: DateTime<Local>) -> PathBuf {
        self.root
            .join(format!("download_log_{}.txt", now.format("%Y%m%d_%H%M%S")))
    }
}

/// Validate a string as a single, traversal-free path component.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    if name.contains("..") {
        return Err(Error::InvalidPath(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(Error::InvalidPath(format!(
            "Path separators not allowed: '{}'",
            name
        )));
    }

    if name.trim().is_empty() {
        return Err(Error::InvalidPath(
            "Path component cannot be empty".to_string(),
        ));
    }

    Ok(name.to_string())
}
