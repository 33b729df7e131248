//! The per-profile custody manifest.
//!
//! One line per hashed artifact, `<digest> *<relative-path>`, in the format
//! consumed by common checksum verifiers. Entries from earlier runs are kept
//! so the ledger stays consistent with whole-post resume.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::manifest::digest::md5_file;

/// First line of every manifest file.
pub const MANIFEST_HEADER: &str = "# MD5 hashes of downloaded files";

struct ManifestInner {
    file: File,
    seen_paths: HashSet<String>,
}

/// Append-only manifest writer shared across concurrently completing posts.
///
/// All appends go through one mutex so two posts finishing at the same time
/// can never interleave partial lines.
pub struct ManifestWriter {
    path: PathBuf,
    base_dir: PathBuf,
    inner: Mutex<ManifestInner>,
}

impl ManifestWriter {
    /// Open (or create) the manifest at `path`.
    ///
    /// Existing entry lines are parsed so re-runs append only artifacts not
    /// already recorded; a new or empty manifest gets the header line.
    pub fn open(path: &Path) -> Result<Self> {
        let base_dir = path
            .parent()
            .ok_or_else(|| Error::InvalidPath(format!("manifest path has no parent: {}", path.display())))?
            .to_path_buf();

        let mut seen_paths = HashSet::new();
        let mut needs_header = true;

        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                let line = line?;
                if line.starts_with('#') {
                    needs_header = false;
                    continue;
                }
                if let Some(entry_path) = parse_entry_path(&line) {
                    needs_header = false;
                    seen_paths.insert(entry_path.to_string());
                }
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if needs_header {
            writeln!(file, "{}", MANIFEST_HEADER)?;
            file.flush()?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            inner: Mutex::new(ManifestInner { file, seen_paths }),
        })
    }

    /// Hash `artifact` and append its entry.
    ///
    /// Returns `Ok(true)` if a new line was written, `Ok(false)` if the
    /// artifact's relative path was already recorded.
    pub fn record(&self, artifact: &Path) -> Result<bool> {
        let digest = md5_file(artifact)?;
        let relative = self.relative_path(artifact);

        let mut inner = self
            .inner
            .lock()
            .map_err(|_| Error::Io(std::io::Error::other("manifest lock poisoned")))?;

        if inner.seen_paths.contains(&relative) {
            return Ok(false);
        }

        writeln!(inner.file, "{} *{}", digest, relative)?;
        inner.file.flush()?;
        inner.seen_paths.insert(relative);
        Ok(true)
    }

    /// Number of entries currently recorded.
    pub fn entry_count(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.seen_paths.len())
            .unwrap_or(0)
    }

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn relative_path(&self, artifact: &Path) -> String {
        artifact
            .strip_prefix(&self.base_dir)
            .unwrap_or(artifact)
            .to_string_lossy()
            .into_owned()
    }
}

/// Extract the path field from a `<digest> *<path>` entry line.
fn parse_entry_path(line: &str) -> Option<&str> {
    let (digest, rest) = line.split_once(" *")?;
    if digest.len() == 32 && digest.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_new_manifest_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("hash.txt");
        ManifestWriter::open(&manifest_path).unwrap();

        let content = std::fs::read_to_string(&manifest_path).unwrap();
        assert_eq!(content, format!("{}\n", MANIFEST_HEADER));
    }

    #[test]
    fn test_record_writes_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("posts");
        std::fs::create_dir(&posts).unwrap();
        let artifact = write_file(&posts, "ABC_1.jpg", b"image bytes");

        let writer = ManifestWriter::open(&dir.path().join("hash.txt")).unwrap();
        assert!(writer.record(&artifact).unwrap());

        let content = std::fs::read_to_string(writer.path()).unwrap();
        let entry = content.lines().nth(1).unwrap();
        let (digest, path) = entry.split_once(" *").unwrap();
        assert_eq!(digest.len(), 32);
        assert_eq!(path, "posts/ABC_1.jpg");
    }

    #[test]
    fn test_record_skips_already_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = write_file(dir.path(), "a.jpg", b"data");

        let writer = ManifestWriter::open(&dir.path().join("hash.txt")).unwrap();
        assert!(writer.record(&artifact).unwrap());
        assert!(!writer.record(&artifact).unwrap());
        assert_eq!(writer.entry_count(), 1);
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let manifest_path = dir.path().join("hash.txt");
        let artifact = write_file(dir.path(), "a.jpg", b"data");

        {
            let writer = ManifestWriter::open(&manifest_path).unwrap();
            writer.record(&artifact).unwrap();
        }

        let writer = ManifestWriter::open(&manifest_path).unwrap();
        assert_eq!(writer.entry_count(), 1);
        assert!(!writer.record(&artifact).unwrap());

        let content = std::fs::read_to_string(&manifest_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert_eq!(content.lines().next().unwrap(), MANIFEST_HEADER);
    }

    #[test]
    fn test_concurrent_appends_stay_well_formed() {
        let dir = tempfile::tempdir().unwrap();
        let writer = Arc::new(ManifestWriter::open(&dir.path().join("hash.txt")).unwrap());

        let artifacts: Vec<PathBuf> = (0..16)
            .map(|i| write_file(dir.path(), &format!("post_{i}.jpg"), format!("content {i}").as_bytes()))
            .collect();

        let handles: Vec<_> = artifacts
            .into_iter()
            .map(|artifact| {
                let writer = Arc::clone(&writer);
                std::thread::spawn(move || writer.record(&artifact).unwrap())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        let content = std::fs::read_to_string(writer.path()).unwrap();
        let entries: Vec<&str> = content.lines().skip(1).collect();
        assert_eq!(entries.len(), 16);
        for entry in entries {
            let (digest, path) = entry.split_once(" *").unwrap();
            assert_eq!(digest.len(), 32);
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
            assert!(path.starts_with("post_"));
        }
    }
}
