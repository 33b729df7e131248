//! Resume tracking.
//!
//! A repeated run must not re-fetch posts that are already on disk. The set
//! of completed posts is inferred from image artifacts in the posts
//! directory: the short code is the filename prefix before the first
//! underscore. This is a heuristic over the source's naming convention, not
//! an authoritative record.

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;

/// Image extensions that mark a post as captured.
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Scan `posts_dir` and return the short codes of posts already captured.
///
/// A missing directory yields an empty set.
pub fn scan_completed_posts(posts_dir: &Path) -> Result<HashSet<String>> {
    let mut completed = HashSet::new();

    if !posts_dir.exists() {
        return Ok(completed);
    }

    for entry in std::fs::read_dir(posts_dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            continue;
        }

        if let Some(shortcode) = shortcode_from_filename(&path) {
            completed.insert(shortcode);
        }
    }

    Ok(completed)
}

fn shortcode_from_filename(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let prefix = stem.split('_').next()?;
    if prefix.is_empty() {
        None
    } else {
        Some(prefix.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let set = scan_completed_posts(&dir.path().join("posts")).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_shortcodes_from_image_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cabc123_1.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("Cabc123_2.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("Dxyz987_1.png"), b"x").unwrap();

        let set = scan_completed_posts(dir.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("Cabc123"));
        assert!(set.contains("Dxyz987"));
    }

    #[test]
    fn test_non_image_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cabc123.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("Cabc123.txt"), b"caption: x").unwrap();
        std::fs::write(dir.path().join("Dxyz987_1.mp4"), b"x").unwrap();

        let set = scan_completed_posts(dir.path()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_extension_case_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cabc123_1.JPG"), b"x").unwrap();

        let set = scan_completed_posts(dir.path()).unwrap();
        assert!(set.contains("Cabc123"));
    }

    #[test]
    fn test_filename_without_underscore_uses_full_stem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Cabc123.jpg"), b"x").unwrap();

        let set = scan_completed_posts(dir.path()).unwrap();
        assert!(set.contains("Cabc123"));
    }
}
