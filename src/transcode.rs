//! Metadata sidecar transcoding.
//!
//! Converts a post's JSON metadata document into a flat `key: value` text
//! file, keeping the document's key order so the text reads like the source.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// Transcode the JSON document at `json_path` into plain text at `txt_path`.
///
/// One line per top-level key. String values are written raw; everything
/// else uses its JSON rendering.
pub fn transcode_metadata(json_path: &Path, txt_path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(json_path)?;
    let value: Value = serde_json::from_str(&content)?;

    let map = value.as_object().ok_or_else(|| {
        Error::Transcode(format!(
            "{} is not a JSON object",
            json_path.display()
        ))
    })?;

    let mut out = BufWriter::new(File::create(txt_path)?);
    for (key, value) in map {
        match value {
            Value::String(s) => writeln!(out, "{}: {}", key, s)?,
            other => writeln!(out, "{}: {}", key, other)?,
        }
    }
    out.flush()?;

    Ok(())
}

/// Derive the transcoded text path for a metadata document.
///
/// Same base filename, `.txt` extension.
pub fn transcoded_path(json_path: &Path) -> std::path::PathBuf {
    json_path.with_extension("txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcode_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("post.json");
        let txt_path = dir.path().join("post.txt");
        std::fs::write(&json_path, r#"{"caption": "hello", "likes": 5}"#).unwrap();

        transcode_metadata(&json_path, &txt_path).unwrap();

        let text = std::fs::read_to_string(&txt_path).unwrap();
        assert_eq!(text, "caption: hello\nlikes: 5\n");
    }

    #[test]
    fn test_transcode_non_string_values() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("post.json");
        let txt_path = dir.path().join("post.txt");
        std::fs::write(
            &json_path,
            r#"{"is_video": true, "tags": ["a", "b"], "location": null}"#,
        )
        .unwrap();

        transcode_metadata(&json_path, &txt_path).unwrap();

        let text = std::fs::read_to_string(&txt_path).unwrap();
        assert_eq!(text, "is_video: true\ntags: [\"a\",\"b\"]\nlocation: null\n");
    }

    #[test]
    fn test_transcode_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("broken.json");
        let txt_path = dir.path().join("broken.txt");
        std::fs::write(&json_path, "not json at all").unwrap();

        assert!(transcode_metadata(&json_path, &txt_path).is_err());
    }

    #[test]
    fn test_transcode_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("array.json");
        let txt_path = dir.path().join("array.txt");
        std::fs::write(&json_path, "[1, 2, 3]").unwrap();

        assert!(matches!(
            transcode_metadata(&json_path, &txt_path),
            Err(Error::Transcode(_))
        ));
    }

    #[test]
    fn test_transcoded_path_replaces_extension() {
        assert_eq!(
            transcoded_path(Path::new("/a/b/ABC.json")),
            Path::new("/a/b/ABC.txt")
        );
    }
}
