//! Streaming file digests for the custody manifest.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::Result;

/// Read buffer size. Keeps memory bounded for large video files.
const CHUNK_SIZE: usize = 8192;

/// Compute the MD5 digest of a file, returned as lowercase hex.
///
/// MD5 is used for file-identity bookkeeping, matching the manifest format
/// expected by existing verification tooling. It is not a security control.
pub fn md5_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_md5_known_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"hello world")
            .unwrap();

        assert_eq!(
            md5_file(&path).unwrap(),
            "5eb63bbbe01eeed093cb22bb8f5acdc3"
        );
    }

    #[test]
    fn test_md5_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, vec![0xAB; 100_000]).unwrap();

        let first = md5_file(&path).unwrap();
        let second = md5_file(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
    }

    #[test]
    fn test_md5_missing_file() {
        assert!(md5_file(Path::new("/nonexistent/file.bin")).is_err());
    }
}
