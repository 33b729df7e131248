//! Custody manifest module.
//!
//! Provides:
//! - Streaming MD5 digests
//! - The serialized, append-if-absent manifest writer

pub mod digest;
pub mod writer;

pub use digest::md5_file;
pub use writer::{ManifestWriter, MANIFEST_HEADER};
