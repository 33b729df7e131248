//! Filesystem layout utilities.

pub mod paths;

pub use paths::{sanitize_path_component, ProfileLayout};
