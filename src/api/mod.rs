//! Instagram web API client.

pub mod client;
pub mod types;

pub use client::InstaClient;
