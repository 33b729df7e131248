//! The media source seam.
//!
//! Everything that talks to Instagram sits behind this trait; the fetch
//! pipeline only sees post handles and a staging directory. Tests substitute
//! a mock source.

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// A resolved profile.
#[derive(Debug, Clone)]
pub struct ProfileInfo {
    /// Numeric account id assigned by the platform.
    pub id: String,

    /// Canonical username.
    pub username: String,

    /// Total post count reported by the platform.
    pub post_count: u64,

    /// Whether the account is private (requires login to read).
    pub is_private: bool,
}

/// A handle to one post, as listed by the media source.
///
/// The pipeline treats the short code as opaque; the remaining fields exist
/// for the source's own fetch step and the metadata sidecar.
#[derive(Debug, Clone)]
pub struct PostHandle {
    /// Short code identifying the post.
    pub shortcode: String,

    /// Numeric post id.
    pub id: String,

    /// Unix timestamp the post was taken at.
    pub taken_at: i64,

    /// Whether the primary media is a video.
    pub is_video: bool,

    /// URL of the primary image (or video thumbnail).
    pub display_url: String,

    /// URL of the video stream, for video posts.
    pub video_url: Option<String>,

    /// Additional media URLs for multi-image posts, in gallery order.
    pub sidecar_urls: Vec<String>,

    /// Caption text, if any.
    pub caption: Option<String>,

    /// Like count.
    pub likes: u64,

    /// Comment count.
    pub comments: u64,
}

/// Abstraction over the system that authenticates, paginates, and streams
/// down a profile's media.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Resolve a username into a profile.
    ///
    /// Fails with `ProfileNotFound` for unknown or inaccessible profiles and
    /// `LoginRequired` when the platform demands authentication.
    async fn resolve_profile(&self, username: &str) -> Result<ProfileInfo>;

    /// List all post handles for a profile, newest first.
    async fn list_posts(&self, profile: &ProfileInfo) -> Result<Vec<PostHandle>>;

    /// Download all of a post's artifacts into `staging_dir`.
    ///
    /// On success the directory holds the post's media files and its JSON
    /// metadata sidecar; on error, partial files may remain for the caller
    /// to clean up.
    async fn fetch_post(&self, post: &PostHandle, staging_dir: &Path) -> Result<()>;
}
