//! HTTP client for Instagram's public web JSON endpoints.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use rand::Rng;
use reqwest::{header, Client, Response, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::sleep;

use crate::api::types::*;
use crate::error::{Error, Result};
use crate::media::{MediaSource, PostHandle, ProfileInfo};

/// Instagram web base URL.
const API_BASE: &str = "https://www.instagram.com";

/// App id the web client sends; required for the JSON endpoints.
const WEB_APP_ID: &str = "936619743392459";

/// Query hash of the timeline pagination GraphQL query.
const TIMELINE_QUERY_HASH: &str = "69cba40317214236af40e7efa697781d";

/// Posts requested per timeline page.
const PAGE_SIZE: u64 = 50;

/// Media source backed by the public web endpoints.
///
/// Only public profiles are reachable; anything the platform gates behind a
/// session surfaces as `LoginRequired`.
pub struct InstaClient {
    client: Client,
}

impl InstaClient {
    /// Create a new client with the configured browser user agent.
    pub fn new(user_agent: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "x-ig-app-id",
            WEB_APP_ID
                .parse()
                .map_err(|_| Error::Api("invalid app id header".into()))?,
        );

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Make a GET request and map the platform's refusal statuses onto the
    /// error taxonomy.
    async fn get(&self, url: &str, username: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        // The platform answers anonymous requests for gated content with a
        // redirect to its login page rather than a status code.
        if response.url().path().starts_with("/accounts/login") {
            return Err(Error::LoginRequired(format!(
                "redirected to login while fetching '{}'",
                username
            )));
        }

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => Err(Error::ProfileNotFound(username.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::LoginRequired(
                format!("HTTP {} while fetching '{}'", status, username),
            )),
            StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimited(60)),
            s if !s.is_success() => Err(Error::Api(format!("HTTP {} from {}", status, url))),
            _ => Ok(response),
        }
    }

    /// Fetch one timeline page past the first, by cursor.
    async fn timeline_page(&self, profile: &ProfileInfo, cursor: &str) -> Result<TimelineMedia> {
        let variables = serde_json::json!({
            "id": profile.id,
            "first": PAGE_SIZE,
            "after": cursor,
        });
        let url = format!(
            "{}/graphql/query/?query_hash={}&variables={}",
            API_BASE, TIMELINE_QUERY_HASH, variables
        );

        let response = self.get(&url, &profile.username).await?;
        let page: TimelinePageResponse = response.json().await?;

        page.data
            .user
            .map(|u| u.edge_owner_to_timeline_media)
            .ok_or_else(|| Error::ProfileNotFound(profile.username.clone()))
    }

    /// Stream a media URL into `<dir>/<stem>.<ext>`, extension taken from
    /// the URL path or the response Content-Type.
    ///
    /// Media CDN failures are download errors, never profile errors, so a
    /// single broken URL cannot abort the run.
    async fn download_file(&self, url: &str, dir: &Path, stem: &str) -> Result<PathBuf> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited(60));
        }
        if !status.is_success() {
            return Err(Error::Download(format!("HTTP {} from {}", status, url)));
        }

        let extension = extension_from_url(url)
            .or_else(|| extension_from_content_type(&response))
            .unwrap_or_else(|| "bin".to_string());
        let dest = dir.join(format!("{}.{}", stem, extension));

        let mut file = File::create(&dest).await?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(dest)
    }
}

#[async_trait]
impl MediaSource for InstaClient {
    async fn resolve_profile(&self, username: &str) -> Result<ProfileInfo> {
        let url = format!(
            "{}/api/v1/users/web_profile_info/?username={}",
            API_BASE, username
        );

        let response = self.get(&url, username).await?;
        let profile: WebProfileResponse = response.json().await?;

        let user = profile
            .data
            .user
            .ok_or_else(|| Error::ProfileNotFound(username.to_string()))?;

        if user.is_private {
            return Err(Error::LoginRequired(format!(
                "profile '{}' is private",
                username
            )));
        }

        Ok(ProfileInfo {
            id: user.id,
            username: user.username,
            post_count: user.edge_owner_to_timeline_media.count,
            is_private: user.is_private,
        })
    }

    async fn list_posts(&self, profile: &ProfileInfo) -> Result<Vec<PostHandle>> {
        let url = format!(
            "{}/api/v1/users/web_profile_info/?username={}",
            API_BASE, profile.username
        );
        let response = self.get(&url, &profile.username).await?;
        let first: WebProfileResponse = response.json().await?;

        let mut timeline = first
            .data
            .user
            .ok_or_else(|| Error::ProfileNotFound(profile.username.clone()))?
            .edge_owner_to_timeline_media;

        let mut posts: Vec<PostHandle> = timeline
            .edges
            .drain(..)
            .map(|e| node_to_post(e.node))
            .collect();

        while timeline.page_info.has_next_page {
            let cursor = match timeline.page_info.end_cursor.take() {
                Some(cursor) => cursor,
                None => break,
            };

            // Pause between pages so pagination does not hammer the endpoint
            let delay_ms = rand::thread_rng().gen_range(2000..4000);
            sleep(Duration::from_millis(delay_ms)).await;

            timeline = self.timeline_page(profile, &cursor).await?;
            posts.extend(timeline.edges.drain(..).map(|e| node_to_post(e.node)));
        }

        tracing::info!("Listed {} posts for {}", posts.len(), profile.username);
        Ok(posts)
    }

    async fn fetch_post(&self, post: &PostHandle, staging_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(staging_dir).await?;

        write_metadata_sidecar(post, staging_dir).await?;

        if post.sidecar_urls.is_empty() {
            self.download_file(&post.display_url, staging_dir, &format!("{}_1", post.shortcode))
                .await?;

            if let Some(video_url) = &post.video_url {
                self.download_file(video_url, staging_dir, &format!("{}_1", post.shortcode))
                    .await?;
            }
        } else {
            for (index, url) in post.sidecar_urls.iter().enumerate() {
                self.download_file(url, staging_dir, &format!("{}_{}", post.shortcode, index + 1))
                    .await?;
            }
        }

        Ok(())
    }
}

/// Convert a timeline node into the pipeline's post handle.
pub(crate) fn node_to_post(node: MediaNode) -> PostHandle {
    let caption = node.caption_text();

    let sidecar_urls = node
        .edge_sidecar_to_children
        .as_ref()
        .map(|children| {
            children
                .edges
                .iter()
                .map(|edge| {
                    if edge.node.is_video {
                        edge.node
                            .video_url
                            .clone()
                            .unwrap_or_else(|| edge.node.display_url.clone())
                    } else {
                        edge.node.display_url.clone()
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    PostHandle {
        shortcode: node.shortcode,
        id: node.id,
        taken_at: node.taken_at_timestamp,
        is_video: node.is_video,
        display_url: node.display_url,
        video_url: node.video_url,
        sidecar_urls,
        caption,
        likes: node.edge_media_preview_like.count,
        comments: node.edge_media_to_comment.count,
    }
}

/// Write the post's metadata document as `<shortcode>.json`.
async fn write_metadata_sidecar(post: &PostHandle, staging_dir: &Path) -> Result<()> {
    let mut metadata = serde_json::Map::new();
    metadata.insert("shortcode".into(), post.shortcode.clone().into());
    metadata.insert("id".into(), post.id.clone().into());
    metadata.insert("taken_at".into(), post.taken_at.into());
    metadata.insert("is_video".into(), post.is_video.into());
    metadata.insert(
        "caption".into(),
        post.caption
            .clone()
            .map(serde_json::Value::from)
            .unwrap_or(serde_json::Value::Null),
    );
    metadata.insert("likes".into(), post.likes.into());
    metadata.insert("comments".into(), post.comments.into());
    metadata.insert(
        "url".into(),
        format!("{}/p/{}/", API_BASE, post.shortcode).into(),
    );

    let path = staging_dir.join(format!("{}.json", post.shortcode));
    let content = serde_json::to_string_pretty(&serde_json::Value::Object(metadata))?;
    tokio::fs::write(&path, content).await?;

    Ok(())
}

/// Extension from the last path segment of a URL, if it looks like one.
fn extension_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let last_segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let (_, extension) = last_segment.rsplit_once('.')?;

    if (1..=4).contains(&extension.len()) && extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(extension.to_lowercase())
    } else {
        None
    }
}

/// Extension inferred from a response's Content-Type header.
fn extension_from_content_type(response: &Response) -> Option<String> {
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)?
        .to_str()
        .ok()?
        .split(';')
        .next()?
        .trim();

    mime_guess::get_mime_extensions_str(content_type)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_url() {
        assert_eq!(
            extension_from_url("https://cdn.example.com/a/b/photo.jpg?se=123").as_deref(),
            Some("jpg")
        );
        assert_eq!(
            extension_from_url("https://cdn.example.com/video.MP4").as_deref(),
            Some("mp4")
        );
        assert_eq!(extension_from_url("https://cdn.example.com/noext"), None);
        assert_eq!(extension_from_url("not a url"), None);
    }

    #[test]
    fn test_node_to_post_sidecar_flattening() {
        let json = r#"{
            "id": "9",
            "shortcode": "Cxyz",
            "is_video": false,
            "display_url": "https://example.com/first.jpg",
            "taken_at_timestamp": 1700000000,
            "edge_sidecar_to_children": {"edges": [
                {"node": {"display_url": "https://example.com/first.jpg"}},
                {"node": {"display_url": "https://example.com/thumb.jpg",
                          "is_video": true,
                          "video_url": "https://example.com/second.mp4"}}
            ]}
        }"#;

        let node: MediaNode = serde_json::from_str(json).unwrap();
        let post = node_to_post(node);

        assert_eq!(post.shortcode, "Cxyz");
        assert_eq!(
            post.sidecar_urls,
            vec![
                "https://example.com/first.jpg".to_string(),
                "https://example.com/second.mp4".to_string()
            ]
        );
    }
}
