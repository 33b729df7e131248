//! Response types for the Instagram web JSON endpoints.

use serde::Deserialize;

/// Top-level response of the `web_profile_info` endpoint.
#[derive(Debug, Deserialize)]
pub struct WebProfileResponse {
    pub data: WebProfileData,
}

#[derive(Debug, Deserialize)]
pub struct WebProfileData {
    pub user: Option<UserNode>,
}

/// Profile as returned by the web endpoints.
#[derive(Debug, Deserialize)]
pub struct UserNode {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub is_private: bool,
    pub edge_owner_to_timeline_media: TimelineMedia,
}

/// One page of a profile's timeline.
#[derive(Debug, Deserialize)]
pub struct TimelineMedia {
    #[serde(default)]
    pub count: u64,
    pub page_info: PageInfo,
    #[serde(default)]
    pub edges: Vec<MediaEdge>,
}

#[derive(Debug, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MediaEdge {
    pub node: MediaNode,
}

/// A single timeline post.
#[derive(Debug, Deserialize)]
pub struct MediaNode {
    pub id: String,
    pub shortcode: String,
    #[serde(default)]
    pub is_video: bool,
    pub display_url: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub taken_at_timestamp: i64,
    #[serde(default)]
    pub edge_media_to_caption: CaptionEdges,
    #[serde(default)]
    pub edge_media_preview_like: CountField,
    #[serde(default)]
    pub edge_media_to_comment: CountField,
    #[serde(default)]
    pub edge_sidecar_to_children: Option<SidecarChildren>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptionEdges {
    #[serde(default)]
    pub edges: Vec<CaptionEdge>,
}

#[derive(Debug, Deserialize)]
pub struct CaptionEdge {
    pub node: CaptionNode,
}

#[derive(Debug, Deserialize)]
pub struct CaptionNode {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CountField {
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct SidecarChildren {
    #[serde(default)]
    pub edges: Vec<SidecarEdge>,
}

#[derive(Debug, Deserialize)]
pub struct SidecarEdge {
    pub node: SidecarNode,
}

/// A child of a multi-image post.
#[derive(Debug, Deserialize)]
pub struct SidecarNode {
    pub display_url: String,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Top-level response of the GraphQL timeline pagination query.
#[derive(Debug, Deserialize)]
pub struct TimelinePageResponse {
    pub data: TimelinePageData,
}

#[derive(Debug, Deserialize)]
pub struct TimelinePageData {
    pub user: Option<TimelinePageUser>,
}

#[derive(Debug, Deserialize)]
pub struct TimelinePageUser {
    pub edge_owner_to_timeline_media: TimelineMedia,
}

impl MediaNode {
    /// Flatten the caption edge list into the first caption text, if any.
    pub fn caption_text(&self) -> Option<String> {
        self.edge_media_to_caption
            .edges
            .first()
            .map(|e| e.node.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile_response() {
        let json = r#"{
            "data": {
                "user": {
                    "id": "123",
                    "username": "someuser",
                    "is_private": false,
                    "edge_owner_to_timeline_media": {
                        "count": 2,
                        "page_info": {"has_next_page": false, "end_cursor": null},
                        "edges": [
                            {"node": {
                                "id": "1",
                                "shortcode": "Cabc",
                                "is_video": false,
                                "display_url": "https://example.com/a.jpg",
                                "taken_at_timestamp": 1700000000,
                                "edge_media_to_caption": {"edges": [{"node": {"text": "hi"}}]},
                                "edge_media_preview_like": {"count": 5},
                                "edge_media_to_comment": {"count": 1}
                            }}
                        ]
                    }
                }
            }
        }"#;

        let response: WebProfileResponse = serde_json::from_str(json).unwrap();
        let user = response.data.user.unwrap();
        assert_eq!(user.username, "someuser");
        assert_eq!(user.edge_owner_to_timeline_media.edges.len(), 1);

        let node = &user.edge_owner_to_timeline_media.edges[0].node;
        assert_eq!(node.shortcode, "Cabc");
        assert_eq!(node.caption_text().as_deref(), Some("hi"));
        assert_eq!(node.edge_media_preview_like.count, 5);
    }

    #[test]
    fn test_missing_user_deserializes_to_none() {
        let json = r#"{"data": {"user": null}}"#;
        let response: WebProfileResponse = serde_json::from_str(json).unwrap();
        assert!(response.data.user.is_none());
    }
}
