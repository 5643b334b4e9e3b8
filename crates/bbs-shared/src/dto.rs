//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// A single post as returned by `listPosts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<String>,
    pub created_at: i64,
}

/// Response of `listPosts`, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPostsResponse {
    pub posts: Vec<PostItem>,
}

/// Body of `writePost`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritePostRequest {
    #[serde(default)]
    pub new_post: Option<String>,
}

/// Response of `writePost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritePostResponse {
    pub result: String,
}

impl WritePostResponse {
    pub fn success() -> Self {
        Self {
            result: "success".to_string(),
        }
    }
}
