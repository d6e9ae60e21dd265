//! Read-only post endpoints.
//!
//! `GET /api/posts[?timestamp=T]` lists posts; `GET /api/posts/{id}[?timestamp=T]`
//! returns a thread. `timestamp` is the pagination cursor the previous page
//! handed back in `pagination.next_timestamp`.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::transport::{Method, Transport, TransportError};

pub const POSTS_PATH: &str = "/api/posts";

#[derive(Debug, thiserror::Error)]
pub enum PostsError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid post id: {0:?}")]
    InvalidPostId(String),
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Raw timestamp (seconds, as sent by the backend) plus its display form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeStamp {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastReply {
    pub author: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub formatted: Option<String>,
}

/// One entry of the post list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub title: String,
    pub url: String,
    pub post_id: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub create_time: TimeStamp,
    #[serde(default)]
    pub replies_count: Option<String>,
    #[serde(default)]
    pub last_reply: Option<LastReply>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub next_timestamp: Option<String>,
    #[serde(default)]
    pub prev_timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPage {
    #[serde(default)]
    pub total: usize,
    pub posts: Vec<PostSummary>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default)]
    pub uid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// One message inside a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub quote: Option<String>,
    pub author: Author,
    #[serde(default)]
    pub time: TimeStamp,
    #[serde(default)]
    pub actions: Vec<ReplyAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: String,
    pub posts: Vec<Reply>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl PostPage {
    /// Cursor for the following page, if the backend supplied one.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.pagination.next_timestamp.as_deref().filter(|t| !t.is_empty())
    }
}

// =============================================================================
// PATHS
// =============================================================================

// Ids and cursors come from user input; both are percent-encoded so they
// stay a single path segment and a single query value.

fn with_cursor(path: String, timestamp: Option<&str>) -> String {
    match timestamp.map(str::trim).filter(|t| !t.is_empty()) {
        Some(ts) => format!("{path}?timestamp={}", urlencoding::encode(ts)),
        None => path,
    }
}

/// Ids that cannot name a thread: blank, or a dot segment that would be
/// resolved away by URL normalization.
fn is_valid_post_id(post_id: &str) -> bool {
    !matches!(post_id.trim(), "" | "." | "..")
}

#[must_use]
pub fn posts_path(timestamp: Option<&str>) -> String {
    with_cursor(POSTS_PATH.to_owned(), timestamp)
}

#[must_use]
pub fn post_detail_path(post_id: &str, timestamp: Option<&str>) -> String {
    with_cursor(format!("{POSTS_PATH}/{}", urlencoding::encode(post_id)), timestamp)
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct PostsApi<T> {
    transport: T,
}

impl<T: Transport> PostsApi<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch a page of posts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload does not decode.
    pub async fn list(&self, timestamp: Option<&str>) -> Result<PostPage, PostsError> {
        self.get(&posts_path(timestamp)).await
    }

    /// Fetch one thread.
    ///
    /// # Errors
    ///
    /// Returns an error if `post_id` is blank or a dot segment, the request
    /// fails, or the payload does not decode.
    pub async fn detail(&self, post_id: &str, timestamp: Option<&str>) -> Result<PostDetail, PostsError> {
        if !is_valid_post_id(post_id) {
            return Err(PostsError::InvalidPostId(post_id.to_owned()));
        }
        self.get(&post_detail_path(post_id, timestamp)).await
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, PostsError> {
        let resp = self.transport.request(Method::Get, path, None).await?;
        Ok(serde_json::from_value(resp.body)?)
    }
}

#[cfg(test)]
#[path = "posts_test.rs"]
mod tests;
