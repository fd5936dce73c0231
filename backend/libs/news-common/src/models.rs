//! Shared data models for inter-service communication
//!
//! Field names follow the JSON contract the services have always spoken
//! (`ID`, `PostID`, `PubTime`, ...), so every model pins its serde names.

use serde::{Deserialize, Serialize};

// ============================================================================
// NEWS MODELS
// ============================================================================

/// A news post as persisted by news-service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "ID", default)]
    pub id: i64,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Content", default)]
    pub content: String,
    /// Publication time, Unix seconds
    #[serde(rename = "PubTime", default)]
    pub pub_time: i64,
    #[serde(rename = "Link", default)]
    pub link: String,
}

/// A post together with its comment forest, assembled by the gateway.
///
/// Comments are attached at read time only and never stored with the post.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedPost {
    #[serde(flatten)]
    pub post: Post,
    #[serde(rename = "Comments", default)]
    pub comments: Vec<Comment>,
}

impl DetailedPost {
    pub fn new(post: Post, comments: Vec<Comment>) -> Self {
        Self { post, comments }
    }
}

// ============================================================================
// COMMENT MODELS
// ============================================================================

/// A comment on a post.
///
/// `id` is 0 until the store assigns one. `parent_id == 0` marks a top-level
/// comment. `replies` only exists in memory after the comment tree is built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "ID", default)]
    pub id: i64,
    #[serde(rename = "PostID", default)]
    pub post_id: i64,
    #[serde(rename = "ParentID", default)]
    pub parent_id: i64,
    #[serde(rename = "Content", default)]
    pub content: String,
    /// Creation time, Unix seconds
    #[serde(rename = "AddTime", default)]
    pub add_time: i64,
    #[serde(rename = "Replies", default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn is_root(&self) -> bool {
        self.parent_id == 0
    }
}

/// Drop a comment forest without recursing through `replies`.
///
/// The derived drop glue descends one stack frame per reply level; a long
/// enough thread would overflow the stack of the thread releasing it.
pub fn dismantle_forest(forest: Vec<Comment>) {
    let mut pending = forest;
    while let Some(mut node) = pending.pop() {
        pending.append(&mut node.replies);
    }
}

// ============================================================================
// PAGINATION MODELS
// ============================================================================

/// Page metadata returned alongside every paginated post list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(rename = "CurrentPage")]
    pub current_page: u32,
    #[serde(rename = "TotalPages")]
    pub total_pages: u32,
    #[serde(rename = "NumberOfPosts")]
    pub number_of_posts: u32,
}

/// One page of posts plus its metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPage {
    #[serde(rename = "Posts")]
    pub posts: Vec<Post>,
    #[serde(rename = "Pagination")]
    pub pagination: Pagination,
}
