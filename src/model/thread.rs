use std::fmt;

use serde::{Deserialize, Serialize};

use super::post::Post;

/// Where a thread's input text came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Typed or piped in by the user
    Manual,
    Clipboard,
    /// Produced by a named content extractor (e.g. `note`, `youtube`, `file`)
    Extractor(String),
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::Manual => write!(f, "manual"),
            ContentSource::Clipboard => write!(f, "clipboard"),
            ContentSource::Extractor(name) => write!(f, "{}", name),
        }
    }
}

/// An ordered sequence of posts plus the text it was generated from.
///
/// A thread always holds at least one post when built through
/// [`crate::ops::thread_ops::build_thread`]. `total_posts` is derived from
/// the post list rather than stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub(crate) posts: Vec<Post>,
    pub(crate) original_content: String,
    pub(crate) source: ContentSource,
    /// Sequence for ids handed out by `add_post`
    pub(crate) next_seq: u64,
}

impl Thread {
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn total_posts(&self) -> usize {
        self.posts.len()
    }

    pub fn original_content(&self) -> &str {
        &self.original_content
    }

    pub fn source(&self) -> &ContentSource {
        &self.source
    }

    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.posts.iter().position(|p| p.id() == id)
    }

    /// Posts over the platform ceiling
    pub fn over_limit_count(&self) -> usize {
        self.posts.iter().filter(|p| p.is_over_limit()).count()
    }

    /// Post contents in posting order
    pub fn contents(&self) -> Vec<String> {
        self.posts.iter().map(|p| p.content().to_string()).collect()
    }
}
