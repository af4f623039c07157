use serde::Serialize;

use crate::util::unicode::char_len;

/// Hard per-post ceiling of the target platform. Independent of the
/// user's configured `max_chars_per_post`.
pub const PLATFORM_CHAR_LIMIT: usize = 280;

/// Comfortable per-post length for Japanese text, used as the default budget
pub const JAPANESE_CHAR_TARGET: usize = 140;

/// One post of a thread.
///
/// `char_count` and `is_over_limit` are derived from `content` whenever the
/// content is set, so they can never drift from it. Fields are private for
/// that reason; mutate through [`Post::set_content`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: String,
    content: String,
    char_count: usize,
    is_over_limit: bool,
}

impl Post {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut post = Post {
            id: id.into(),
            content: String::new(),
            char_count: 0,
            is_over_limit: false,
        };
        post.set_content(content);
        post
    }

    /// An empty post, as inserted by the editor between existing posts
    pub fn empty(id: impl Into<String>) -> Self {
        Post::new(id, String::new())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Code points in `content`
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// `char_count > PLATFORM_CHAR_LIMIT`
    pub fn is_over_limit(&self) -> bool {
        self.is_over_limit
    }

    /// Replace the content verbatim and recount.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.char_count = char_len(&self.content);
        self.is_over_limit = self.char_count > PLATFORM_CHAR_LIMIT;
    }
}
