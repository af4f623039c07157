use tracing::debug;

use crate::model::post::Post;
use crate::model::thread::{ContentSource, Thread};

/// Error type for thread construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThreadError {
    #[error("cannot build a thread from zero posts")]
    Empty,
}

/// Wrap splitter output in a thread. An empty post list is rejected so a
/// thread never exists without posts.
pub fn build_thread(
    posts: Vec<Post>,
    original_content: impl Into<String>,
    source: ContentSource,
) -> Result<Thread, ThreadError> {
    if posts.is_empty() {
        return Err(ThreadError::Empty);
    }
    Ok(Thread {
        posts,
        original_content: original_content.into(),
        source,
        next_seq: 1,
    })
}

// ---------------------------------------------------------------------------
// Edits
//
// Each edit returns a new thread and leaves the input untouched. An unknown
// id returns an unchanged copy. Numbering baked into content at generation
// time is not rewritten by structural edits.
// ---------------------------------------------------------------------------

/// Replace one post's content verbatim. No numbering or marker is applied.
pub fn update_post(thread: &Thread, post_id: &str, new_content: &str) -> Thread {
    let mut next = thread.clone();
    if let Some(post) = next.posts.iter_mut().find(|p| p.id() == post_id) {
        post.set_content(new_content);
    }
    next
}

/// Remove a post. Surviving posts keep their stored content.
pub fn remove_post(thread: &Thread, post_id: &str) -> Thread {
    let mut next = thread.clone();
    next.posts.retain(|p| p.id() != post_id);
    debug!(post_id, remaining = next.posts.len(), "removed post");
    next
}

/// Insert an empty post directly after `after_id`.
pub fn add_post(thread: &Thread, after_id: &str) -> Thread {
    let mut next = thread.clone();
    let Some(idx) = next.position(after_id) else {
        return next;
    };
    let id = fresh_post_id(&mut next);
    debug!(after_id, new_id = %id, "inserted post");
    next.posts.insert(idx + 1, Post::empty(id));
    next
}

/// Move the post at `from_index` so it ends up at `to_index`. An out-of-range
/// `from_index` is a no-op; `to_index` past the end moves the post last.
pub fn reorder_posts(thread: &Thread, from_index: usize, to_index: usize) -> Thread {
    let mut next = thread.clone();
    if from_index >= next.posts.len() {
        return next;
    }
    let post = next.posts.remove(from_index);
    let to = to_index.min(next.posts.len());
    next.posts.insert(to, post);
    next
}

/// Next `post-new-N` id not already used in the thread.
fn fresh_post_id(thread: &mut Thread) -> String {
    loop {
        let id = format!("post-new-{}", thread.next_seq);
        thread.next_seq += 1;
        if thread.post(&id).is_none() {
            return id;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
