use tracing::{info, warn};

use crate::model::config::Settings;
use crate::model::thread::{ContentSource, Thread};
use crate::ops::collaborators::{SummarizeError, Summarizer};
use crate::ops::splitter::{self, SplitError, SplitOptions};
use crate::ops::thread_ops::{self, ThreadError};

/// Error type for thread generation
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("nothing to split: content is empty")]
    EmptyContent,
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}

impl From<ThreadError> for SessionError {
    fn from(_: ThreadError) -> Self {
        SessionError::EmptyContent
    }
}

/// Holds the thread being edited plus the last generation error.
///
/// Generation runs the optional summarizer first, then the splitter, using
/// the settings the session was created with. Edits replace the held thread
/// with the value returned by [`thread_ops`].
pub struct ThreadSession {
    settings: Settings,
    summarizer: Option<Box<dyn Summarizer>>,
    thread: Option<Thread>,
    error: Option<String>,
}

impl ThreadSession {
    pub fn new(settings: Settings) -> Self {
        ThreadSession {
            settings,
            summarizer: None,
            thread: None,
            error: None,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn thread(&self) -> Option<&Thread> {
        self.thread.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Build a new thread from `content`. On failure the error is recorded
    /// and the previous thread, if any, is kept.
    pub fn generate(
        &mut self,
        content: &str,
        source: ContentSource,
        use_summarizer: bool,
    ) -> Result<&Thread, SessionError> {
        self.error = None;
        match self.build(content, source, use_summarizer) {
            Ok(thread) => Ok(&*self.thread.insert(thread)),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn build(
        &self,
        content: &str,
        source: ContentSource,
        use_summarizer: bool,
    ) -> Result<Thread, SessionError> {
        let summary;
        let text = match (&self.summarizer, use_summarizer) {
            (Some(summarizer), true) => {
                summary = summarizer.summarize(content, &self.settings.llm)?;
                info!(
                    key_points = summary.key_points.len(),
                    "summarized content before splitting"
                );
                summary.summary.as_str()
            }
            (None, true) => {
                warn!("summary requested but no summarizer is configured; splitting original text");
                content
            }
            (_, false) => content,
        };

        let posts = splitter::split(
            text,
            self.settings.max_chars_per_post,
            SplitOptions::from(&self.settings),
        )?;
        let thread = thread_ops::build_thread(posts, content, source)?;
        info!(
            posts = thread.total_posts(),
            over_limit = thread.over_limit_count(),
            "generated thread"
        );
        Ok(thread)
    }

    pub fn update_post(&mut self, post_id: &str, new_content: &str) {
        if let Some(thread) = &self.thread {
            self.thread = Some(thread_ops::update_post(thread, post_id, new_content));
        }
    }

    pub fn remove_post(&mut self, post_id: &str) {
        if let Some(thread) = &self.thread {
            self.thread = Some(thread_ops::remove_post(thread, post_id));
        }
    }

    pub fn add_post(&mut self, after_id: &str) {
        if let Some(thread) = &self.thread {
            self.thread = Some(thread_ops::add_post(thread, after_id));
        }
    }

    pub fn reorder_posts(&mut self, from_index: usize, to_index: usize) {
        if let Some(thread) = &self.thread {
            self.thread = Some(thread_ops::reorder_posts(thread, from_index, to_index));
        }
    }

    /// Drop the thread and any error.
    pub fn clear(&mut self) {
        self.thread = None;
        self.error = None;
    }
}
