use serde::Serialize;

use crate::io::history_io::HistoryEntry;
use crate::model::config::{LlmProvider, Settings};
use crate::model::post::{PLATFORM_CHAR_LIMIT, Post};
use crate::model::thread::{ContentSource, Thread};
use crate::util::unicode::{char_len, preview};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadJson<'a> {
    pub posts: &'a [Post],
    pub total_posts: usize,
    pub original_content: &'a str,
    pub source: &'a ContentSource,
}

impl<'a> From<&'a Thread> for ThreadJson<'a> {
    fn from(thread: &'a Thread) -> Self {
        ThreadJson {
            posts: thread.posts(),
            total_posts: thread.total_posts(),
            original_content: thread.original_content(),
            source: thread.source(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountJson {
    pub char_count: usize,
    pub limit: usize,
    pub is_over_limit: bool,
}

impl CountJson {
    pub fn for_text(text: &str) -> Self {
        let char_count = char_len(text);
        CountJson {
            char_count,
            limit: PLATFORM_CHAR_LIMIT,
            is_over_limit: char_count > PLATFORM_CHAR_LIMIT,
        }
    }
}

/// Settings as shown to the user. The API key is reported only as set or not.
#[derive(Serialize)]
pub struct SettingsJson<'a> {
    pub max_chars_per_post: usize,
    pub include_numbering: bool,
    pub auto_add_continue: bool,
    pub llm: LlmJson<'a>,
}

#[derive(Serialize)]
pub struct LlmJson<'a> {
    pub provider: LlmProvider,
    pub model: &'a str,
    pub api_key_set: bool,
}

impl<'a> From<&'a Settings> for SettingsJson<'a> {
    fn from(settings: &'a Settings) -> Self {
        SettingsJson {
            max_chars_per_post: settings.max_chars_per_post,
            include_numbering: settings.include_numbering,
            auto_add_continue: settings.auto_add_continue,
            llm: LlmJson {
                provider: settings.llm.provider,
                model: &settings.llm.model,
                api_key_set: settings.llm.has_api_key(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One block per post: a `[i/N]  count/280` header, then the content.
pub fn format_thread(thread: &Thread) -> String {
    let total = thread.total_posts();
    let blocks: Vec<String> = thread
        .posts()
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let mut block = format!(
                "[{}/{}]  {}/{}",
                i + 1,
                total,
                post.char_count(),
                PLATFORM_CHAR_LIMIT
            );
            if post.is_over_limit() {
                block.push_str("  over limit");
            }
            block.push('\n');
            block.push_str(post.content());
            block
        })
        .collect();
    blocks.join("\n\n")
}

pub fn format_count(count: &CountJson) -> String {
    let mut line = format!("{}/{}", count.char_count, count.limit);
    if count.is_over_limit {
        line.push_str(&format!(
            "  over limit by {}",
            count.char_count - count.limit
        ));
    }
    line
}

pub fn format_settings(settings: &Settings) -> String {
    let api_key = if settings.llm.has_api_key() {
        "(set)"
    } else {
        "(not set)"
    };
    [
        format!("max_chars_per_post = {}", settings.max_chars_per_post),
        format!("include_numbering  = {}", settings.include_numbering),
        format!("auto_add_continue  = {}", settings.auto_add_continue),
        format!("llm.provider       = {}", settings.llm.provider),
        format!("llm.model          = {}", settings.llm.model),
        format!("llm.api_key        = {}", api_key),
    ]
    .join("\n")
}

/// Width of the content preview column in `history` listings
const PREVIEW_WIDTH: usize = 48;

pub fn format_history_list(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "no saved threads".to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let first_line = entry.content.lines().next().unwrap_or("");
            format!(
                "{:>2}  {}  {:>2} posts  {}",
                i + 1,
                entry.created_at.format("%Y-%m-%d %H:%M"),
                entry.posts.len(),
                preview(first_line, PREVIEW_WIDTH)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_history_entry(entry: &HistoryEntry) -> String {
    let total = entry.posts.len();
    entry
        .posts
        .iter()
        .enumerate()
        .map(|(i, post)| format!("[{}/{}]\n{}", i + 1, total, post))
        .collect::<Vec<_>>()
        .join("\n\n")
}
