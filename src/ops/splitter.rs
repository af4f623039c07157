use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::model::config::Settings;
use crate::model::post::Post;
use crate::util::unicode::{char_len, last_char_index_of, split_at_char};

/// Appended (after a space) to every post except the last
pub const CONTINUATION_MARKER: &str = "→";

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n?").unwrap());
static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Error type for splitting
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("invalid max_chars: {0} (must be greater than zero)")]
    InvalidMaxChars(usize),
}

/// Decoration applied to the finished thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitOptions {
    pub include_numbering: bool,
    pub auto_add_continue: bool,
}

impl From<&Settings> for SplitOptions {
    fn from(settings: &Settings) -> Self {
        SplitOptions {
            include_numbering: settings.include_numbering,
            auto_add_continue: settings.auto_add_continue,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Split `text` into posts of at most `max_chars` code points each.
///
/// Packing reserves room for the numbering prefix and continuation marker
/// using the running post index, since the final total is unknown until
/// packing ends. Decoration is then applied once with the true total and
/// every count is recomputed from the decorated content.
///
/// Empty (or whitespace-only) input yields an empty vector.
pub fn split(text: &str, max_chars: usize, options: SplitOptions) -> Result<Vec<Post>, SplitError> {
    if max_chars == 0 {
        return Err(SplitError::InvalidMaxChars(max_chars));
    }

    let normalized = normalize(text);
    let sentences: Vec<&str> = split_paragraphs(&normalized)
        .into_iter()
        .flat_map(split_sentences)
        .collect();

    let mut packer = Packer::new(max_chars, options);
    for sentence in &sentences {
        packer.push_sentence(sentence);
    }
    let bodies = packer.finish();

    debug!(
        sentences = sentences.len(),
        posts = bodies.len(),
        max_chars,
        "packed thread"
    );

    Ok(apply_formatting(bodies, options))
}

// ---------------------------------------------------------------------------
// Normalization and segmentation
// ---------------------------------------------------------------------------

/// Unify line breaks to `\n`, collapse three or more consecutive line feeds
/// to a single blank line, and trim the whole text. Idempotent.
pub fn normalize(text: &str) -> String {
    let unified = LINE_BREAK.replace_all(text, "\n");
    let collapsed = EXCESS_BLANK_LINES.replace_all(&unified, "\n\n");
    collapsed.trim().to_string()
}

/// Split normalized text on blank lines. Empty input has no paragraphs.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .collect()
}

fn is_sentence_terminal(c: char) -> bool {
    matches!(c, '。' | '．' | '！' | '？' | '.' | '!' | '?')
}

/// Split a paragraph into trimmed sentences. Terminal punctuation stays on
/// the sentence it ends; the whitespace after it is dropped. A run of
/// terminal marks (`?!`, `...`) ends a single sentence.
pub fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = paragraph.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_sentence_terminal(c) {
            continue;
        }

        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if !is_sentence_terminal(next) {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }
        push_sentence(&mut sentences, &paragraph[start..end]);

        start = end;
        while let Some(&(j, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            start = j + next.len_utf8();
            chars.next();
        }
    }
    push_sentence(&mut sentences, &paragraph[start..]);

    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

// ---------------------------------------------------------------------------
// Packing
// ---------------------------------------------------------------------------

/// Characters set aside for decoration of the post at `post_index` (1-based):
/// `digits + 5` for a `NN/NN ` prefix, 2 for ` →`.
pub fn reserved_chars(post_index: usize, options: SplitOptions) -> usize {
    let mut reserved = 0;
    if options.include_numbering {
        reserved += post_index.to_string().len() + 5;
    }
    if options.auto_add_continue {
        reserved += 2;
    }
    reserved
}

/// Greedy accumulator. Holds finished (undecorated) post bodies and the
/// candidate for the next one.
struct Packer {
    max_chars: usize,
    options: SplitOptions,
    bodies: Vec<String>,
    current: String,
    current_len: usize,
}

impl Packer {
    fn new(max_chars: usize, options: SplitOptions) -> Self {
        Packer {
            max_chars,
            options,
            bodies: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    /// 1-based index the current candidate will get when finalized
    fn post_index(&self) -> usize {
        self.bodies.len() + 1
    }

    fn available(&self) -> usize {
        self.max_chars
            .saturating_sub(reserved_chars(self.post_index(), self.options))
    }

    fn push_sentence(&mut self, sentence: &str) {
        let sentence_len = char_len(sentence);
        let candidate_len = if self.current.is_empty() {
            sentence_len
        } else {
            self.current_len + 1 + sentence_len
        };

        if candidate_len <= self.available() {
            if !self.current.is_empty() {
                self.current.push(' ');
            }
            self.current.push_str(sentence);
            self.current_len = candidate_len;
            return;
        }

        self.flush();
        if sentence_len > self.available() {
            self.force_split(sentence);
        } else {
            self.current = sentence.to_string();
            self.current_len = sentence_len;
        }
    }

    /// Carve a sentence that cannot fit any post into budget-sized chunks,
    /// preferring to cut at a space in the back half of each chunk.
    fn force_split(&mut self, sentence: &str) {
        debug!(
            chars = char_len(sentence),
            post_index = self.post_index(),
            "force-splitting oversized sentence"
        );

        let mut remaining = sentence.trim();
        while !remaining.is_empty() {
            // One code point minimum, or a tiny budget would never advance.
            let available = self.available().max(1);
            let remaining_len = char_len(remaining);
            let mut split_pos = remaining_len.min(available);

            if split_pos < remaining_len
                && let Some(space) = last_char_index_of(remaining, ' ', split_pos)
                && space * 2 >= split_pos
            {
                split_pos = space;
            }

            let (chunk, rest) = split_at_char(remaining, split_pos);
            let chunk = chunk.trim();
            if !chunk.is_empty() {
                self.bodies.push(chunk.to_string());
            }
            remaining = rest.trim();
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.bodies.push(std::mem::take(&mut self.current));
            self.current_len = 0;
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.bodies
    }
}

// ---------------------------------------------------------------------------
// Formatting pass
// ---------------------------------------------------------------------------

/// Decorate finished bodies with the true total and build posts.
fn apply_formatting(bodies: Vec<String>, options: SplitOptions) -> Vec<Post> {
    let total = bodies.len();
    bodies
        .into_iter()
        .enumerate()
        .map(|(i, body)| {
            let mut content = String::with_capacity(body.len() + 16);
            if options.include_numbering && total > 1 {
                content.push_str(&format!("{}/{} ", i + 1, total));
            }
            content.push_str(&body);
            if options.auto_add_continue && i + 1 < total {
                content.push(' ');
                content.push_str(CONTINUATION_MARKER);
            }
            Post::new(format!("post-{}", i + 1), content)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
