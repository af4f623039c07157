//! Property-style checks of the splitter and the thread edit operations,
//! driven through the public library API.

use pretty_assertions::assert_eq;

use threader::model::{ContentSource, PLATFORM_CHAR_LIMIT, Post, Thread};
use threader::ops::splitter::{CONTINUATION_MARKER, SplitOptions, normalize, reserved_chars, split};
use threader::ops::thread_ops::{add_post, build_thread, remove_post, reorder_posts, update_post};

const BOTH: SplitOptions = SplitOptions {
    include_numbering: true,
    auto_add_continue: true,
};

const NONE: SplitOptions = SplitOptions {
    include_numbering: false,
    auto_add_continue: false,
};

const ESSAY: &str = "The first paragraph opens with a claim. It goes on for a while, \
adding detail after detail until the reader wonders where it ends! Does it end?\r\n\r\n\r\n\r\n\
A second paragraph follows. これは日本語の文です。もう一つの文です！\n\n\
Finally averyveryverylongwordwithoutanybreaksthatmustbeforcesplitbecauseitcannotfit \
and then a few closing words.";

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Remove the `i/N ` prefix and ` →` suffix added by the formatting pass.
fn body(content: &str, index: usize, total: usize, options: SplitOptions) -> String {
    let mut s = content;
    let prefix = format!("{}/{} ", index + 1, total);
    if options.include_numbering && total > 1 {
        s = s.strip_prefix(prefix.as_str()).expect("numbering prefix");
    }
    let suffix = format!(" {}", CONTINUATION_MARKER);
    if options.auto_add_continue && index + 1 < total {
        s = s.strip_suffix(suffix.as_str()).expect("continuation suffix");
    }
    s.to_string()
}

fn thread_of(contents: &[&str]) -> Thread {
    let posts = contents
        .iter()
        .enumerate()
        .map(|(i, c)| Post::new(format!("post-{}", i + 1), *c))
        .collect();
    build_thread(posts, contents.join(" "), ContentSource::Manual).unwrap()
}

// ---------------------------------------------------------------------------
// split
// ---------------------------------------------------------------------------

#[test]
fn budget_holds_for_every_post_at_its_index() {
    for max_chars in [30, 45, 60, 140] {
        let posts = split(ESSAY, max_chars, BOTH).unwrap();
        let total = posts.len();
        assert!(total > 1);
        for (i, post) in posts.iter().enumerate() {
            let body = body(post.content(), i, total, BOTH);
            let budget = max_chars - reserved_chars(i + 1, BOTH);
            assert!(
                body.chars().count() <= budget,
                "post {} of {} at max {}: {:?}",
                i + 1,
                total,
                max_chars,
                body
            );
        }
    }
}

#[test]
fn no_text_is_lost_or_duplicated() {
    let expected = strip_whitespace(&normalize(ESSAY));
    for options in [NONE, BOTH] {
        for max_chars in [25, 50, 140] {
            let posts = split(ESSAY, max_chars, options).unwrap();
            let total = posts.len();
            let joined: String = posts
                .iter()
                .enumerate()
                .map(|(i, p)| body(p.content(), i, total, options))
                .collect();
            assert_eq!(strip_whitespace(&joined), expected);
        }
    }
}

#[test]
fn normalize_is_idempotent() {
    for input in [ESSAY, "  a\r\rb\n\n\n\nc  ", "", "plain"] {
        let once = normalize(input);
        assert_eq!(normalize(&once), once);
    }
}

#[test]
fn single_post_is_never_numbered() {
    let posts = split("short text", 140, BOTH).unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content(), "short text");
    assert!(!posts[0].content().contains("1/1"));
}

#[test]
fn continuation_marker_on_all_but_last() {
    let posts = split(ESSAY, 50, BOTH).unwrap();
    let (last, rest) = posts.split_last().unwrap();
    assert!(!rest.is_empty());
    for post in rest {
        assert!(post.content().ends_with(" →"), "{:?}", post.content());
    }
    assert!(!last.content().ends_with(CONTINUATION_MARKER));
}

#[test]
fn force_split_long_run() {
    let text = "a".repeat(500);
    let posts = split(&text, 50, BOTH).unwrap();
    assert!(posts.len() >= 10);
    let total = posts.len();
    let mut joined = String::new();
    for (i, post) in posts.iter().enumerate() {
        let body = body(post.content(), i, total, BOTH);
        assert!(!body.is_empty());
        joined.push_str(&body);
    }
    assert_eq!(joined, text);
}

#[test]
fn japanese_two_post_example() {
    let posts = split("これはテスト文です。次の文です。", 20, BOTH).unwrap();
    assert_eq!(posts.len(), 2);
    assert!(posts[0].content().starts_with("1/2 "));
    assert!(posts[0].content().ends_with(CONTINUATION_MARKER));
    assert!(posts[1].content().starts_with("2/2 "));
    assert!(!posts[1].content().ends_with(CONTINUATION_MARKER));
    for post in &posts {
        assert!(post.char_count() <= PLATFORM_CHAR_LIMIT);
        assert_eq!(post.char_count(), post.content().chars().count());
    }
}

#[test]
fn empty_input_gives_no_posts() {
    assert!(split(" \n\n \r\n", 140, BOTH).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// thread edits
// ---------------------------------------------------------------------------

#[test]
fn remove_keeps_total_in_sync() {
    let thread = thread_of(&["one", "two", "three"]);
    let removed = remove_post(&thread, "post-2");
    assert_eq!(removed.total_posts(), removed.posts().len());
    assert_eq!(removed.total_posts(), 2);
    assert_eq!(thread.total_posts(), 3);
}

#[test]
fn reorder_first_to_last() {
    let thread = thread_of(&["one", "two", "three"]);
    let moved = reorder_posts(&thread, 0, 2);
    let contents: Vec<&str> = moved.posts().iter().map(|p| p.content()).collect();
    assert_eq!(contents, vec!["two", "three", "one"]);
}

#[test]
fn update_recounts() {
    let thread = thread_of(&["one", "two"]);
    let long = "🎉".repeat(281);
    let updated = update_post(&thread, "post-1", &long);
    let post = updated.post("post-1").unwrap();
    assert_eq!(post.char_count(), 281);
    assert!(post.is_over_limit());

    let shorter = update_post(&updated, "post-1", "ok");
    assert!(!shorter.post("post-1").unwrap().is_over_limit());
}

#[test]
fn added_posts_get_distinct_ids() {
    let thread = thread_of(&["one", "two"]);
    let once = add_post(&thread, "post-1");
    let twice = add_post(&once, "post-1");
    assert_eq!(twice.total_posts(), 4);
    let mut ids: Vec<&str> = twice.posts().iter().map(|p| p.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}
