use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "thr", about = concat!("thr v", env!("CARGO_PKG_VERSION"), " - turn prose into a numbered post thread"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Read and write settings/history in this directory
    #[arg(long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split text into thread posts
    Split(SplitArgs),
    /// Count characters the way the post limit does
    Count(CountArgs),
    /// Show or change settings
    Settings(SettingsCmd),
    /// Show previously saved threads
    History(HistoryCmd),
}

// ---------------------------------------------------------------------------
// split / count
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SplitArgs {
    /// Text file to split (`-` or omitted reads stdin)
    pub input: Option<PathBuf>,
    /// Per-post character budget (default: settings)
    #[arg(long, short = 'm')]
    pub max_chars: Option<usize>,
    /// Prefix posts with `i/N`
    #[arg(long, overrides_with = "no_numbering")]
    pub numbering: bool,
    /// Do not number posts
    #[arg(long, overrides_with = "numbering")]
    pub no_numbering: bool,
    /// Append ` →` to all but the last post
    #[arg(long, overrides_with = "no_continue_marker")]
    pub continue_marker: bool,
    /// Do not append a continuation marker
    #[arg(long, overrides_with = "continue_marker")]
    pub no_continue_marker: bool,
    /// Summarize first by piping the text through this shell command
    #[arg(long, value_name = "CMD")]
    pub summarize_cmd: Option<String>,
    /// Source tag: manual, clipboard, or an extractor name
    #[arg(long)]
    pub source: Option<String>,
    /// Record the result in the history
    #[arg(long)]
    pub save: bool,
}

impl SplitArgs {
    pub fn numbering_override(&self) -> Option<bool> {
        flag_pair(self.numbering, self.no_numbering)
    }

    pub fn continue_marker_override(&self) -> Option<bool> {
        flag_pair(self.continue_marker, self.no_continue_marker)
    }
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Args)]
pub struct CountArgs {
    /// Text to count (reads stdin when omitted)
    pub text: Vec<String>,
}

// ---------------------------------------------------------------------------
// settings
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SettingsCmd {
    #[command(subcommand)]
    pub action: Option<SettingsAction>,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings (default)
    Show,
    /// Set one setting: max_chars_per_post, include_numbering,
    /// auto_add_continue, llm.provider, llm.model, llm.api_key
    Set {
        key: String,
        value: String,
    },
    /// Switch summarization provider and reset its model to the default
    Provider {
        /// openai, anthropic or gemini
        name: String,
    },
    /// Restore default settings
    Reset,
    /// Print the settings file path
    Path,
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct HistoryCmd {
    #[command(subcommand)]
    pub action: Option<HistoryAction>,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved threads (default)
    List,
    /// Show the posts of one saved thread (1 = most recent)
    Show { index: usize },
}
