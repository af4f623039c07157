mod settings;
pub use settings::cmd_settings;

use std::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{config_io, history_io};
use crate::model::thread::ContentSource;
use crate::ops::collaborators::{CommandSummarizer, ContentExtractor, FileExtractor};
use crate::ops::session::ThreadSession;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let json = cli.json;
    let dir = config_io::config_dir(cli.config_dir.as_deref());
    debug!(config_dir = %dir.display(), "resolved config directory");

    match cli.command {
        Commands::Split(args) => cmd_split(args, json, &dir),
        Commands::Count(args) => cmd_count(args, json),
        Commands::Settings(args) => cmd_settings(args, json, &dir),
        Commands::History(args) => cmd_history(args, json, &dir),
    }
}

// ---------------------------------------------------------------------------
// split
// ---------------------------------------------------------------------------

fn cmd_split(args: SplitArgs, json: bool, dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut settings = config_io::read_settings(dir)?;
    if let Some(max) = args.max_chars {
        settings.max_chars_per_post = max;
    }
    if let Some(on) = args.numbering_override() {
        settings.include_numbering = on;
    }
    if let Some(on) = args.continue_marker_override() {
        settings.auto_add_continue = on;
    }

    let extractor = FileExtractor::new(args.input.clone().unwrap_or_else(|| PathBuf::from("-")));
    let extracted = extractor.extract()?.ok_or("no content to split")?;
    let source = match args.source.as_deref() {
        Some(tag) => parse_source(tag),
        None if extractor.is_stdin() => ContentSource::Manual,
        None => ContentSource::Extractor(extractor.name().to_string()),
    };

    let mut session = ThreadSession::new(settings);
    let use_summarizer = args.summarize_cmd.is_some();
    if let Some(cmd) = args.summarize_cmd {
        session = session.with_summarizer(Box::new(CommandSummarizer::new(cmd)));
    }
    let thread = session.generate(&extracted.content, source, use_summarizer)?;

    if args.save {
        history_io::save_history(dir, thread.original_content(), thread.contents())?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&ThreadJson::from(thread))?);
    } else {
        println!("{}", format_thread(thread));
    }
    Ok(())
}

fn parse_source(tag: &str) -> ContentSource {
    match tag.trim().to_ascii_lowercase().as_str() {
        "manual" => ContentSource::Manual,
        "clipboard" => ContentSource::Clipboard,
        other => ContentSource::Extractor(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// count
// ---------------------------------------------------------------------------

fn cmd_count(args: CountArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let text = if args.text.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf.trim_end_matches(['\n', '\r']).to_string()
    } else {
        args.text.join(" ")
    };

    let count = CountJson::for_text(&text);
    if json {
        println!("{}", serde_json::to_string(&count)?);
    } else {
        println!("{}", format_count(&count));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

fn cmd_history(args: HistoryCmd, json: bool, dir: &Path) -> Result<(), Box<dyn Error>> {
    let history = history_io::load_history(dir);
    match args.action.unwrap_or(HistoryAction::List) {
        HistoryAction::List => {
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else {
                println!("{}", format_history_list(&history));
            }
        }
        HistoryAction::Show { index } => {
            let entry = index
                .checked_sub(1)
                .and_then(|i| history.get(i))
                .ok_or_else(|| {
                    format!("no saved thread #{} ({} saved)", index, history.len())
                })?;
            if json {
                println!("{}", serde_json::to_string_pretty(entry)?);
            } else {
                println!("{}", format_history_entry(entry));
            }
        }
    }
    Ok(())
}
