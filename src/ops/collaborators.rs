//! Capabilities the thread generator depends on but does not implement:
//! pulling text out of some source, and summarizing it before splitting.
//! Callers inject implementations; the splitter never sees them.

use std::fs;
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, info};

use crate::model::config::LlmConfig;

/// Result of a summarizer call. Only `summary` is fed to the splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub summary: String,
    pub key_points: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("summarizer failed: {0}")]
    Provider(String),
    #[error("summarizer returned an empty summary")]
    EmptySummary,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns long content into a shorter summary. Called at most once per
/// generation, never retried.
pub trait Summarizer {
    fn summarize(&self, content: &str, config: &LlmConfig) -> Result<Summary, SummarizeError>;
}

/// Text pulled from an external source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies `(title, content)` from some source. `Ok(None)` means the source
/// had nothing usable.
pub trait ContentExtractor {
    /// Short name recorded as the thread's source
    fn name(&self) -> &str;

    fn extract(&self) -> Result<Option<ExtractedContent>, ExtractError>;
}

// ---------------------------------------------------------------------------
// File / stdin extractor
// ---------------------------------------------------------------------------

/// Reads a text file, or stdin when the path is `-`.
#[derive(Debug, Clone)]
pub struct FileExtractor {
    path: PathBuf,
}

impl FileExtractor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileExtractor { path: path.into() }
    }

    pub fn is_stdin(&self) -> bool {
        self.path == Path::new("-")
    }
}

impl ContentExtractor for FileExtractor {
    fn name(&self) -> &str {
        "file"
    }

    fn extract(&self) -> Result<Option<ExtractedContent>, ExtractError> {
        let (title, content) = if self.is_stdin() {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            (String::new(), buf)
        } else {
            let content = fs::read_to_string(&self.path).map_err(|e| ExtractError::ReadError {
                path: self.path.clone(),
                source: e,
            })?;
            let title = self
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            (title, content)
        };

        if content.trim().is_empty() {
            debug!(path = %self.path.display(), "extractor found no content");
            return Ok(None);
        }
        Ok(Some(ExtractedContent { title, content }))
    }
}

// ---------------------------------------------------------------------------
// External command summarizer
// ---------------------------------------------------------------------------

/// Runs a shell command with the content on stdin and takes its stdout as
/// the summary. Provider, model and key are exported to the command as
/// `THREADER_LLM_PROVIDER`, `THREADER_LLM_MODEL` and `THREADER_LLM_API_KEY`.
#[derive(Debug, Clone)]
pub struct CommandSummarizer {
    command: String,
}

impl CommandSummarizer {
    pub fn new(command: impl Into<String>) -> Self {
        CommandSummarizer {
            command: command.into(),
        }
    }
}

impl Summarizer for CommandSummarizer {
    fn summarize(&self, content: &str, config: &LlmConfig) -> Result<Summary, SummarizeError> {
        info!(command = %self.command, provider = %config.provider, "running summarizer");

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .env("THREADER_LLM_PROVIDER", config.provider.as_str())
            .env("THREADER_LLM_MODEL", &config.model)
            .env("THREADER_LLM_API_KEY", &config.api_key)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Stdin is written on its own thread while stdout and stderr drain.
        // Dropping stdin closes it. A command that stops reading early is fine.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = content.to_owned();
            thread::spawn(move || match stdin.write_all(input.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            })
        });
        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            writer
                .join()
                .map_err(|_| io::Error::other("summarizer stdin writer panicked"))??;
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SummarizeError::Provider(format!(
                "`{}` exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        parse_summary(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Build a [`Summary`] from summarizer output. Bullet lines (`- ` or `・`)
/// are also collected as key points.
pub fn parse_summary(raw: &str) -> Result<Summary, SummarizeError> {
    let summary = raw.trim();
    if summary.is_empty() {
        return Err(SummarizeError::EmptySummary);
    }
    let key_points = summary
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            line.strip_prefix("- ")
                .or_else(|| line.strip_prefix('・'))
                .map(|p| p.trim().to_string())
        })
        .filter(|p| !p.is_empty())
        .collect();
    Ok(Summary {
        summary: summary.to_string(),
        key_points,
    })
}
