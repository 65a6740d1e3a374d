//! Readable Markdown log of a session.
//!
//! An append-only file with the conversational flow: user turns, assistant text,
//! tool invocations and their (truncated) results. Write failures are logged and
//! otherwise ignored; the log never affects the session.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use async_fs::OpenOptions;
use futures_lite::AsyncWriteExt;

/// Lines of a tool result kept in the log.
const MAX_RESULT_LINES: usize = 200;

/// Append-only writer for the readable transcript.
#[derive(Debug, Clone)]
pub struct TranscriptLog {
    path: PathBuf,
}

impl TranscriptLog {
    /// Creates a log writing to `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) async fn write_user_message(&self, content: &str) {
        let mut block = String::new();
        let _ = writeln!(block, "\n## User\n");
        let _ = writeln!(block, "{content}\n");
        self.append(&block).await;
    }

    pub(crate) async fn write_assistant_text(&self, content: &str) {
        if content.is_empty() {
            return;
        }
        let mut block = String::new();
        let _ = writeln!(block, "\n## Assistant\n");
        let _ = writeln!(block, "{content}\n");
        self.append(&block).await;
    }

    pub(crate) async fn write_tool_call(&self, name: &str, arguments: &str) {
        let mut block = String::new();
        let _ = writeln!(block, "\n### Tool: {name}\n");
        let _ = writeln!(block, "```json");
        let _ = writeln!(block, "{arguments}");
        let _ = writeln!(block, "```\n");
        self.append(&block).await;
    }

    pub(crate) async fn write_tool_result(&self, name: &str, output: &str, is_error: bool) {
        let truncated = truncate_lines(output, MAX_RESULT_LINES);
        let label = if is_error { " (error)" } else { "" };
        self.append(&format!("-> {name}{label}: {truncated}\n\n")).await;
    }

    pub(crate) async fn write_failure(&self, error: &str) {
        self.append(&format!("\n---\n\n*[Session failed: {error}]*\n\n")).await;
    }

    async fn append(&self, content: &str) {
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await;

        match result {
            Ok(mut file) => {
                if let Err(e) = file.write_all(content.as_bytes()).await {
                    tracing::warn!("Failed to append to transcript: {}", e);
                }
                if let Err(e) = file.flush().await {
                    tracing::warn!("Failed to flush transcript: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to open transcript for append: {}", e);
            }
        }
    }
}

fn truncate_lines(s: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = s.lines().collect();
    if lines.len() <= max_lines {
        return s.to_string();
    }
    let omitted = lines.len() - max_lines;
    format!("{}\n... ({omitted} lines omitted)", lines[..max_lines].join("\n"))
}
