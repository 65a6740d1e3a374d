//! Debug hook for watching the agent work.
//!
//! Tool activity goes to stderr so stdout carries only the model's answers.

use tern_agent::{
    Hook, PostToolAction, PreToolAction, SessionState, StopContext, ToolResultContext,
    ToolUseContext,
};

const PREVIEW_LINES: usize = 10;
const PREVIEW_CHARS: usize = 500;

/// A hook that prints tool calls, results and completion stats to stderr.
#[derive(Debug, Clone, Copy)]
pub struct DebugHook {
    enabled: bool,
}

impl DebugHook {
    /// Creates a hook. A disabled hook prints nothing.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for DebugHook {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Hook for DebugHook {
    async fn pre_tool_use(&self, ctx: &ToolUseContext<'_>) -> PreToolAction {
        if self.enabled {
            eprintln!(
                "\x1b[36m[tool]\x1b[0m {} \x1b[90m(turn {}, {})\x1b[0m",
                ctx.tool_name, ctx.turn, ctx.call_id
            );

            // Pretty print JSON arguments if possible
            if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(ctx.arguments)
                && let Ok(pretty) = serde_json::to_string_pretty(&parsed)
            {
                for line in pretty.lines() {
                    eprintln!("  \x1b[90m{line}\x1b[0m");
                }
            }
        }
        PreToolAction::Allow
    }

    async fn post_tool_use(&self, ctx: &ToolResultContext<'_>) -> PostToolAction {
        if self.enabled {
            let duration_ms = ctx.duration.as_millis();
            if ctx.is_error {
                eprintln!(
                    "\x1b[31m[error]\x1b[0m {} \x1b[90m({duration_ms}ms)\x1b[0m",
                    ctx.tool_name
                );
                eprintln!("  \x1b[31m{}\x1b[0m", ctx.output);
            } else {
                eprintln!(
                    "\x1b[32m[ok]\x1b[0m {} \x1b[90m({duration_ms}ms)\x1b[0m",
                    ctx.tool_name
                );
                let preview = truncate_output(ctx.output, PREVIEW_CHARS);
                let total = preview.lines().count();
                for line in preview.lines().take(PREVIEW_LINES) {
                    eprintln!("  \x1b[90m{line}\x1b[0m");
                }
                if total > PREVIEW_LINES {
                    eprintln!("  \x1b[90m... ({} more lines)\x1b[0m", total - PREVIEW_LINES);
                }
            }
        }
        PostToolAction::Keep
    }

    async fn on_stop(&self, ctx: &StopContext<'_>) {
        if !self.enabled {
            return;
        }
        let status = match ctx.state {
            SessionState::Done { warning: None } => "done".to_owned(),
            SessionState::Done {
                warning: Some(warning),
            } => format!("done, {warning}"),
            SessionState::Failed { .. } => "failed".to_owned(),
            SessionState::AwaitingModel | SessionState::ProcessingTools => "interrupted".to_owned(),
        };
        eprintln!("\x1b[90m[{} turn(s), {status}]\x1b[0m", ctx.turns);
    }
}

/// Truncates output to a maximum number of characters, adding ellipsis if truncated.
fn truncate_output(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_owned(),
    }
}
