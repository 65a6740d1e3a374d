//! Agent error types.

use core::fmt;

use tern_sandbox::SandboxError;

use crate::todo::TodoError;

/// Errors that end a session or prevent one from starting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// The completion boundary failed; carries the failure text.
    Completion(String),

    /// Configuration error.
    Config(String),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completion(e) => write!(f, "completion failed: {e}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for AgentError {}

impl From<SandboxError> for AgentError {
    fn from(error: SandboxError) -> Self {
        Self::Config(format!("failed to open workspace: {error}"))
    }
}

/// Failure of a single tool call.
///
/// These never end a session. The loop turns them into the text of the tool's
/// response message so the model can react.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The sandboxed operation failed.
    #[error(transparent)]
    Sandbox(#[from] SandboxError),

    /// No tool with this name is advertised.
    #[error("unknown tool `{name}`")]
    UnknownTool {
        /// Name requested by the model.
        name: String,
    },

    /// The arguments are not valid JSON or do not match the tool's schema.
    #[error("invalid arguments for `{tool}`: {reason}")]
    InvalidArguments {
        /// Tool the arguments were meant for.
        tool: String,
        /// Parser message naming the offending field.
        reason: String,
    },

    /// The proposed task list violates one of its rules.
    #[error("invalid task list: {0}")]
    InvalidTaskList(#[from] TodoError),

    /// A hook refused the call.
    #[error("tool call denied: {0}")]
    Denied(String),
}

impl ToolError {
    /// Text placed in the tool response message for this failure.
    #[must_use]
    pub fn to_message(&self) -> String {
        format!("Error: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_error_messages() {
        let err = ToolError::from(SandboxError::PatternNotFound {
            path: "a.rs".into(),
        });
        assert_eq!(err.to_message(), "Error: pattern not found in `a.rs`");

        let err = ToolError::from(TodoError::MultipleInProgress { count: 2 });
        assert_eq!(
            err.to_message(),
            "Error: invalid task list: 2 tasks are in_progress, at most one allowed"
        );

        let err = ToolError::UnknownTool {
            name: "deploy".into(),
        };
        assert_eq!(err.to_string(), "unknown tool `deploy`");
    }

    #[test]
    fn agent_error_display() {
        let err = AgentError::Completion("connection refused".into());
        assert_eq!(err.to_string(), "completion failed: connection refused");
    }
}
