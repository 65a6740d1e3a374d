//! Agent configuration.

use std::path::PathBuf;

use tern_core::llm::ToolChoice;

/// Configuration for agent behavior.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// System prompt replacing the built-in instructions.
    pub system_prompt: Option<String>,

    /// Maximum number of completion calls per session. `None` leaves the loop
    /// unbounded; it then stops only on the model's finish signal.
    pub max_turns: Option<usize>,

    /// Tool-choice mode sent with every request.
    pub tool_choice: ToolChoice,

    /// Whether the `todoWrite` tool is advertised.
    pub enable_todo: bool,

    /// Markdown transcript written alongside the session.
    pub transcript_path: Option<PathBuf>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            max_turns: None,
            tool_choice: ToolChoice::Auto,
            enable_todo: true,
            transcript_path: None,
        }
    }
}

impl AgentConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the turn limit.
    #[must_use]
    pub const fn with_max_turns(mut self, limit: usize) -> Self {
        self.max_turns = Some(limit);
        self
    }

    /// Sets the tool-choice mode.
    #[must_use]
    pub const fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }

    /// Enables or disables the `todoWrite` tool.
    #[must_use]
    pub const fn with_todo(mut self, enabled: bool) -> Self {
        self.enable_todo = enabled;
        self
    }

    /// Writes a Markdown transcript to `path`.
    #[must_use]
    pub fn with_transcript(mut self, path: impl Into<PathBuf>) -> Self {
        self.transcript_path = Some(path.into());
        self
    }
}
