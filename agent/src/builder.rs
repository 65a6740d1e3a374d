//! Builder for constructing agents with custom configuration.

use std::path::{Path, PathBuf};

use tern_core::{LanguageModel, llm::ToolChoice};
use tern_sandbox::{Sandbox, SandboxConfig};

use crate::{
    agent::Agent,
    config::AgentConfig,
    error::AgentError,
    hook::{HCons, Hook},
};

/// Builder for constructing agents with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// let agent = Agent::builder(model)
///     .workspace("./ws")
///     .sandbox_config(SandboxConfig::default().with_timeout(Duration::from_secs(30)))
///     .hook(LoggingHook)
///     .max_turns(50)
///     .build()?;
/// ```
#[must_use]
pub struct AgentBuilder<LLM, H = ()> {
    llm: LLM,
    hooks: H,
    config: AgentConfig,
    workspace: Option<PathBuf>,
    sandbox_config: SandboxConfig,
    sandbox: Option<Sandbox>,
}

impl<LLM, H> std::fmt::Debug for AgentBuilder<LLM, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentBuilder")
            .field("config", &self.config)
            .field("workspace", &self.workspace)
            .finish_non_exhaustive()
    }
}

impl<LLM: LanguageModel> AgentBuilder<LLM, ()> {
    /// Creates a new agent builder with default configuration.
    pub fn new(llm: LLM) -> Self {
        Self {
            llm,
            hooks: (),
            config: AgentConfig::default(),
            workspace: None,
            sandbox_config: SandboxConfig::default(),
            sandbox: None,
        }
    }
}

impl<LLM, H> AgentBuilder<LLM, H>
where
    LLM: LanguageModel,
    H: Hook,
{
    /// Adds a hook to intercept agent operations.
    ///
    /// Hooks are composed using the HCons pattern, allowing multiple
    /// hooks to be chained at compile time.
    pub fn hook<NH: Hook>(self, hook: NH) -> AgentBuilder<LLM, HCons<NH, H>> {
        AgentBuilder {
            llm: self.llm,
            hooks: HCons::new(hook, self.hooks),
            config: self.config,
            workspace: self.workspace,
            sandbox_config: self.sandbox_config,
            sandbox: self.sandbox,
        }
    }

    /// Sets the workspace root. Defaults to the current directory.
    pub fn workspace(mut self, root: impl AsRef<Path>) -> Self {
        self.workspace = Some(root.as_ref().to_path_buf());
        self
    }

    /// Sets the sandbox configuration used with [`AgentBuilder::workspace`].
    pub fn sandbox_config(mut self, config: SandboxConfig) -> Self {
        self.sandbox_config = config;
        self
    }

    /// Uses an already opened sandbox. Overrides the workspace settings.
    pub fn sandbox(mut self, sandbox: Sandbox) -> Self {
        self.sandbox = Some(sandbox);
        self
    }

    /// Sets the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the maximum number of completion calls per session.
    pub const fn max_turns(mut self, limit: usize) -> Self {
        self.config.max_turns = Some(limit);
        self
    }

    /// Sets the tool-choice mode.
    pub const fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.config.tool_choice = choice;
        self
    }

    /// Enables or disables the `todoWrite` tool.
    pub const fn todo(mut self, enabled: bool) -> Self {
        self.config.enable_todo = enabled;
        self
    }

    /// Writes a Markdown transcript to `path`.
    pub fn transcript(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.transcript_path = Some(path.into());
        self
    }

    /// Sets the full agent configuration.
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the agent, opening the workspace if no sandbox was given.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] if the workspace cannot be opened.
    pub fn build(self) -> Result<Agent<LLM, H>, AgentError> {
        let sandbox = match self.sandbox {
            Some(sandbox) => sandbox,
            None => {
                let root = self.workspace.unwrap_or_else(|| PathBuf::from("."));
                Sandbox::with_config(root, self.sandbox_config)?
            }
        };
        Ok(Agent::from_parts(self.llm, self.hooks, sandbox, self.config))
    }
}
