//! # tern
//!
//! Facade crate for a tool-calling coding agent. It re-exports the shared vocabulary from
//! [`tern_core`], the sandboxed executor from [`tern_sandbox`] and the orchestration loop
//! from [`tern_agent`]. Provider integrations are behind features.
//!
//! ## What's inside?
//!
//! - [`LanguageModel`]: the completion boundary. One request, one complete answer.
//! - [`Agent`]: the loop that sends the transcript, runs requested tools and repeats until
//!   the model signals completion.
//! - [`Sandbox`]: workspace-confined file access and shell execution with a command deny-list.
//! - [`TodoList`]: the session task list driven by the `todoWrite` tool.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tern::{Agent, openai::OpenAI};
//!
//! async fn demo(api_key: &str) -> Result<String, tern::AgentError> {
//!     let model = OpenAI::new(api_key).with_model("gpt-4.1");
//!     let mut agent = Agent::builder(model).workspace("./ws").build()?;
//!     agent.query("Write fizzbuzz.py and run it").await
//! }
//! ```
//!
//! ## Features
//!
//! - `openai`: the OpenAI-compatible chat-completions provider, as [`openai`].
//! - `full`: every provider.

pub use tern_core::{LanguageModel, llm};

pub use tern_agent::{
    Agent, AgentBuilder, AgentConfig, AgentError, HCons, Hook, PostToolAction, PreToolAction,
    Session, SessionOutcome, SessionState, StopContext, TodoError, TodoItem, TodoList, TodoStatus,
    ToolError, ToolInvocation, ToolRegistry, ToolResultContext, ToolUseContext, TranscriptLog,
};

pub use tern_sandbox::{Sandbox, SandboxConfig, SandboxError};

/// Sandboxed executor internals.
pub mod sandbox {
    pub use tern_sandbox::*;
}

/// OpenAI-compatible provider.
#[cfg(feature = "openai")]
pub mod openai {
    pub use tern_openai::*;
}
