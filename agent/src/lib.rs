//! Tern Agent
//!
//! A tool-calling agent loop confined to one workspace directory. The agent sends the
//! transcript and its tool catalogue to a [`LanguageModel`](tern_core::LanguageModel),
//! runs the tool calls the model asks for through a sandbox, feeds the results back,
//! and repeats until the model says it is done.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tern_agent::Agent;
//!
//! // Single-shot
//! let mut agent = Agent::builder(model).workspace("./ws").build()?;
//! let answer = agent.query("Create hello.py that prints a greeting").await?;
//!
//! // Continuous conversation
//! let outcome = agent.send("Now add a test for it").await;
//! println!("{}", outcome.final_text);
//! ```
//!
//! # Tools
//!
//! | Name | Arguments | Effect |
//! |------|-----------|--------|
//! | `bash` | `command` | Runs a shell command in the workspace root |
//! | `read` | `path`, `lineLimit?` | Reads a file, optionally truncated |
//! | `write` | `path`, `content` | Creates or overwrites a file |
//! | `edit` | `path`, `old_content`, `new_content` | Replaces a unique fragment |
//! | `todoWrite` | `todos` | Replaces the session task list |
//!
//! Failed tool calls never end a session: the error text becomes the tool's answer
//! and the model decides what to do next. Only a failing completion call ends a
//! session in [`SessionState::Failed`].

mod agent;
mod builder;
mod config;
mod error;
mod hook;
mod session;
mod transcript;

pub mod todo;
pub mod tools;

// Public API
pub use agent::Agent;
pub use builder::AgentBuilder;
pub use config::AgentConfig;
pub use error::{AgentError, ToolError};
pub use hook::{
    HCons, Hook, PostToolAction, PreToolAction, StopContext, ToolResultContext, ToolUseContext,
};
pub use session::{Session, SessionOutcome, SessionState};
pub use todo::{MAX_TODOS, TodoError, TodoItem, TodoList, TodoStatus, TodoWriteArgs};
pub use tools::{ToolInvocation, ToolRegistry};
pub use transcript::TranscriptLog;
