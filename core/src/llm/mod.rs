//! # Language Models and the Completion Boundary
//!
//! The agent talks to a model through a single request/response exchange: it sends the
//! whole transcript plus the tool catalogue, and receives one [`Completion`] carrying a
//! finish signal, the assistant's text, and any tool invocations the model requested.
//!
//! ## Core Components
//!
//! - **[`LanguageModel`]** - The boundary trait providers implement
//! - **[`CompletionRequest`]** - Messages, advertised tools and the tool-choice mode
//! - **[`Completion`]** - The model's answer with its [`FinishReason`]
//! - **[`Message`]** - Individual transcript entries
//! - **[`ToolDefinition`]** - Declarative tool descriptors derived from typed arguments
//!
//! ## Implementing a provider
//!
//! ```rust
//! use std::convert::Infallible;
//! use tern_core::llm::{Completion, CompletionRequest, FinishReason, LanguageModel};
//!
//! struct Echo;
//!
//! impl LanguageModel for Echo {
//!     type Error = Infallible;
//!
//!     async fn respond(&self, request: CompletionRequest) -> Result<Completion, Self::Error> {
//!         let last = request.messages.last().map(|m| m.content().to_owned()).unwrap_or_default();
//!         Ok(Completion::text(FinishReason::Stop, last))
//!     }
//! }
//! ```

pub mod message;
pub mod response;
pub mod tool;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use message::{Message, Role};
pub use response::{Completion, FinishReason};
pub use tool::{ToolCall, ToolDefinition, ToolSpec};

/// How the model is allowed to use the advertised tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    /// The model decides whether to call tools.
    #[default]
    Auto,
    /// The model must not call tools.
    None,
    /// The model must call at least one tool.
    Required,
}

impl ToolChoice {
    /// Wire name used by function-calling endpoints.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::Required => "required",
        }
    }
}

/// A single call to the completion boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Full conversation, system message first.
    pub messages: Vec<Message>,
    /// Tool catalogue advertised to the model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    /// Tool-choice mode.
    #[serde(default)]
    pub tool_choice: ToolChoice,
}

impl CompletionRequest {
    /// Creates a request without tools.
    pub fn new(messages: impl Into<Vec<Message>>) -> Self {
        Self {
            messages: messages.into(),
            tools: Vec::new(),
            tool_choice: ToolChoice::Auto,
        }
    }

    /// Creates a request with a system prompt and a single user message.
    pub fn oneshot(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self::new([Message::system(system), Message::user(user)])
    }

    /// Sets the advertised tools.
    #[must_use]
    pub fn with_tools(mut self, tools: impl Into<Vec<ToolDefinition>>) -> Self {
        self.tools = tools.into();
        self
    }

    /// Sets the tool-choice mode.
    #[must_use]
    pub const fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }
}

/// Language models for text generation and tool calling.
///
/// A call is a plain request/response exchange. Implementations report transport and
/// protocol failures through [`LanguageModel::Error`]; they never retry on their own.
pub trait LanguageModel: Sized + Send + Sync {
    /// The error type returned by this language model.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Sends the request and waits for the complete answer.
    fn respond(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send;
}

macro_rules! impl_language_model {
    ($($name:ident),*) => {
        $(
            impl<T: LanguageModel> LanguageModel for $name<T> {
                type Error = T::Error;

                fn respond(
                    &self,
                    request: CompletionRequest,
                ) -> impl Future<Output = Result<Completion, Self::Error>> + Send {
                    T::respond(self, request)
                }
            }
        )*
    };
}

impl<T: LanguageModel> LanguageModel for &T {
    type Error = T::Error;

    fn respond(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send {
        T::respond(self, request)
    }
}

impl_language_model!(Arc, Box);
