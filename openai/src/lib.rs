//! OpenAI-compatible chat-completions provider for `tern`.
//!
//! Works against the `OpenAI` API and any server speaking the same
//! `POST /chat/completions` protocol with function tools (Deepseek, OpenRouter,
//! vLLM, llama.cpp server, Ollama). Requests are non-streaming.
//!
//! ```no_run
//! use tern_core::{LanguageModel, llm::CompletionRequest};
//! use tern_openai::OpenAI;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let model = OpenAI::new(std::env::var("OPENAI_API_KEY")?).with_model("gpt-4.1-mini");
//!
//! let request = CompletionRequest::oneshot(
//!     "You are a concise assistant.",
//!     "Explain the Rust ownership model in one paragraph.",
//! );
//! let completion = model.respond(request).await?;
//! println!("{}", completion.content);
//! # Ok(()) }
//! ```

mod client;
mod error;
mod request;
mod response;

pub use client::{DEFAULT_REQUEST_TIMEOUT, OpenAI, OpenAIConfig};
pub use error::OpenAIError;

mod constant;
pub use constant::*;

pub(crate) const DEFAULT_MODEL: &str = GPT4_1;
pub(crate) const DEFAULT_BASE_URL: &str = OPENAI_BASE_URL;
