//! # tern-core
//!
//! Shared vocabulary for the `tern` workspace: the conversation model exchanged with a
//! language model, the completion boundary trait every provider implements, and the
//! declarative tool definitions advertised on each request.
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   tern-agent    │───▶│    tern-core     │◀───│   Providers     │
//! │                 │    │   (this crate)   │    │                 │
//! │ - session loop  │    │ - LanguageModel  │    │ - openai        │
//! │ - tool registry │    │ - Message        │    │ - scripted test │
//! │ - task list     │    │ - ToolDefinition │    │   models        │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use tern_core::llm::{CompletionRequest, LanguageModel, Message};
//!
//! async fn ask<M: LanguageModel>(model: M) -> Result<String, M::Error> {
//!     let request = CompletionRequest::new([
//!         Message::system("You are a careful assistant."),
//!         Message::user("What does `ls -la` print?"),
//!     ]);
//!     let completion = model.respond(request).await?;
//!     Ok(completion.content)
//! }
//! ```

pub mod llm;

#[doc(inline)]
pub use llm::LanguageModel;
