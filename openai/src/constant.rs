//! Model & endpoint constants
//!
//! Only stable, non-snapshot model names plus well-known OpenAI-compatible base URLs.
//! Any other model string can be passed to [`OpenAI::with_model`](crate::OpenAI::with_model).

/// Default `OpenAI` API base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// [`Deepseek`](https://api-docs.deepseek.com)'s OpenAI-compatible base URL.
pub const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com/v1";
/// [`OpenRouter`](https://openrouter.ai)'s OpenAI-compatible base URL.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Flagship GPT-5 model.
pub const GPT5: &str = "gpt-5";

/// Smaller, cheaper GPT-5 variant.
pub const GPT5_MINI: &str = "gpt-5-mini";

/// Smallest GPT-5 variant optimized for speed & cost.
pub const GPT5_NANO: &str = "gpt-5-nano";

/// GPT-4.1, strong at instruction following and tool use.
pub const GPT4_1: &str = "gpt-4.1";

/// Multimodal GPT-4o.
pub const GPT4O: &str = "gpt-4o";

/// Cheap GPT-4o variant.
pub const GPT4O_MINI: &str = "gpt-4o-mini";

/// Deepseek's chat model.
pub const DEEPSEEK_CHAT: &str = "deepseek-chat";
