//! Provider selection for the CLI.

use clap::ValueEnum;
use tern_openai::OpenAI;

/// OpenAI-compatible services with a known endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Provider {
    /// api.openai.com
    #[default]
    #[value(name = "openai")]
    OpenAI,
    /// api.deepseek.com
    #[value(name = "deepseek")]
    DeepSeek,
    /// openrouter.ai
    #[value(name = "openrouter")]
    OpenRouter,
}

impl Provider {
    /// Environment variables searched for an API key, most specific first.
    #[must_use]
    pub const fn env_vars(self) -> &'static [&'static str] {
        match self {
            Self::OpenAI => &["OPENAI_API_KEY", "TERN_API_KEY"],
            Self::DeepSeek => &["DEEPSEEK_API_KEY", "TERN_API_KEY"],
            Self::OpenRouter => &["OPENROUTER_API_KEY", "TERN_API_KEY"],
        }
    }

    /// Looks up the API key with `lookup`, skipping unset and blank values.
    pub fn api_key(self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.env_vars()
            .iter()
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty())
    }

    /// Creates a client preset for this provider.
    #[must_use]
    pub fn create(self, api_key: String) -> OpenAI {
        match self {
            Self::OpenAI => OpenAI::new(api_key),
            Self::DeepSeek => OpenAI::deepseek(api_key),
            Self::OpenRouter => OpenAI::openrouter(api_key),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAI => write!(f, "OpenAI"),
            Self::DeepSeek => write!(f, "DeepSeek"),
            Self::OpenRouter => write!(f, "OpenRouter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_openai::{DEEPSEEK_BASE_URL, DEEPSEEK_CHAT, OPENAI_BASE_URL, OPENROUTER_BASE_URL};

    #[test]
    fn create_uses_provider_endpoint() {
        let openai = Provider::OpenAI.create("k".into());
        assert_eq!(openai.config().base_url, OPENAI_BASE_URL);

        let deepseek = Provider::DeepSeek.create("k".into());
        assert_eq!(deepseek.config().base_url, DEEPSEEK_BASE_URL);
        assert_eq!(deepseek.config().model, DEEPSEEK_CHAT);

        let openrouter = Provider::OpenRouter.create("k".into());
        assert_eq!(openrouter.config().base_url, OPENROUTER_BASE_URL);
    }

    #[test]
    fn api_key_prefers_provider_variable() {
        let env = |name: &str| match name {
            "DEEPSEEK_API_KEY" => Some("ds".to_owned()),
            "TERN_API_KEY" => Some("generic".to_owned()),
            _ => None,
        };
        assert_eq!(Provider::DeepSeek.api_key(env).as_deref(), Some("ds"));
        assert_eq!(Provider::OpenRouter.api_key(env).as_deref(), Some("generic"));
    }

    #[test]
    fn api_key_skips_blank_values() {
        let env = |name: &str| match name {
            "OPENAI_API_KEY" => Some("  ".to_owned()),
            _ => None,
        };
        assert_eq!(Provider::OpenAI.api_key(env), None);
    }

    #[test]
    fn parses_from_command_line_names() {
        assert_eq!(Provider::from_str("deepseek", true).unwrap(), Provider::DeepSeek);
        assert_eq!(Provider::from_str("openrouter", true).unwrap(), Provider::OpenRouter);
        assert!(Provider::from_str("gemini", true).is_err());
    }
}
