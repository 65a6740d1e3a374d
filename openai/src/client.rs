use std::{fmt, sync::Arc, time::Duration};

use tern_core::{
    LanguageModel,
    llm::{Completion, CompletionRequest},
};

use crate::{
    DEEPSEEK_BASE_URL, DEFAULT_BASE_URL, DEFAULT_MODEL, OPENROUTER_BASE_URL,
    error::OpenAIError, request::ChatCompletionRequest, response::ChatCompletionResponse,
};

/// Default request timeout. Generous, since a single completion can take minutes.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAIConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// REST base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Chat model identifier.
    pub model: String,
    /// Timeout for the whole request, including reading the body.
    pub timeout: Duration,
    /// Sampling temperature. `None` leaves the server default.
    pub temperature: Option<f32>,
}

impl OpenAIConfig {
    /// Creates a configuration for the `OpenAI` API with the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            temperature: None,
        }
    }

    pub(crate) fn request_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// Chat-completions client for `OpenAI` and compatible servers.
///
/// Every call is a single non-streaming request. Failures are returned as
/// [`OpenAIError`] without retrying.
#[derive(Clone, Debug)]
pub struct OpenAI {
    inner: Arc<OpenAIConfig>,
    http: reqwest::Client,
}

impl OpenAI {
    /// Create a new client using the provided API key and default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(OpenAIConfig::new(api_key))
    }

    /// Create a client from a full configuration.
    #[must_use]
    pub fn from_config(config: OpenAIConfig) -> Self {
        Self {
            inner: Arc::new(config),
            http: reqwest::Client::new(),
        }
    }

    /// Create a client configured for [`Deepseek`](https://api-docs.deepseek.com)'s OpenAI-compatible endpoint.
    pub fn deepseek(api_key: impl Into<String>) -> Self {
        Self::new(api_key)
            .with_base_url(DEEPSEEK_BASE_URL)
            .with_model(crate::DEEPSEEK_CHAT)
    }

    /// Create a client configured for [`OpenRouter`](https://openrouter.ai)'s OpenAI-compatible endpoint.
    pub fn openrouter(api_key: impl Into<String>) -> Self {
        Self::new(api_key).with_base_url(OPENROUTER_BASE_URL)
    }

    /// Override the chat model in-place.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.inner).model = model.into().trim().to_owned();
        self
    }

    /// Override the REST base URL (useful for OpenAI-compatible endpoints).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.inner).base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        Arc::make_mut(&mut self.inner).timeout = timeout;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        Arc::make_mut(&mut self.inner).temperature = Some(temperature);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &OpenAIConfig {
        &self.inner
    }

    async fn chat_completion(&self, request: CompletionRequest) -> Result<Completion, OpenAIError> {
        let cfg = &*self.inner;
        let body = ChatCompletionRequest::new(cfg.model.clone(), cfg.temperature, &request);
        let url = cfg.request_url("chat/completions");

        tracing::debug!(
            model = %cfg.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "sending chat completion"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&cfg.api_key)
            .timeout(cfg.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %url, "chat completion rejected");
            return Err(OpenAIError::Status {
                code: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)?;
        let completion = parsed.into_completion()?;
        tracing::debug!(
            finish_reason = %completion.finish_reason,
            tool_calls = completion.tool_calls.len(),
            "chat completion received"
        );
        Ok(completion)
    }
}

impl LanguageModel for OpenAI {
    type Error = OpenAIError;

    fn respond(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send {
        self.chat_completion(request)
    }
}
