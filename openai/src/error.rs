use std::fmt;

/// Errors that can arise when calling an OpenAI-compatible API.
#[derive(Debug)]
pub enum OpenAIError {
    /// Transport errors (connect, timeout, body read).
    Http(reqwest::Error),
    /// The server answered with a non-success status.
    Status {
        /// HTTP status code.
        code: u16,
        /// Response body, usually a JSON error object.
        body: String,
    },
    /// JSON serialization/deserialization errors.
    Json(serde_json::Error),
    /// API contract violations, such as a response without choices.
    Api(String),
}

impl fmt::Display for OpenAIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "HTTP error: {err}"),
            Self::Status { code, body } => {
                write!(f, "API returned status {code}")?;
                if !body.is_empty() {
                    write!(f, ": {body}")?;
                }
                Ok(())
            }
            Self::Json(err) => write!(f, "JSON error: {err}"),
            Self::Api(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for OpenAIError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Status { .. } | Self::Api(_) => None,
        }
    }
}

impl From<reqwest::Error> for OpenAIError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<serde_json::Error> for OpenAIError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_includes_body() {
        let err = OpenAIError::Status {
            code: 401,
            body: "{\"error\":\"bad key\"}".into(),
        };
        assert_eq!(err.to_string(), "API returned status 401: {\"error\":\"bad key\"}");

        let bare = OpenAIError::Status {
            code: 502,
            body: String::new(),
        };
        assert_eq!(bare.to_string(), "API returned status 502");
    }
}
