use serde::Deserialize;
use serde_json::Value;
use tern_core::llm::{Completion, FinishReason, ToolCall};

use crate::error::OpenAIError;

/// Body of a non-streaming chat completion.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    /// Converts the first choice into a [`Completion`].
    pub(crate) fn into_completion(self) -> Result<Completion, OpenAIError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAIError::Api("response contained no choices".into()))?;

        let tool_calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .into_iter()
            .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments.into_text()))
            .collect();

        // Some compatible servers omit the finish reason; infer it from the payload.
        let finish_reason = match choice.finish_reason.as_deref() {
            Some(raw) => FinishReason::parse(raw),
            None if tool_calls.is_empty() => FinishReason::Stop,
            None => FinishReason::ToolCalls,
        };

        Ok(Completion::new(
            finish_reason,
            choice.message.content.unwrap_or_default(),
            tool_calls,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ResponseToolCall>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    id: String,
    function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
struct ResponseFunction {
    name: String,
    #[serde(default)]
    arguments: Arguments,
}

/// Argument payload: a JSON string per the API, an object on some compatible servers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Arguments {
    Text(String),
    Structured(Value),
}

impl Default for Arguments {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Arguments {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Structured(value) => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<Completion, OpenAIError> {
        serde_json::from_value::<ChatCompletionResponse>(value)
            .unwrap()
            .into_completion()
    }

    #[test]
    fn text_completion() {
        let completion = parse(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Done."},
                "finish_reason": "stop"
            }]
        }))
        .unwrap();
        assert_eq!(completion.finish_reason, FinishReason::Stop);
        assert_eq!(completion.content, "Done.");
        assert!(completion.tool_calls.is_empty());
    }

    #[test]
    fn tool_call_completion() {
        let completion = parse(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {"id": "call_a", "type": "function",
                         "function": {"name": "bash", "arguments": "{\"command\":\"ls\"}"}},
                        {"id": "call_b", "type": "function",
                         "function": {"name": "read", "arguments": {"path": "a.txt"}}}
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        }))
        .unwrap();
        assert_eq!(completion.finish_reason, FinishReason::ToolCalls);
        assert_eq!(completion.content, "");
        assert_eq!(
            completion.tool_calls,
            vec![
                ToolCall::new("call_a", "bash", r#"{"command":"ls"}"#),
                ToolCall::new("call_b", "read", r#"{"path":"a.txt"}"#),
            ]
        );
    }

    #[test]
    fn finish_reasons_map_through() {
        let with_reason = |reason: &str| {
            parse(json!({
                "choices": [{"message": {"content": "x"}, "finish_reason": reason}]
            }))
            .unwrap()
            .finish_reason
        };
        assert_eq!(with_reason("length"), FinishReason::Length);
        assert_eq!(with_reason("content_filter"), FinishReason::ContentFilter);
        assert_eq!(with_reason("eos"), FinishReason::Other("eos".into()));
    }

    #[test]
    fn missing_finish_reason_is_inferred() {
        let completion = parse(json!({
            "choices": [{"message": {"tool_calls": [
                {"id": "c", "function": {"name": "bash", "arguments": "{}"}}
            ]}}]
        }))
        .unwrap();
        assert_eq!(completion.finish_reason, FinishReason::ToolCalls);
    }

    #[test]
    fn empty_choices_is_an_api_error() {
        let err = parse(json!({"choices": []})).unwrap_err();
        assert!(matches!(err, OpenAIError::Api(_)));
    }
}
