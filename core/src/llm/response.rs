//! The answer side of the completion boundary.

use serde::{Deserialize, Serialize};

use super::{message::Message, tool::ToolCall};

/// Why the model stopped producing output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model requested one or more tool invocations.
    ToolCalls,
    /// The model finished its answer.
    Stop,
    /// Output was cut off by the token limit.
    Length,
    /// Output was withheld by a content policy.
    ContentFilter,
    /// Any signal this crate does not recognise, kept verbatim.
    Other(String),
}

impl FinishReason {
    /// Maps a provider's finish string to a reason.
    ///
    /// The legacy `function_call` signal is treated as [`FinishReason::ToolCalls`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "tool_calls" | "function_call" => Self::ToolCalls,
            "stop" => Self::Stop,
            "length" => Self::Length,
            "content_filter" => Self::ContentFilter,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl core::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ToolCalls => f.write_str("tool_calls"),
            Self::Stop => f.write_str("stop"),
            Self::Length => f.write_str("length"),
            Self::ContentFilter => f.write_str("content_filter"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// A complete, non-streamed answer from the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Finish signal.
    pub finish_reason: FinishReason,
    /// Assistant text. May be empty when only tools were requested.
    pub content: String,
    /// Tool invocations requested by the model, in issue order.
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl Completion {
    /// Creates a completion with the given parts.
    pub fn new(
        finish_reason: FinishReason,
        content: impl Into<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Self {
        Self {
            finish_reason,
            content: content.into(),
            tool_calls,
        }
    }

    /// Creates a text-only completion.
    pub fn text(finish_reason: FinishReason, content: impl Into<String>) -> Self {
        Self::new(finish_reason, content, Vec::new())
    }

    /// Creates a completion requesting the given tool calls.
    #[must_use]
    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self::new(FinishReason::ToolCalls, String::new(), tool_calls)
    }

    /// Converts the completion into the assistant message appended to the transcript.
    #[must_use]
    pub fn into_message(self) -> Message {
        Message::assistant_with_tool_calls(self.content, self.tool_calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_reasons() {
        assert_eq!(FinishReason::parse("tool_calls"), FinishReason::ToolCalls);
        assert_eq!(FinishReason::parse("function_call"), FinishReason::ToolCalls);
        assert_eq!(FinishReason::parse("stop"), FinishReason::Stop);
        assert_eq!(FinishReason::parse("length"), FinishReason::Length);
        assert_eq!(FinishReason::parse("content_filter"), FinishReason::ContentFilter);
    }

    #[test]
    fn unknown_reason_is_preserved() {
        let reason = FinishReason::parse("eos_token");
        assert_eq!(reason, FinishReason::Other("eos_token".into()));
        assert_eq!(reason.to_string(), "eos_token");
    }

    #[test]
    fn into_message_keeps_calls() {
        let completion = Completion::tool_calls(vec![ToolCall::new("a", "read", "{}")]);
        let message = completion.into_message();
        assert_eq!(message.content(), "");
        assert_eq!(message.tool_calls()[0].id, "a");
    }
}
