//! Message types for model conversations.
//!
//! A transcript is an ordered sequence of [`Message`]s. Each variant carries the fields
//! its role allows: only assistant messages request tool invocations, and only tool
//! messages point back at the invocation they answer.

use serde::{Deserialize, Serialize};

use super::tool::ToolCall;

/// Conversation participant role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Input from the human user.
    User,
    /// Responses produced by the model.
    Assistant,
    /// Instructions and context for the model.
    System,
    /// Output of a tool invocation.
    Tool,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Tool => "tool",
        }
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// User turn.
    User {
        /// Text content of the message.
        content: String,
    },
    /// Assistant turn, optionally requesting tool invocations.
    Assistant {
        /// Text content of the message. Empty when the model only requested tools.
        content: String,
        /// Tool invocations requested by the model.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    /// Instructions/context.
    System {
        /// Text content of the message.
        content: String,
    },
    /// Result of a tool invocation.
    Tool {
        /// Textual tool output or error message.
        content: String,
        /// ID of the invocation this message answers.
        tool_call_id: String,
    },
}

impl Message {
    /// Returns the message sender role.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::System { .. } => Role::System,
            Self::Tool { .. } => Role::Tool,
        }
    }

    /// Returns the text content of the message.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::User { content }
            | Self::Assistant { content, .. }
            | Self::System { content }
            | Self::Tool { content, .. } => content,
        }
    }

    /// Returns tool calls made by the assistant (only for Assistant messages).
    #[must_use]
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    /// Returns the tool call ID (only for Tool messages).
    #[must_use]
    pub fn tool_call_id(&self) -> Option<&str> {
        match self {
            Self::Tool { tool_call_id, .. } => Some(tool_call_id),
            _ => None,
        }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Creates a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Creates an assistant message with tool calls.
    pub fn assistant_with_tool_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Creates a new tool result message.
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_creation() {
        let user = Message::user("Hello");
        assert_eq!(user.role(), Role::User);
        assert_eq!(user.content(), "Hello");

        let system = Message::system("Be helpful");
        assert_eq!(system.role(), Role::System);

        let tool = Message::tool("call_123", "Success");
        assert_eq!(tool.role(), Role::Tool);
        assert_eq!(tool.content(), "Success");
        assert_eq!(tool.tool_call_id(), Some("call_123"));
        assert!(tool.tool_calls().is_empty());
    }

    #[test]
    fn assistant_with_tool_calls() {
        let calls = vec![ToolCall::new("call_1", "bash", r#"{"command":"ls"}"#)];
        let msg = Message::assistant_with_tool_calls("", calls);
        assert_eq!(msg.tool_calls().len(), 1);
        assert_eq!(msg.tool_calls()[0].name, "bash");
        assert_eq!(msg.tool_call_id(), None);
    }

    #[test]
    fn serializes_with_role_tag() {
        let value = serde_json::to_value(Message::tool("call_9", "done")).unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["tool_call_id"], "call_9");

        let plain = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert!(plain.get("tool_calls").is_none());
    }
}
