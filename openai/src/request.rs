use serde::Serialize;
use serde_json::Value;
use tern_core::llm::{CompletionRequest, Message, ToolCall, ToolDefinition};

/// Body of `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessagePayload>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

impl ChatCompletionRequest {
    pub(crate) fn new(model: String, temperature: Option<f32>, request: &CompletionRequest) -> Self {
        let tools = convert_tools(&request.tools);
        // Endpoints reject `tool_choice` when no tools are sent.
        let tool_choice = (!tools.is_empty()).then(|| request.tool_choice.as_str());
        Self {
            model,
            messages: to_chat_messages(&request.messages),
            stream: false,
            temperature,
            tools,
            tool_choice,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatMessagePayload {
    role: &'static str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ChatToolCallPayload>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatToolCallPayload {
    id: String,
    #[serde(rename = "type")]
    kind: &'static str,
    function: ChatToolFunctionPayload,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatToolFunctionPayload {
    name: String,
    arguments: String,
}

impl From<&ToolCall> for ChatToolCallPayload {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: "function",
            function: ChatToolFunctionPayload {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ToolPayload {
    r#type: &'static str,
    function: ToolFunction,
}

#[derive(Debug, Serialize, Clone)]
struct ToolFunction {
    name: String,
    description: String,
    parameters: Value,
}

pub fn to_chat_messages(messages: &[Message]) -> Vec<ChatMessagePayload> {
    messages
        .iter()
        .map(|message| {
            let tool_calls = message.tool_calls();
            ChatMessagePayload {
                role: message.role().as_str(),
                content: message.content().to_owned(),
                tool_calls: (!tool_calls.is_empty())
                    .then(|| tool_calls.iter().map(ChatToolCallPayload::from).collect()),
                tool_call_id: message.tool_call_id().map(str::to_owned),
            }
        })
        .collect()
}

pub fn convert_tools(definitions: &[ToolDefinition]) -> Vec<ToolPayload> {
    definitions
        .iter()
        .map(|tool| ToolPayload {
            r#type: "function",
            function: ToolFunction {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                parameters: tool.parameters_json(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;
    use tern_core::llm::{ToolChoice, ToolSpec};

    /// Runs a shell command.
    #[derive(JsonSchema, Deserialize)]
    #[allow(dead_code)]
    struct Shell {
        /// Command line.
        command: String,
    }

    impl ToolSpec for Shell {
        const NAME: &'static str = "bash";
        const DESCRIPTION: &'static str = "Runs a shell command";
    }

    fn conversation() -> Vec<Message> {
        vec![
            Message::system("be brief"),
            Message::user("list files"),
            Message::assistant_with_tool_calls(
                "",
                vec![ToolCall::new("call_1", "bash", r#"{"command":"ls"}"#)],
            ),
            Message::tool("call_1", "a.txt"),
        ]
    }

    #[test]
    fn messages_carry_tool_call_fields() {
        let value = serde_json::to_value(to_chat_messages(&conversation())).unwrap();
        assert_eq!(
            value,
            json!([
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "list files"},
                {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "bash", "arguments": "{\"command\":\"ls\"}"}
                    }]
                },
                {"role": "tool", "content": "a.txt", "tool_call_id": "call_1"}
            ])
        );
    }

    #[test]
    fn request_advertises_tools_and_choice() {
        let request = CompletionRequest::new(conversation())
            .with_tools(vec![Shell::definition()])
            .with_tool_choice(ToolChoice::Required);
        let body = serde_json::to_value(ChatCompletionRequest::new(
            "gpt-4.1".into(),
            Some(0.2),
            &request,
        ))
        .unwrap();

        assert_eq!(body["model"], "gpt-4.1");
        assert_eq!(body["stream"], false);
        assert_eq!(body["tool_choice"], "required");
        let tool = &body["tools"][0];
        assert_eq!(tool["type"], "function");
        assert_eq!(tool["function"]["name"], "bash");
        assert_eq!(tool["function"]["description"], "Runs a shell command");
        assert_eq!(tool["function"]["parameters"]["type"], "object");
        assert!(tool["function"]["parameters"].get("$schema").is_none());
    }

    #[test]
    fn tool_choice_is_omitted_without_tools() {
        let request = CompletionRequest::oneshot("sys", "hi");
        let body =
            serde_json::to_value(ChatCompletionRequest::new("m".into(), None, &request)).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
        assert!(body.get("temperature").is_none());
    }
}
