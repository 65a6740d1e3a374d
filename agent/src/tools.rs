//! Tool catalogue and dispatch.
//!
//! Every tool is a typed argument record implementing [`ToolSpec`]. Incoming calls are
//! parsed into a [`ToolInvocation`] before anything runs, so unknown tools, malformed
//! JSON, missing fields and unexpected fields are rejected at the boundary.

use schemars::JsonSchema;
use serde::Deserialize;
use tern_core::llm::{ToolCall, ToolDefinition, ToolSpec};

use crate::{error::ToolError, session::Session, todo::TodoWriteArgs};

/// Execute a shell command in the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BashArgs {
    /// Shell command to run (e.g., "ls -la", "cargo test 2>&1 | tail -20").
    pub command: String,
}

impl ToolSpec for BashArgs {
    const NAME: &'static str = "bash";
    const DESCRIPTION: &'static str = "Run a shell command in the workspace root. Returns standard \
        output, or standard error when standard output is empty. Destructive commands are refused.";
}

/// Write a file in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct WriteArgs {
    /// File path relative to the workspace root.
    pub path: String,
    /// Full file content. Replaces any existing content.
    pub content: String,
}

impl ToolSpec for WriteArgs {
    const NAME: &'static str = "write";
    const DESCRIPTION: &'static str = "Create or overwrite a file relative to the workspace root. \
        Parent directories are created as needed.";
}

/// Read a file in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ReadArgs {
    /// File path relative to the workspace root.
    pub path: String,
    /// Maximum number of lines to return. Omit to read the whole file.
    #[serde(rename = "lineLimit", default)]
    pub line_limit: Option<usize>,
}

impl ToolSpec for ReadArgs {
    const NAME: &'static str = "read";
    const DESCRIPTION: &'static str = "Read a text file relative to the workspace root. With \
        lineLimit, only the first lines are returned and the number of omitted lines is reported.";
}

/// Replace text in a workspace file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EditArgs {
    /// File path relative to the workspace root.
    pub path: String,
    /// Exact text to replace. Must occur exactly once in the file.
    pub old_content: String,
    /// Replacement text.
    pub new_content: String,
}

impl ToolSpec for EditArgs {
    const NAME: &'static str = "edit";
    const DESCRIPTION: &'static str = "Replace an exact text fragment in a file. The fragment must \
        occur exactly once; include surrounding lines to make it unique.";
}

/// A validated tool call, one variant per tool.
#[derive(Debug, Clone)]
pub enum ToolInvocation {
    /// `bash`
    Bash(BashArgs),
    /// `write`
    Write(WriteArgs),
    /// `read`
    Read(ReadArgs),
    /// `edit`
    Edit(EditArgs),
    /// `todoWrite`
    TodoWrite(TodoWriteArgs),
}

impl ToolInvocation {
    /// Parses a tool name and its raw JSON arguments.
    ///
    /// # Errors
    ///
    /// - [`ToolError::UnknownTool`] if no tool has this name.
    /// - [`ToolError::InvalidArguments`] if the arguments are not valid JSON, miss a
    ///   required field, carry an unknown field, or have the wrong types.
    pub fn parse(name: &str, arguments: &str) -> Result<Self, ToolError> {
        match name {
            BashArgs::NAME => parse_arguments(arguments).map(Self::Bash),
            WriteArgs::NAME => parse_arguments(arguments).map(Self::Write),
            ReadArgs::NAME => parse_arguments(arguments).map(Self::Read),
            EditArgs::NAME => parse_arguments(arguments).map(Self::Edit),
            TodoWriteArgs::NAME => parse_arguments(arguments).map(Self::TodoWrite),
            _ => Err(ToolError::UnknownTool {
                name: name.to_owned(),
            }),
        }
    }

    /// Name of the tool.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bash(_) => BashArgs::NAME,
            Self::Write(_) => WriteArgs::NAME,
            Self::Read(_) => ReadArgs::NAME,
            Self::Edit(_) => EditArgs::NAME,
            Self::TodoWrite(_) => TodoWriteArgs::NAME,
        }
    }
}

fn parse_arguments<T: ToolSpec>(arguments: &str) -> Result<T, ToolError> {
    let raw = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };
    serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments {
        tool: T::NAME.to_owned(),
        reason: e.to_string(),
    })
}

/// The fixed catalogue advertised to the model, and the dispatcher behind it.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ToolRegistry {
    /// Creates the catalogue. `todoWrite` is included when `with_todo` is set.
    #[must_use]
    pub fn new(with_todo: bool) -> Self {
        let mut definitions = vec![
            BashArgs::definition(),
            WriteArgs::definition(),
            ReadArgs::definition(),
            EditArgs::definition(),
        ];
        if with_todo {
            definitions.push(TodoWriteArgs::definition());
        }
        Self { definitions }
    }

    /// Descriptors advertised on every completion request.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Whether a tool with this name is advertised.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name() == name)
    }

    /// Validates a call against the catalogue.
    ///
    /// # Errors
    ///
    /// See [`ToolInvocation::parse`]. Tools missing from this catalogue are unknown.
    pub fn parse(&self, call: &ToolCall) -> Result<ToolInvocation, ToolError> {
        if !self.contains(&call.name) {
            return Err(ToolError::UnknownTool {
                name: call.name.clone(),
            });
        }
        ToolInvocation::parse(&call.name, &call.arguments)
    }

    /// Validates and runs a call against the session.
    ///
    /// # Errors
    ///
    /// Returns the validation or execution failure. The caller decides how to present it.
    pub async fn dispatch(&self, session: &mut Session, call: &ToolCall) -> Result<String, ToolError> {
        let invocation = self.parse(call)?;
        execute(session, invocation).await
    }
}

/// Runs a validated invocation.
///
/// # Errors
///
/// Returns the sandbox or todo-list failure.
pub async fn execute(session: &mut Session, invocation: ToolInvocation) -> Result<String, ToolError> {
    let sandbox = session.sandbox();
    let output = match invocation {
        ToolInvocation::Bash(args) => sandbox.bash(&args.command).await?,
        ToolInvocation::Write(args) => sandbox.write(&args.path, &args.content).await?,
        ToolInvocation::Read(args) => sandbox.read(&args.path, args.line_limit).await?,
        ToolInvocation::Edit(args) => {
            sandbox
                .edit(&args.path, &args.old_content, &args.new_content)
                .await?
        }
        ToolInvocation::TodoWrite(args) => {
            let todos = session.todos_mut();
            todos.update(args.todos)?;
            todos.render()
        }
    };
    Ok(output)
}

/// Text of the tool response message for a dispatch result.
#[must_use]
pub fn result_text(result: &Result<String, ToolError>) -> String {
    match result {
        Ok(output) => output.clone(),
        Err(err) => err.to_message(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use tern_sandbox::{Sandbox, SandboxError};
    use tempfile::TempDir;

    use crate::todo::TodoError;

    fn session() -> (TempDir, Session) {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::new(dir.path()).unwrap();
        (dir, Session::new(sandbox))
    }

    #[test]
    fn catalogue() {
        let names: Vec<_> = ToolRegistry::default()
            .definitions()
            .iter()
            .map(|d| d.name().to_owned())
            .collect();
        assert_eq!(names, ["bash", "write", "read", "edit", "todoWrite"]);

        let without = ToolRegistry::new(false);
        assert_eq!(without.definitions().len(), 4);
        assert!(!without.contains("todoWrite"));
    }

    #[test]
    fn advertised_required_fields() {
        let registry = ToolRegistry::default();
        let required = |name: &str| -> BTreeSet<String> {
            registry
                .definitions()
                .iter()
                .find(|d| d.name() == name)
                .unwrap()
                .required_fields()
                .into_iter()
                .map(str::to_owned)
                .collect()
        };
        let set = |fields: &[&str]| fields.iter().map(|f| (*f).to_owned()).collect::<BTreeSet<_>>();

        assert_eq!(required("bash"), set(&["command"]));
        assert_eq!(required("write"), set(&["path", "content"]));
        assert_eq!(required("read"), set(&["path"]));
        assert_eq!(required("edit"), set(&["path", "old_content", "new_content"]));
        assert_eq!(required("todoWrite"), set(&["todos"]));
    }

    #[test]
    fn parse_typed_arguments() {
        let invocation = ToolInvocation::parse("read", r#"{"path":"a.txt","lineLimit":5}"#).unwrap();
        let ToolInvocation::Read(args) = invocation else {
            panic!("expected read");
        };
        assert_eq!(args.path, "a.txt");
        assert_eq!(args.line_limit, Some(5));
    }

    #[test]
    fn parse_rejects_bad_arguments() {
        let missing = ToolInvocation::parse("bash", "{}").unwrap_err();
        assert!(matches!(missing, ToolError::InvalidArguments { ref tool, ref reason }
            if tool == "bash" && reason.contains("command")));

        let extra = ToolInvocation::parse("bash", r#"{"command":"ls","cwd":"/"}"#).unwrap_err();
        assert!(matches!(extra, ToolError::InvalidArguments { .. }));

        let broken = ToolInvocation::parse("write", "{path:").unwrap_err();
        assert!(matches!(broken, ToolError::InvalidArguments { .. }));

        let unknown = ToolInvocation::parse("deploy", "{}").unwrap_err();
        assert!(matches!(unknown, ToolError::UnknownTool { ref name } if name == "deploy"));
    }

    #[tokio::test]
    async fn dispatch_routes_to_sandbox() {
        let (_dir, mut session) = session();
        let registry = ToolRegistry::default();

        let write = ToolCall::new("1", "write", r#"{"path":"src/lib.rs","content":"pub fn f() {}"}"#);
        registry.dispatch(&mut session, &write).await.unwrap();

        let edit = ToolCall::new(
            "2",
            "edit",
            r#"{"path":"src/lib.rs","old_content":"f()","new_content":"g()"}"#,
        );
        registry.dispatch(&mut session, &edit).await.unwrap();

        let read = ToolCall::new("3", "read", r#"{"path":"src/lib.rs"}"#);
        assert_eq!(registry.dispatch(&mut session, &read).await.unwrap(), "pub fn g() {}");
    }

    #[tokio::test]
    async fn dispatch_surfaces_typed_errors() {
        let (_dir, mut session) = session();
        let registry = ToolRegistry::default();

        let escape = ToolCall::new("1", "read", r#"{"path":"../secret"}"#);
        let result = registry.dispatch(&mut session, &escape).await;
        assert!(matches!(result, Err(ToolError::Sandbox(SandboxError::UnsafePath { .. }))));
        assert!(result_text(&result).starts_with("Error: unsafe path"));

        let danger = ToolCall::new("2", "bash", r#"{"command":"rm -rf /"}"#);
        let result = registry.dispatch(&mut session, &danger).await;
        assert!(result_text(&result).contains("dangerous command"));
    }

    #[tokio::test]
    async fn dispatch_todo_write() {
        let (_dir, mut session) = session();
        let registry = ToolRegistry::default();

        let call = ToolCall::new(
            "1",
            "todoWrite",
            r#"{"todos":[{"content":"Add tests","status":"in_progress","activeForm":"Adding tests"}]}"#,
        );
        let rendered = registry.dispatch(&mut session, &call).await.unwrap();
        assert_eq!(rendered, "[>] Add tests Adding tests\n\nTotal: 1, In Progress: 1, Completed: 0");

        let two_active = ToolCall::new(
            "2",
            "todoWrite",
            r#"{"todos":[
                {"content":"a","status":"in_progress","activeForm":"doing a"},
                {"content":"b","status":"in_progress","activeForm":"doing b"}
            ]}"#,
        );
        let result = registry.dispatch(&mut session, &two_active).await;
        assert!(matches!(
            result,
            Err(ToolError::InvalidTaskList(TodoError::MultipleInProgress { count: 2 }))
        ));
        assert_eq!(session.todos().len(), 1);
    }

    #[tokio::test]
    async fn disabled_todo_is_unknown() {
        let (_dir, mut session) = session();
        let registry = ToolRegistry::new(false);
        let call = ToolCall::new("1", "todoWrite", r#"{"todos":[]}"#);
        let result = registry.dispatch(&mut session, &call).await;
        assert!(matches!(result, Err(ToolError::UnknownTool { .. })));
    }
}
