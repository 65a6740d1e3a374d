//! Per-session state threaded through the loop and the tool registry.

use tern_core::llm::{Message, Role};
use tern_sandbox::Sandbox;

use crate::todo::TodoList;

/// Where the orchestration loop currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for the model to answer the transcript.
    #[default]
    AwaitingModel,
    /// Running the tool calls of the last assistant message.
    ProcessingTools,
    /// The model finished. A warning is set when it stopped for a reason other than
    /// a normal completion.
    Done {
        /// Why the session stopped early, if it did.
        warning: Option<String>,
    },
    /// The completion boundary failed.
    Failed {
        /// Failure text, also appended to the transcript.
        error: String,
    },
}

impl SessionState {
    /// Whether the session has stopped.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed { .. })
    }
}

/// The mutable context of one session: workspace, transcript and todo list.
#[derive(Debug)]
pub struct Session {
    sandbox: Sandbox,
    todos: TodoList,
    messages: Vec<Message>,
    state: SessionState,
}

impl Session {
    /// Creates an empty session over the given sandbox.
    #[must_use]
    pub const fn new(sandbox: Sandbox) -> Self {
        Self {
            sandbox,
            todos: TodoList::new(),
            messages: Vec::new(),
            state: SessionState::AwaitingModel,
        }
    }

    /// The sandbox tool calls run in.
    #[must_use]
    pub const fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// The session todo list.
    #[must_use]
    pub const fn todos(&self) -> &TodoList {
        &self.todos
    }

    /// Mutable access to the todo list.
    pub const fn todos_mut(&mut self) -> &mut TodoList {
        &mut self.todos
    }

    /// The transcript.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current loop state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        tracing::debug!(?state, "session state");
        self.state = state;
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub(crate) fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    /// Text of the most recent assistant message.
    #[must_use]
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role() == Role::Assistant)
            .map(Message::content)
    }

    /// Clears the transcript and the todo list.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.todos.reset();
        self.state = SessionState::AwaitingModel;
    }
}

/// Result of driving a session until it stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Terminal state, `Done` or `Failed`.
    pub state: SessionState,
    /// Text of the last assistant message, or the failure text.
    pub final_text: String,
    /// Number of completion calls made.
    pub turns: usize,
    /// Number of tool calls dispatched.
    pub tool_calls: usize,
}

impl SessionOutcome {
    /// Whether the session ended in `Done`.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self.state, SessionState::Done { .. })
    }

    /// The warning recorded on a `Done` state.
    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        match &self.state {
            SessionState::Done { warning } => warning.as_deref(),
            _ => None,
        }
    }

    /// The failure text of a `Failed` state.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed { error } => Some(error),
            _ => None,
        }
    }
}
