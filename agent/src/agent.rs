//! Core agent implementation.
//!
//! The `Agent` drives one session through a strict request/respond/act cycle:
//!
//! ```text
//! AwaitingModel --tool_calls--> ProcessingTools --all answered--> AwaitingModel
//!       |
//!       +--stop / length / content_filter / unknown--> Done
//!       +--completion error--> Failed
//! ```
//!
//! Only the model's finish signal ends a session. Tool calls of one turn run one at a
//! time in the order the model issued them, and each is answered by exactly one tool
//! message before the transcript is sent again.

use std::time::Instant;

use tern_core::{
    LanguageModel,
    llm::{Completion, CompletionRequest, FinishReason, Message, ToolCall},
};
use tern_sandbox::Sandbox;

use crate::{
    builder::AgentBuilder,
    config::AgentConfig,
    error::{AgentError, ToolError},
    hook::{Hook, PostToolAction, PreToolAction, StopContext, ToolResultContext, ToolUseContext},
    session::{Session, SessionOutcome, SessionState},
    todo::TodoList,
    tools::{ToolRegistry, result_text},
    transcript::TranscriptLog,
};

const DEFAULT_SYSTEM_PROMPT: &str = include_str!("prompts/system.txt");

/// A tool-calling agent confined to one workspace.
///
/// # Type Parameters
///
/// - `LLM`: The completion boundary
/// - `H`: Composed hooks for customizing behavior (defaults to `()`)
///
/// # Example
///
/// ```rust,ignore
/// let mut agent = Agent::builder(model).workspace("./ws").build()?;
/// let answer = agent.query("Add a README with build instructions").await?;
/// ```
pub struct Agent<LLM, H = ()> {
    llm: LLM,
    hooks: H,
    registry: ToolRegistry,
    config: AgentConfig,
    session: Session,
    log: Option<TranscriptLog>,
}

impl<LLM, H> std::fmt::Debug for Agent<LLM, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<LLM: LanguageModel> Agent<LLM, ()> {
    /// Creates an agent over an existing sandbox with default configuration.
    pub fn new(llm: LLM, sandbox: Sandbox) -> Self {
        Self::from_parts(llm, (), sandbox, AgentConfig::default())
    }

    /// Creates a builder for configuring an agent.
    pub fn builder(llm: LLM) -> AgentBuilder<LLM, ()> {
        AgentBuilder::new(llm)
    }
}

impl<LLM, H> Agent<LLM, H>
where
    LLM: LanguageModel,
    H: Hook,
{
    pub(crate) fn from_parts(llm: LLM, hooks: H, sandbox: Sandbox, config: AgentConfig) -> Self {
        let registry = ToolRegistry::new(config.enable_todo);
        let log = config.transcript_path.clone().map(TranscriptLog::new);
        Self {
            llm,
            hooks,
            registry,
            config,
            session: Session::new(sandbox),
            log,
        }
    }

    /// Runs `task` as a fresh session.
    ///
    /// The transcript and todo list are cleared, the transcript is seeded with the
    /// system prompt and the task, and the loop runs until `Done` or `Failed`.
    pub async fn run(&mut self, task: &str) -> SessionOutcome {
        self.reset();
        self.send(task).await
    }

    /// Single-shot query returning the final assistant text.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Completion`] with the failure text when the session fails.
    pub async fn query(&mut self, task: &str) -> Result<String, AgentError> {
        let outcome = self.run(task).await;
        match outcome.state {
            SessionState::Failed { error } => Err(AgentError::Completion(error)),
            _ => Ok(outcome.final_text),
        }
    }

    /// Appends a user turn to the ongoing transcript and runs the loop.
    ///
    /// The system prompt is seeded on first use. A failed turn is reported in the
    /// outcome; the transcript is kept so the conversation can go on.
    pub async fn send(&mut self, message: &str) -> SessionOutcome {
        if self.session.messages().is_empty() {
            let prompt = self.system_prompt();
            self.session.push(Message::system(prompt));
        }
        self.session.push(Message::user(message));
        if let Some(log) = &self.log {
            log.write_user_message(message).await;
        }
        self.drive().await
    }

    /// Clears the transcript and the todo list.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// The transcript of the current session.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        self.session.messages()
    }

    /// The session todo list.
    #[must_use]
    pub const fn todos(&self) -> &TodoList {
        self.session.todos()
    }

    /// Current loop state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        self.session.state()
    }

    /// The sandbox tool calls run in.
    #[must_use]
    pub const fn sandbox(&self) -> &Sandbox {
        self.session.sandbox()
    }

    /// The tool catalogue.
    #[must_use]
    pub const fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// The agent configuration.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn system_prompt(&self) -> String {
        let instructions = self
            .config
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
            .trim_end();
        format!(
            "{instructions}\n\nWorkspace root: {}",
            self.session.sandbox().workspace().root().display()
        )
    }

    async fn drive(&mut self) -> SessionOutcome {
        let mut turns = 0;
        let mut tool_calls = 0;
        self.session.set_state(SessionState::AwaitingModel);

        while !self.session.state().is_terminal() {
            if let Some(limit) = self.config.max_turns
                && turns >= limit
            {
                tracing::warn!(limit, "turn limit reached");
                self.session.set_state(SessionState::Done {
                    warning: Some(format!("stopped after reaching the turn limit ({limit})")),
                });
                break;
            }
            turns += 1;

            let request = CompletionRequest::new(self.session.messages().to_vec())
                .with_tools(self.registry.definitions().to_vec())
                .with_tool_choice(self.config.tool_choice);

            tracing::debug!(turn = turns, messages = request.messages.len(), "requesting completion");
            let completion = match self.llm.respond(request).await {
                Ok(completion) => completion,
                Err(e) => {
                    let error = e.to_string();
                    tracing::warn!(turn = turns, %error, "completion failed");
                    self.session.push(Message::assistant(format!("Error: {error}")));
                    if let Some(log) = &self.log {
                        log.write_failure(&error).await;
                    }
                    self.session.set_state(SessionState::Failed { error });
                    break;
                }
            };

            tracing::debug!(
                turn = turns,
                finish_reason = %completion.finish_reason,
                tool_calls = completion.tool_calls.len(),
                "completion received"
            );

            match completion.finish_reason {
                FinishReason::ToolCalls if !completion.tool_calls.is_empty() => {
                    let calls = completion.tool_calls.clone();
                    self.record_assistant(completion).await;
                    self.session.set_state(SessionState::ProcessingTools);

                    let results = self.process_tools(&calls, turns).await;
                    tool_calls += calls.len();
                    self.session.extend(results);
                    self.session.set_state(SessionState::AwaitingModel);
                }
                FinishReason::ToolCalls => {
                    self.record_assistant(completion).await;
                    self.finish(Some("model signalled tool calls but requested none".into()));
                }
                FinishReason::Stop => {
                    self.record_assistant(strip_tool_calls(completion)).await;
                    self.finish(None);
                }
                FinishReason::Length => {
                    self.record_assistant(strip_tool_calls(completion)).await;
                    self.finish(Some("response was truncated by the length limit".into()));
                }
                FinishReason::ContentFilter => {
                    self.record_assistant(strip_tool_calls(completion)).await;
                    self.finish(Some("response was withheld by the content filter".into()));
                }
                FinishReason::Other(ref raw) => {
                    let warning = format!("unrecognized finish signal `{raw}`");
                    self.record_assistant(strip_tool_calls(completion)).await;
                    self.finish(Some(warning));
                }
            }
        }

        let state = self.session.state().clone();
        let final_text = match &state {
            SessionState::Failed { error } => error.clone(),
            _ => self
                .session
                .last_assistant_text()
                .unwrap_or_default()
                .to_owned(),
        };

        tracing::info!(turns, tool_calls, ?state, "session stopped");
        self.hooks
            .on_stop(&StopContext {
                final_text: &final_text,
                turns,
                state: &state,
            })
            .await;

        SessionOutcome {
            state,
            final_text,
            turns,
            tool_calls,
        }
    }

    fn finish(&mut self, warning: Option<String>) {
        if let Some(warning) = &warning {
            tracing::warn!(%warning, "session finished early");
        }
        self.session.set_state(SessionState::Done { warning });
    }

    async fn record_assistant(&mut self, completion: Completion) {
        if let Some(log) = &self.log {
            log.write_assistant_text(&completion.content).await;
        }
        self.session.push(completion.into_message());
    }

    // Runs the calls in order and returns their tool messages for a single append.
    async fn process_tools(&mut self, calls: &[ToolCall], turn: usize) -> Vec<Message> {
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            if let Some(log) = &self.log {
                log.write_tool_call(&call.name, &call.arguments).await;
            }

            let use_ctx = ToolUseContext {
                tool_name: &call.name,
                call_id: &call.id,
                arguments: &call.arguments,
                turn,
                message_count: self.session.messages().len(),
            };

            let started = Instant::now();
            let result = match self.hooks.pre_tool_use(&use_ctx).await {
                PreToolAction::Allow => self.registry.dispatch(&mut self.session, call).await,
                PreToolAction::Deny(reason) => Err(ToolError::Denied(reason)),
            };
            let duration = started.elapsed();

            let is_error = result.is_err();
            let mut output = result_text(&result);
            match &result {
                Ok(_) => tracing::info!(
                    tool = %call.name,
                    id = %call.id,
                    elapsed_ms = duration.as_millis(),
                    "tool call succeeded"
                ),
                Err(err) => tracing::info!(
                    tool = %call.name,
                    id = %call.id,
                    elapsed_ms = duration.as_millis(),
                    error = %err,
                    "tool call failed"
                ),
            }

            let result_ctx = ToolResultContext {
                tool_name: &call.name,
                call_id: &call.id,
                arguments: &call.arguments,
                output: &output,
                is_error,
                duration,
            };
            if let PostToolAction::Replace(replacement) = self.hooks.post_tool_use(&result_ctx).await {
                output = replacement;
            }

            if let Some(log) = &self.log {
                log.write_tool_result(&call.name, &output, is_error).await;
            }
            results.push(Message::tool(&call.id, output));
        }

        results
    }
}

fn strip_tool_calls(mut completion: Completion) -> Completion {
    if !completion.tool_calls.is_empty() {
        tracing::warn!(
            finish_reason = %completion.finish_reason,
            dropped = completion.tool_calls.len(),
            "dropping tool calls sent without a tool_calls finish signal"
        );
        completion.tool_calls.clear();
    }
    completion
}
