//! Hook system for intercepting agent operations.
//!
//! Hooks observe or steer the loop at fixed points:
//! - Before a tool call runs (allow or deny it)
//! - After a tool call ran (keep or replace its result text)
//! - When the session stops
//!
//! A denied call is answered with an error result like any other failed tool call;
//! hooks cannot abort a session.
//!
//! # Example
//!
//! ```rust,ignore
//! struct NoNetwork;
//!
//! impl Hook for NoNetwork {
//!     async fn pre_tool_use(&self, ctx: &ToolUseContext<'_>) -> PreToolAction {
//!         if ctx.tool_name == "bash" && ctx.arguments.contains("curl") {
//!             return PreToolAction::Deny("network access is disabled".into());
//!         }
//!         PreToolAction::Allow
//!     }
//! }
//!
//! let agent = Agent::builder(llm)
//!     .workspace("./ws")
//!     .hook(NoNetwork)
//!     .build()?;
//! ```

use std::time::Duration;

use crate::session::SessionState;

/// Context provided to hooks before a tool is called.
#[derive(Debug)]
pub struct ToolUseContext<'a> {
    /// Name of the tool being called.
    pub tool_name: &'a str,
    /// Identifier of the call.
    pub call_id: &'a str,
    /// Raw JSON arguments.
    pub arguments: &'a str,
    /// Current turn number (1-indexed).
    pub turn: usize,
    /// Number of messages in the transcript.
    pub message_count: usize,
}

/// Context provided to hooks after a tool is executed.
#[derive(Debug)]
pub struct ToolResultContext<'a> {
    /// Name of the tool that was called.
    pub tool_name: &'a str,
    /// Identifier of the call.
    pub call_id: &'a str,
    /// Raw JSON arguments that were passed.
    pub arguments: &'a str,
    /// Text that will be sent back to the model.
    pub output: &'a str,
    /// Whether the call failed.
    pub is_error: bool,
    /// Time taken to execute the tool.
    pub duration: Duration,
}

/// Context provided to hooks when the session stops.
#[derive(Debug)]
pub struct StopContext<'a> {
    /// The final assistant text.
    pub final_text: &'a str,
    /// Total number of turns taken.
    pub turns: usize,
    /// Terminal state.
    pub state: &'a SessionState,
}

/// Action to take before a tool is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreToolAction {
    /// Allow the tool to execute.
    Allow,
    /// Deny the tool execution. The reason is sent to the model as an error.
    Deny(String),
}

/// Action to take after a tool is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostToolAction {
    /// Keep the original tool result.
    Keep,
    /// Replace the tool result text.
    Replace(String),
}

/// Trait for intercepting agent operations.
///
/// All methods have default no-op implementations.
/// Implement only the methods you need.
///
/// Hooks are composed using the [`HCons`] type, allowing multiple hooks to be
/// chained together at compile time with zero runtime overhead.
pub trait Hook: Send + Sync {
    /// Called before a tool is executed.
    fn pre_tool_use(
        &self,
        _ctx: &ToolUseContext<'_>,
    ) -> impl std::future::Future<Output = PreToolAction> + Send {
        async { PreToolAction::Allow }
    }

    /// Called after a tool is executed.
    fn post_tool_use(
        &self,
        _ctx: &ToolResultContext<'_>,
    ) -> impl std::future::Future<Output = PostToolAction> + Send {
        async { PostToolAction::Keep }
    }

    /// Called once the session reached `Done` or `Failed`.
    fn on_stop(&self, _ctx: &StopContext<'_>) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }
}

/// No-op implementation for unit type (base case for HCons).
impl Hook for () {}

/// Heterogeneous list cons cell for composing hooks at compile time.
///
/// ```rust,ignore
/// let agent = Agent::builder(llm)
///     .hook(LoggingHook)
///     .hook(ConfirmationHook)
///     .build()?;
/// // Agent<LLM, HCons<ConfirmationHook, HCons<LoggingHook, ()>>>
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HCons<Head, Tail> {
    /// The first hook in the chain.
    pub head: Head,
    /// The remaining hooks.
    pub tail: Tail,
}

impl<Head, Tail> HCons<Head, Tail> {
    /// Creates a new hook chain.
    #[must_use]
    pub const fn new(head: Head, tail: Tail) -> Self {
        Self { head, tail }
    }
}

impl<Head, Tail> Hook for HCons<Head, Tail>
where
    Head: Hook,
    Tail: Hook,
{
    async fn pre_tool_use(&self, ctx: &ToolUseContext<'_>) -> PreToolAction {
        match self.head.pre_tool_use(ctx).await {
            PreToolAction::Allow => self.tail.pre_tool_use(ctx).await,
            deny @ PreToolAction::Deny(_) => deny,
        }
    }

    async fn post_tool_use(&self, ctx: &ToolResultContext<'_>) -> PostToolAction {
        match self.head.post_tool_use(ctx).await {
            PostToolAction::Keep => self.tail.post_tool_use(ctx).await,
            replace @ PostToolAction::Replace(_) => replace,
        }
    }

    async fn on_stop(&self, ctx: &StopContext<'_>) {
        self.head.on_stop(ctx).await;
        self.tail.on_stop(ctx).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingHook {
        count: AtomicUsize,
    }

    impl CountingHook {
        const fn new() -> Self {
            Self {
                count: AtomicUsize::new(0),
            }
        }
    }

    impl Hook for CountingHook {
        async fn pre_tool_use(&self, _ctx: &ToolUseContext<'_>) -> PreToolAction {
            self.count.fetch_add(1, Ordering::SeqCst);
            PreToolAction::Allow
        }
    }

    struct DenyBash;

    impl Hook for DenyBash {
        async fn pre_tool_use(&self, ctx: &ToolUseContext<'_>) -> PreToolAction {
            if ctx.tool_name == "bash" {
                PreToolAction::Deny("shell disabled".into())
            } else {
                PreToolAction::Allow
            }
        }
    }

    fn ctx(tool_name: &str) -> ToolUseContext<'_> {
        ToolUseContext {
            tool_name,
            call_id: "call_1",
            arguments: "{}",
            turn: 1,
            message_count: 2,
        }
    }

    #[tokio::test]
    async fn test_unit_hook() {
        let action = ().pre_tool_use(&ctx("read")).await;
        assert_eq!(action, PreToolAction::Allow);
    }

    #[tokio::test]
    async fn test_hcons_chain() {
        let chain = HCons::new(CountingHook::new(), HCons::new(CountingHook::new(), ()));

        let action = chain.pre_tool_use(&ctx("read")).await;
        assert_eq!(action, PreToolAction::Allow);
        assert_eq!(chain.head.count.load(Ordering::SeqCst), 1);
        assert_eq!(chain.tail.head.count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_deny_short_circuits() {
        let chain = HCons::new(DenyBash, HCons::new(CountingHook::new(), ()));

        let action = chain.pre_tool_use(&ctx("bash")).await;
        assert_eq!(action, PreToolAction::Deny("shell disabled".into()));
        assert_eq!(chain.tail.head.count.load(Ordering::SeqCst), 0);
    }
}
