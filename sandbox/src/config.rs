use std::time::Duration;

use crate::policy::DEFAULT_DENY_PATTERNS;

/// Default time a shell command may run before it is killed.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for a [`Sandbox`](crate::Sandbox).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxConfig {
    /// Substrings that cause a command to be rejected without running.
    pub deny_patterns: Vec<String>,
    /// Shell program invoked as `<shell> -c <command>`.
    pub shell: String,
    /// Maximum run time of a single command.
    pub timeout: Duration,
    /// Maximum bytes of command output returned, if capped.
    pub output_limit: Option<usize>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            deny_patterns: DEFAULT_DENY_PATTERNS.iter().map(|p| (*p).to_owned()).collect(),
            shell: "sh".into(),
            timeout: DEFAULT_TIMEOUT,
            output_limit: None,
        }
    }
}

impl SandboxConfig {
    /// Replaces the deny-list.
    #[must_use]
    pub fn with_deny_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.deny_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one entry to the deny-list.
    #[must_use]
    pub fn deny(mut self, pattern: impl Into<String>) -> Self {
        self.deny_patterns.push(pattern.into());
        self
    }

    /// Sets the shell program.
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Sets the command timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Caps returned command output at `bytes`.
    #[must_use]
    pub const fn with_output_limit(mut self, bytes: usize) -> Self {
        self.output_limit = Some(bytes);
        self
    }
}
