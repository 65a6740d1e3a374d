//! Workspace-confined execution for tern agents.
//!
//! A [`Sandbox`] performs the only operations of an agent that touch the outside world:
//! running a shell command, and reading, writing or editing a file. File operations are
//! confined to a [`Workspace`] root; commands are screened by a [`CommandPolicy`]
//! deny-list before a shell is spawned.
//!
//! # Safety model
//!
//! Path confinement is enforced on every file operation: a path is resolved against
//! the root, normalised, and must land on the root itself or a descendant of it.
//! Existing symlinks along the path are resolved and must stay inside the root too.
//!
//! The command deny-list is a coarse filter over the command text. It is **not** a
//! sandbox: shell commands run with the privileges of the current process and can
//! reach anything that process can. Run the agent inside a container or VM when the
//! model is not trusted.
//!
//! # Example
//!
//! ```rust,ignore
//! use tern_sandbox::Sandbox;
//!
//! let sandbox = Sandbox::new("./workspace")?;
//! sandbox.write("notes/todo.md", "- ship it\n").await?;
//! let text = sandbox.read("notes/todo.md", None).await?;
//! let listing = sandbox.bash("ls notes").await?;
//! ```

#![allow(clippy::module_name_repetitions)]

mod command;
mod config;
mod error;
mod fs;
mod policy;
mod workspace;

use std::path::Path;

pub use config::SandboxConfig;
pub use error::SandboxError;
pub use policy::{CommandPolicy, DEFAULT_DENY_PATTERNS};
pub use workspace::{Workspace, is_safe_path};

/// Executor for shell and file operations bound to one workspace root.
#[derive(Debug, Clone)]
pub struct Sandbox {
    workspace: Workspace,
    policy: CommandPolicy,
    config: SandboxConfig,
}

impl Sandbox {
    /// Creates a sandbox over `root` with the default configuration.
    ///
    /// The root directory is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::Io`] if the root cannot be created or resolved.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SandboxError> {
        Self::with_config(root, SandboxConfig::default())
    }

    /// Creates a sandbox over `root` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::Io`] if the root cannot be created or resolved.
    pub fn with_config(root: impl AsRef<Path>, config: SandboxConfig) -> Result<Self, SandboxError> {
        let workspace = Workspace::new(root)?;
        let policy = CommandPolicy::new(config.deny_patterns.iter().cloned());
        tracing::debug!(root = %workspace.root().display(), "sandbox ready");
        Ok(Self {
            workspace,
            policy,
            config,
        })
    }

    /// The workspace all file operations are confined to.
    #[must_use]
    pub const fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// The command deny-list in effect.
    #[must_use]
    pub const fn policy(&self) -> &CommandPolicy {
        &self.policy
    }

    /// The configuration this sandbox was built with.
    #[must_use]
    pub const fn config(&self) -> &SandboxConfig {
        &self.config
    }
}
