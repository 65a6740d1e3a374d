//! Deny-list screening for shell commands.
//!
//! The list is matched as plain substrings of the command text. It catches the obvious
//! destructive one-liners and nothing more: quoting, variables, aliases or a script
//! file trivially get around it. Treat it as a tripwire, not an isolation boundary.

use crate::SandboxError;

/// Patterns rejected by default. Not exhaustive.
pub const DEFAULT_DENY_PATTERNS: &[&str] = &[
    "rm -rf /",
    "rm -rf ~",
    "sudo ",
    "shutdown",
    "reboot",
    "poweroff",
    "halt",
    "mkfs",
    "> /dev/sd",
    "> /dev/nvme",
    "> /dev/hd",
];

/// Substring deny-list applied before any command is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPolicy {
    patterns: Vec<String>,
}

impl Default for CommandPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DENY_PATTERNS.iter().copied())
    }
}

impl CommandPolicy {
    /// Creates a policy from the given patterns. Empty patterns are ignored.
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            patterns: patterns
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// A policy that rejects nothing.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// The active patterns.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns the first pattern contained in `command`, if any.
    #[must_use]
    pub fn find_match(&self, command: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|pattern| command.contains(pattern.as_str()))
            .map(String::as_str)
    }

    /// Checks a command against the deny-list.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::DangerousCommand`] naming the matched pattern.
    pub fn check(&self, command: &str) -> Result<(), SandboxError> {
        match self.find_match(command) {
            Some(pattern) => {
                tracing::warn!(%command, pattern, "rejected dangerous command");
                Err(SandboxError::DangerousCommand {
                    pattern: pattern.to_owned(),
                })
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rejects_root_deletion() {
        let policy = CommandPolicy::default();
        let err = policy.check("cd / && rm -rf / --no-preserve-root").unwrap_err();
        assert!(matches!(err, SandboxError::DangerousCommand { ref pattern } if pattern == "rm -rf /"));
    }

    #[test]
    fn default_rejects_privilege_and_power() {
        let policy = CommandPolicy::default();
        assert!(policy.check("sudo apt install foo").is_err());
        assert!(policy.check("shutdown -h now").is_err());
        assert!(policy.check("echo x > /dev/sda").is_err());
    }

    #[test]
    fn default_allows_ordinary_commands() {
        let policy = CommandPolicy::default();
        assert!(policy.check("ls -la").is_ok());
        assert!(policy.check("cargo test 2> /dev/null").is_ok());
        assert!(policy.check("rm -rf ./target").is_ok());
    }

    #[test]
    fn permissive_and_custom() {
        assert!(CommandPolicy::permissive().check("sudo ls").is_ok());

        let policy = CommandPolicy::new(["git push", ""]);
        assert_eq!(policy.patterns(), ["git push"]);
        assert_eq!(policy.find_match("git push --force"), Some("git push"));
        assert!(policy.check("git status").is_ok());
    }
}
