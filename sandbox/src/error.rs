use std::path::PathBuf;

/// Failures raised by sandboxed operations.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// The path resolves outside the workspace root.
    #[error("unsafe path `{path}`: resolves outside the workspace")]
    UnsafePath {
        /// Path as supplied by the caller.
        path: String,
    },

    /// The edit fragment does not occur in the file.
    #[error("pattern not found in `{path}`")]
    PatternNotFound {
        /// File that was searched.
        path: String,
    },

    /// The edit fragment occurs more than once.
    #[error("ambiguous pattern in `{path}`: found {count} occurrences, expected exactly one")]
    AmbiguousPattern {
        /// File that was searched.
        path: String,
        /// Number of non-overlapping occurrences.
        count: usize,
    },

    /// The edit fragment is empty.
    #[error("empty pattern: old content must not be empty")]
    EmptyPattern,

    /// The command matched the deny-list and was not run.
    #[error("dangerous command blocked: contains `{pattern}`")]
    DangerousCommand {
        /// Deny-list entry that matched.
        pattern: String,
    },

    /// The shell could not be run to completion.
    #[error("execution failed: {message}{}", stderr_suffix(.stderr))]
    ExecutionFailed {
        /// What went wrong.
        message: String,
        /// Error output captured before the failure, if any.
        stderr: String,
    },

    /// A file system operation failed.
    #[error("io error on `{}`: {source}", .path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl SandboxError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\nstderr: {stderr}")
    }
}
