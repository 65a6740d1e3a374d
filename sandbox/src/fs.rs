use crate::{Sandbox, SandboxError};

impl Sandbox {
    /// Reads a text file relative to the workspace.
    ///
    /// With a `line_limit` smaller than the file's line count, only the first lines are
    /// returned, followed by a marker stating how many lines were omitted. Without a
    /// limit the file's text is returned exactly.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::UnsafePath`] for paths outside the workspace and
    /// [`SandboxError::Io`] if the file cannot be read as UTF-8 text.
    pub async fn read(&self, path: &str, line_limit: Option<usize>) -> Result<String, SandboxError> {
        let target = self.workspace.resolve(path)?;
        let text = async_fs::read_to_string(&target)
            .await
            .map_err(|e| SandboxError::io(path, e))?;
        tracing::debug!(path, bytes = text.len(), ?line_limit, "read file");

        Ok(match line_limit {
            Some(limit) => limit_lines(&text, limit),
            None => text,
        })
    }

    /// Writes `content` to a file relative to the workspace, replacing it if present.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`SandboxError::UnsafePath`] for paths outside the workspace and
    /// [`SandboxError::Io`] if the file cannot be written.
    pub async fn write(&self, path: &str, content: &str) -> Result<String, SandboxError> {
        let target = self.workspace.resolve(path)?;
        if let Some(parent) = target.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| SandboxError::io(parent, e))?;
        }
        async_fs::write(&target, content)
            .await
            .map_err(|e| SandboxError::io(path, e))?;
        tracing::debug!(path, bytes = content.len(), "wrote file");

        Ok(format!("Wrote {} bytes to {path}", content.len()))
    }

    /// Replaces the single occurrence of `old_content` in a file with `new_content`.
    ///
    /// The file is left untouched unless `old_content` occurs exactly once.
    ///
    /// # Errors
    ///
    /// - [`SandboxError::EmptyPattern`] if `old_content` is empty.
    /// - [`SandboxError::PatternNotFound`] if it does not occur.
    /// - [`SandboxError::AmbiguousPattern`] if it occurs more than once.
    /// - [`SandboxError::UnsafePath`] or [`SandboxError::Io`] as for [`Sandbox::read`].
    pub async fn edit(
        &self,
        path: &str,
        old_content: &str,
        new_content: &str,
    ) -> Result<String, SandboxError> {
        if old_content.is_empty() {
            return Err(SandboxError::EmptyPattern);
        }

        let target = self.workspace.resolve(path)?;
        let text = async_fs::read_to_string(&target)
            .await
            .map_err(|e| SandboxError::io(path, e))?;

        match text.matches(old_content).count() {
            0 => Err(SandboxError::PatternNotFound {
                path: path.to_owned(),
            }),
            1 => {
                let updated = text.replacen(old_content, new_content, 1);
                async_fs::write(&target, updated)
                    .await
                    .map_err(|e| SandboxError::io(path, e))?;
                tracing::debug!(path, "edited file");
                Ok(format!("Edited {path}"))
            }
            count => Err(SandboxError::AmbiguousPattern {
                path: path.to_owned(),
                count,
            }),
        }
    }
}

fn limit_lines(text: &str, limit: usize) -> String {
    let total = text.lines().count();
    if total <= limit {
        return text.to_owned();
    }

    let mut out = text.lines().take(limit).collect::<Vec<_>>().join("\n");
    let omitted = total - limit;
    let noun = if omitted == 1 { "line" } else { "lines" };
    out.push_str(&format!("\n... ({omitted} more {noun} omitted)"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sandbox() -> (TempDir, Sandbox) {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::new(dir.path()).unwrap();
        (dir, sandbox)
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let (_dir, sandbox) = sandbox();
        let content = "first line\n\nthird line without newline";
        let confirmation = sandbox.write("docs/notes.md", content).await.unwrap();
        assert!(confirmation.contains("docs/notes.md"));

        assert_eq!(sandbox.read("docs/notes.md", None).await.unwrap(), content);
    }

    #[tokio::test]
    async fn write_overwrites() {
        let (dir, sandbox) = sandbox();
        sandbox.write("a.txt", "long original text").await.unwrap();
        sandbox.write("a.txt", "short").await.unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "short");
    }

    #[tokio::test]
    async fn read_truncates_with_marker() {
        let (_dir, sandbox) = sandbox();
        let content: String = (1..=100).map(|i| format!("line {i}\n")).collect();
        sandbox.write("big.txt", &content).await.unwrap();

        let out = sandbox.read("big.txt", Some(10)).await.unwrap();
        let expected: Vec<String> = (1..=10).map(|i| format!("line {i}")).collect();
        assert_eq!(out, format!("{}\n... (90 more lines omitted)", expected.join("\n")));
    }

    #[tokio::test]
    async fn read_marker_for_single_omitted_line() {
        let (_dir, sandbox) = sandbox();
        sandbox.write("three.txt", "a\nb\nc\n").await.unwrap();
        assert_eq!(
            sandbox.read("three.txt", Some(2)).await.unwrap(),
            "a\nb\n... (1 more line omitted)"
        );
    }

    #[tokio::test]
    async fn read_within_limit_is_exact() {
        let (_dir, sandbox) = sandbox();
        sandbox.write("small.txt", "a\nb\n").await.unwrap();
        assert_eq!(sandbox.read("small.txt", Some(5)).await.unwrap(), "a\nb\n");
    }

    #[tokio::test]
    async fn read_missing_file_is_io_error() {
        let (_dir, sandbox) = sandbox();
        let err = sandbox.read("nope.txt", None).await.unwrap_err();
        assert!(matches!(err, SandboxError::Io { .. }));
    }

    #[tokio::test]
    async fn file_ops_reject_escapes() {
        let (_dir, sandbox) = sandbox();
        assert!(matches!(
            sandbox.write("../escape.txt", "x").await.unwrap_err(),
            SandboxError::UnsafePath { .. }
        ));
        assert!(matches!(
            sandbox.read("../../etc/passwd", None).await.unwrap_err(),
            SandboxError::UnsafePath { .. }
        ));
    }

    #[tokio::test]
    async fn edit_replaces_single_match() {
        let (_dir, sandbox) = sandbox();
        sandbox.write("main.rs", "fn main() { old(); }").await.unwrap();
        sandbox.edit("main.rs", "old()", "new()").await.unwrap();
        assert_eq!(sandbox.read("main.rs", None).await.unwrap(), "fn main() { new(); }");
    }

    #[tokio::test]
    async fn ambiguous_edit_leaves_file_unchanged() {
        let (dir, sandbox) = sandbox();
        let original = "let x = 1;\nlet x = 1;\n";
        sandbox.write("dup.rs", original).await.unwrap();

        let err = sandbox.edit("dup.rs", "let x = 1;", "let y = 2;").await.unwrap_err();
        assert!(matches!(err, SandboxError::AmbiguousPattern { count: 2, .. }));
        assert_eq!(std::fs::read(dir.path().join("dup.rs")).unwrap(), original.as_bytes());
    }

    #[tokio::test]
    async fn edit_missing_or_empty_pattern() {
        let (_dir, sandbox) = sandbox();
        sandbox.write("f.txt", "hello").await.unwrap();

        assert!(matches!(
            sandbox.edit("f.txt", "absent", "x").await.unwrap_err(),
            SandboxError::PatternNotFound { .. }
        ));
        assert!(matches!(
            sandbox.edit("f.txt", "", "x").await.unwrap_err(),
            SandboxError::EmptyPattern
        ));
        assert_eq!(sandbox.read("f.txt", None).await.unwrap(), "hello");
    }
}
