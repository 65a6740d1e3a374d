use std::{io, path::Path, process::Stdio, time::Duration};

use async_process::{Command, Output};
use futures_lite::{AsyncRead, AsyncReadExt};

use crate::{Sandbox, SandboxError};

impl Sandbox {
    /// Runs `command` through the configured shell inside the workspace root.
    ///
    /// The command is first screened by the [`CommandPolicy`](crate::CommandPolicy); a
    /// match is rejected before any process is spawned. The returned text is standard
    /// output if non-empty, else standard error, else an empty string. A non-zero exit
    /// status is not an error: its output is returned like any other.
    ///
    /// # Errors
    ///
    /// - [`SandboxError::DangerousCommand`] if the deny-list matches.
    /// - [`SandboxError::ExecutionFailed`] if the shell cannot be spawned or the command
    ///   exceeds the configured timeout (the process is killed).
    pub async fn bash(&self, command: &str) -> Result<String, SandboxError> {
        self.policy.check(command)?;

        let started = std::time::Instant::now();
        tracing::debug!(%command, "running shell command");
        let output = run_shell(
            &self.config.shell,
            command,
            self.workspace.root(),
            self.config.timeout,
        )
        .await?;

        tracing::debug!(
            %command,
            status = ?output.status.code(),
            elapsed_ms = started.elapsed().as_millis(),
            "shell command finished"
        );

        let text = select_output(&output);
        Ok(match self.config.output_limit {
            Some(limit) => truncate_output(text, limit),
            None => text,
        })
    }
}

async fn run_shell(
    shell: &str,
    command: &str,
    cwd: &Path,
    timeout: Duration,
) -> Result<Output, SandboxError> {
    let mut child = Command::new(shell)
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| SandboxError::ExecutionFailed {
            message: format!("failed to spawn `{shell}`: {e}"),
            stderr: String::new(),
        })?;

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    // Output is collected into the outer buffers so a timeout keeps what was read.
    let finished = futures_lite::future::or(
        async {
            let (out, err) = futures_lite::future::zip(
                drain(stdout_pipe, &mut stdout),
                drain(stderr_pipe, &mut stderr),
            )
            .await;
            let status = child.status().await;
            Some(out.and(err).and(status))
        },
        async {
            async_io::Timer::after(timeout).await;
            None
        },
    )
    .await;

    match finished {
        Some(Ok(status)) => Ok(Output {
            status,
            stdout,
            stderr,
        }),
        Some(Err(e)) => Err(SandboxError::ExecutionFailed {
            message: e.to_string(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        }),
        None => {
            // Dropping the child on return kills it.
            tracing::warn!(%command, ?timeout, "shell command timed out");
            Err(SandboxError::ExecutionFailed {
                message: format!("timed out after {timeout:?}"),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            })
        }
    }
}

// Reads a pipe to its end, appending chunk by chunk so partial output survives cancellation.
async fn drain(pipe: Option<impl AsyncRead + Unpin>, buf: &mut Vec<u8>) -> io::Result<()> {
    let Some(mut pipe) = pipe else {
        return Ok(());
    };
    let mut chunk = [0u8; 4096];
    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn select_output(output: &Output) -> String {
    if !output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stdout).into_owned()
    } else if !output.stderr.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::new()
    }
}

fn truncate_output(mut text: String, limit: usize) -> String {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
    text.push_str("\n...output truncated...");
    text
}
