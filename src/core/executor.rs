use crate::core::Executor;
use crate::utils::error::{ModrunError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Runs lines through `<shell> -c <line>`, forwarding every output line to stdout.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: PathBuf,
}

impl ShellExecutor {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

/// Forwards raw lines until EOF. Invalid UTF-8 is printed lossily; the pipe
/// stays open to the end so the child never sees a closed reader.
async fn forward_lines<R: AsyncRead + Unpin>(stream: R) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                println!("{}", String::from_utf8_lossy(line));
            }
            Err(e) => {
                tracing::warn!("Failed to read command output, discarding the rest: {}", e);
                if let Err(e) = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await {
                    tracing::warn!("Failed to drain command output: {}", e);
                }
                break;
            }
        }
    }
}

#[async_trait]
impl Executor for ShellExecutor {
    async fn execute(&self, shell_line: &str) -> Result<i32> {
        tracing::debug!("Executing via {}: {}", self.shell.display(), shell_line);

        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(shell_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ModrunError::SpawnFailed {
                command: shell_line.to_string(),
                source,
            })?;

        // Drain both pipes concurrently so a chatty stderr can't block the child.
        let stdout_task = child.stdout.take().map(|s| tokio::spawn(forward_lines(s)));
        let stderr_task = child.stderr.take().map(|s| tokio::spawn(forward_lines(s)));

        let status = child
            .wait()
            .await
            .map_err(|source| ModrunError::WaitFailed {
                command: shell_line.to_string(),
                source,
            })?;

        for task in [stdout_task, stderr_task].into_iter().flatten() {
            if let Err(e) = task.await {
                tracing::warn!("Output forwarding for '{}' failed: {}", shell_line, e);
            }
        }

        let code = status.code().unwrap_or_else(|| {
            tracing::warn!("'{}' was terminated by a signal", shell_line);
            -1
        });
        tracing::debug!("'{}' exited with code {}", shell_line, code);
        Ok(code)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_returns_exit_code() {
        let executor = ShellExecutor::new("/bin/sh");
        assert_eq!(executor.execute("true").await.unwrap(), 0);
        assert_eq!(executor.execute("exit 3").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_execute_drains_both_streams() {
        let executor = ShellExecutor::new("/bin/sh");
        // Enough stderr to fill a pipe buffer if it were left undrained.
        let line = "i=0; while [ $i -lt 5000 ]; do echo err-$i >&2; echo out-$i; i=$((i+1)); done";
        assert_eq!(executor.execute(line).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_execute_survives_invalid_utf8_output() {
        let executor = ShellExecutor::new("/bin/sh");
        // A non-UTF-8 line followed by well over a pipe buffer of output.
        let line = "printf '\\377\\n'; printf 'bad \\376 err\\n' >&2; \
                    i=0; while [ $i -lt 20000 ]; do echo line-$i-xxxxxxxx; i=$((i+1)); done; exit 0";
        assert_eq!(executor.execute(line).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_execute_spawn_failure() {
        let executor = ShellExecutor::new("/nonexistent/shell_12345");
        let result = executor.execute("true").await;
        assert!(matches!(result, Err(ModrunError::SpawnFailed { .. })));
    }
}
