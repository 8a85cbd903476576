use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Bounded wait applied to every external command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Boundary through which all external commands run.
///
/// Implementations must absorb every process-level fault (spawn failure,
/// non-zero exit, timeout, empty output) into `None`. Harvesters treat the
/// result as optional and degrade the affected facts; nothing downstream of
/// this trait ever sees an execution error.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` and returns its trimmed stdout, or `None` on any fault.
    async fn run(&self, command: &str) -> Option<String>;
}

/// Executes commands through `sh -c` with stderr suppressed and a bounded
/// wait. On timeout the child is killed before the call returns; no process
/// handle outlives the invocation.
pub struct ShellRunner {
    timeout: Duration,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self {
            timeout: COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Option<String> {
        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(error) => {
                tracing::debug!(command, %error, "failed to spawn command");
                return None;
            }
        };

        // Dropping the wait future on timeout kills the child (kill_on_drop),
        // so a hung command cannot block the pass beyond the bounded wait.
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(error)) => {
                tracing::debug!(command, %error, "failed to read command output");
                return None;
            }
            Err(_) => {
                tracing::debug!(command, timeout_secs = self.timeout.as_secs(), "command timed out");
                return None;
            }
        };

        if !output.status.success() {
            tracing::debug!(command, code = ?output.status.code(), "command exited non-zero");
            return None;
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
