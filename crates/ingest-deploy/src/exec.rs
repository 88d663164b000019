//! External command execution.
//!
//! Two modes: [`run`] captures output and folds stderr into the error for
//! quiet tools like systemctl, [`run_streamed`] inherits stdio so long-running
//! tools (rsync, pip, journalctl) print as they go.

use std::ffi::OsStr;
use std::path::Path;

use tokio::process::Command;
use tracing::trace;

/// A command that failed to spawn or exited non-zero.
#[derive(Debug, thiserror::Error)]
#[error("command failed: {command}: {detail}")]
pub struct CommandError {
    pub command: String,
    pub detail: String,
}

fn render<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> String {
    let mut rendered = program.display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.as_ref().to_string_lossy());
    }
    rendered
}

/// Run a command to completion, capturing its output.
///
/// Returns trimmed stdout on success. On a non-zero exit the trimmed stderr
/// becomes the error detail, falling back to the exit status when the tool
/// was silent.
pub async fn run<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> Result<String, CommandError> {
    trace!(command = %render(program, args), "exec (captured)");
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| CommandError {
            command: render(program, args),
            detail: e.to_string(),
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let detail = if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr
        };
        Err(CommandError {
            command: render(program, args),
            detail,
        })
    }
}

/// Run a command with stdio inherited from this process.
pub async fn run_streamed<S: AsRef<OsStr>>(
    program: &Path,
    args: &[S],
) -> Result<(), CommandError> {
    trace!(command = %render(program, args), "exec (streamed)");
    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|e| CommandError {
            command: render(program, args),
            detail: e.to_string(),
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(CommandError {
            command: render(program, args),
            detail: format!("exited with {status}"),
        })
    }
}
