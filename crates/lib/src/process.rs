//! Foreground child processes.
//!
//! Installer and shell commands run with the runner's stdin/stdout/stderr so
//! the operator sees their output as it happens. The caller blocks until the
//! child exits or its optional timeout elapses, in which case the child is
//! killed.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("failed to start '{program}': {source}")]
  Spawn { program: String, source: std::io::Error },

  #[error("failed waiting for '{program}': {source}")]
  Wait { program: String, source: std::io::Error },

  #[error("'{program}' timed out after {}", humantime::format_duration(*timeout))]
  TimedOut { program: String, timeout: Duration },

  #[error("failed to start process runtime: {0}")]
  Runtime(std::io::Error),
}

/// Run `program` with inherited stdio and wait for it.
///
/// `envs` are added on top of the inherited environment.
pub fn run_inherited(
  program: &str,
  args: &[String],
  envs: &[(&str, String)],
  timeout: Option<Duration>,
) -> Result<ExitStatus, ProcessError> {
  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .map_err(ProcessError::Runtime)?;
  rt.block_on(wait_for(program, args, envs, timeout))
}

async fn wait_for(
  program: &str,
  args: &[String],
  envs: &[(&str, String)],
  timeout: Option<Duration>,
) -> Result<ExitStatus, ProcessError> {
  let mut command = Command::new(program);
  command
    .args(args)
    .envs(envs.iter().map(|(k, v)| (*k, v.as_str())))
    .stdin(Stdio::inherit())
    .stdout(Stdio::inherit())
    .stderr(Stdio::inherit())
    .kill_on_drop(true);

  debug!(program = %program, args = ?args, timeout = ?timeout, "spawning process");

  let mut child = command.spawn().map_err(|source| ProcessError::Spawn {
    program: program.to_string(),
    source,
  })?;

  tokio::select! {
    status = child.wait() => status.map_err(|source| ProcessError::Wait {
      program: program.to_string(),
      source,
    }),
    elapsed = deadline(timeout) => {
      // Reap the child so it does not linger as a zombie.
      let _ = child.kill().await;
      Err(ProcessError::TimedOut {
        program: program.to_string(),
        timeout: elapsed,
      })
    }
  }
}

async fn deadline(timeout: Option<Duration>) -> Duration {
  match timeout {
    Some(limit) => {
      tokio::time::sleep(limit).await;
      limit
    }
    None => std::future::pending().await,
  }
}

/// Shell program and leading arguments for running a command string.
///
/// Uses `/bin/sh -c` on Unix and PowerShell on Windows rather than `$SHELL`,
/// so user profiles are not sourced.
pub fn shell_command(cmd: &str) -> (String, Vec<String>) {
  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string(), cmd.to_string()])
  }

  #[cfg(windows)]
  {
    (
      "powershell.exe".to_string(),
      vec![
        "-NoProfile".to_string(),
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
        "-Command".to_string(),
        cmd.to_string(),
      ],
    )
  }
}
