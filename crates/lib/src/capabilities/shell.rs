//! Shell commands issued by scripts.

use std::time::Duration;

use tracing::info;

use super::CapabilityError;
use crate::process;
use crate::search_path::ModulePaths;

/// Runs command strings through the platform shell in the foreground.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner {
  timeout: Option<Duration>,
}

impl ShellRunner {
  pub fn new(timeout: Option<Duration>) -> Self {
    Self { timeout }
  }

  /// Run `cmd` with the current module search path exported, failing on a nonzero exit.
  pub fn run(&self, cmd: &str, paths: &ModulePaths) -> Result<(), CapabilityError> {
    let (program, args) = process::shell_command(cmd);
    info!(command = %cmd, "running shell command");

    let status = process::run_inherited(&program, &args, &paths.env_vars(), self.timeout)?;
    if !status.success() {
      return Err(CapabilityError::CommandFailed {
        command: cmd.to_string(),
        code: status.code(),
      });
    }
    Ok(())
  }
}
