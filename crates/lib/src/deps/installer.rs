//! External package installers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, RunnerConfig};
use crate::process::{self, ProcessError};
use crate::search_path::ModulePaths;

#[derive(Debug, Error)]
pub enum InstallError {
  #[error("invalid dependency name '{0}'")]
  InvalidName(String),

  #[error("cannot look up '{package}' in the Lua runtime: {message}")]
  Lookup { package: String, message: String },

  #[error("cannot create dependency store {}: {source}", path.display())]
  Store { path: PathBuf, source: std::io::Error },

  #[error("installer failed for '{package}' ({})", exit_description(*code))]
  Failed { package: String, code: Option<i32> },

  #[error("installer could not run for '{package}': {source}")]
  Process { package: String, source: ProcessError },
}

fn exit_description(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("exit code {}", code),
    None => "terminated by signal".to_string(),
  }
}

/// Everything an installer needs to place one package.
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
  /// Full specifier, including scope and version pin
  pub package: &'a str,
  /// Installation root the package belongs under
  pub root: &'a Path,
  /// Dependency store inside `root`
  pub store: &'a Path,
  /// Search path in effect, exported to the installer process
  pub paths: &'a ModulePaths,
}

/// Installs a package that is not yet available.
///
/// Implementations block until the package is in place or the attempt failed.
pub trait Installer {
  fn install(&self, request: &InstallRequest<'_>) -> Result<(), InstallError>;
}

/// Runs an external command built from a template.
///
/// Each whitespace-separated template argument has `{package}`, `{root}` and
/// `{store}` expanded; the program is executed directly, not through a shell.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
  template: Vec<String>,
  timeout: Option<Duration>,
}

impl CommandInstaller {
  pub fn new(template: Vec<String>, timeout: Option<Duration>) -> Self {
    Self { template, timeout }
  }

  /// Installer described by the configured template and timeout.
  pub fn from_config(config: &RunnerConfig) -> Result<Self, ConfigError> {
    Ok(Self::new(config.installer_args()?, config.install_timeout))
  }

  /// Program and arguments for one request.
  pub fn command_for(&self, request: &InstallRequest<'_>) -> Option<(String, Vec<String>)> {
    let root = request.root.to_string_lossy();
    let store = request.store.to_string_lossy();
    let mut expanded = self.template.iter().map(|arg| {
      arg
        .replace("{package}", request.package)
        .replace("{root}", &root)
        .replace("{store}", &store)
    });
    let program = expanded.next()?;
    Some((program, expanded.collect()))
  }
}

impl Installer for CommandInstaller {
  fn install(&self, request: &InstallRequest<'_>) -> Result<(), InstallError> {
    let (program, args) = self
      .command_for(request)
      .ok_or_else(|| InstallError::InvalidName(request.package.to_string()))?;

    info!(package = %request.package, root = %request.root.display(), program = %program, "running installer");

    let status = process::run_inherited(&program, &args, &request.paths.env_vars(), self.timeout).map_err(|source| {
      InstallError::Process {
        package: request.package.to_string(),
        source,
      }
    })?;

    if !status.success() {
      return Err(InstallError::Failed {
        package: request.package.to_string(),
        code: status.code(),
      });
    }
    Ok(())
  }
}
