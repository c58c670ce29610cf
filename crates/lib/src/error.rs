//! Umbrella error for a runner invocation.

use thiserror::Error;

use crate::config::ConfigError;
use crate::deps::{InstallError, ManifestError};
use crate::env::EnvironmentError;
use crate::script::{LoadError, RuntimeError};

#[derive(Debug, Error)]
pub enum RunnerError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Environment(#[from] EnvironmentError),

  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error(transparent)]
  Load(#[from] LoadError),

  #[error(transparent)]
  Install(#[from] InstallError),

  #[error("script failed: {0}")]
  Runtime(#[from] RuntimeError),

  /// VM setup failure; kept as text so the error stays `Send + Sync`.
  #[error("lua runtime error: {0}")]
  Lua(String),
}

impl From<mlua::Error> for RunnerError {
  fn from(err: mlua::Error) -> Self {
    RunnerError::Lua(err.to_string())
  }
}

impl RunnerError {
  /// Process exit status for this failure. Every fatal path is nonzero.
  pub fn exit_code(&self) -> i32 {
    match self {
      RunnerError::Environment(EnvironmentError::MissingMountPoint { .. }) => 2,
      RunnerError::Environment(EnvironmentError::MissingScript { .. }) => 3,
      RunnerError::Manifest(_) => 4,
      RunnerError::Load(_) => 5,
      RunnerError::Install(_) => 6,
      RunnerError::Runtime(_) => 7,
      RunnerError::Config(_) | RunnerError::Lua(_) => 1,
    }
  }
}
