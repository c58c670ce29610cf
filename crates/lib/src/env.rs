//! Environment validation.
//!
//! Runs before anything else touches the installation root: the mount point
//! must exist, then the script inside it.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::RunnerConfig;

#[derive(Debug, Error)]
pub enum EnvironmentError {
  #[error("installation root not found: {}", root.display())]
  MissingMountPoint { root: PathBuf },

  #[error("script not found: {}", path.display())]
  MissingScript { path: PathBuf },
}

/// Validated location of the script to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPath(PathBuf);

impl ScriptPath {
  pub fn as_path(&self) -> &Path {
    &self.0
  }
}

impl AsRef<Path> for ScriptPath {
  fn as_ref(&self) -> &Path {
    &self.0
  }
}

/// Check the installation root, then the script under it.
pub fn validate(config: &RunnerConfig) -> Result<ScriptPath, EnvironmentError> {
  if !config.root.is_dir() {
    return Err(EnvironmentError::MissingMountPoint {
      root: config.root.clone(),
    });
  }

  let path = config.script_path();
  if !path.is_file() {
    return Err(EnvironmentError::MissingScript { path });
  }

  debug!(script = %path.display(), "environment validated");
  Ok(ScriptPath(path))
}
