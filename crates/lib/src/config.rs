//! Runner configuration.
//!
//! Defaults describe the container layout. The CLI layers its flags and
//! environment fallbacks on top; embedders and tests can use
//! [`RunnerConfig::from_env`].

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::consts::{
  DEFAULT_INSTALLER, DEFAULT_ROOT, DEFAULT_SCRIPT_NAME, INSTALL_TIMEOUT_ENV_VAR, INSTALLER_ENV_VAR, MANIFEST_FILE,
  ROOT_ENV_VAR, SCRIPT_ENV_VAR, SCRIPT_EXTENSION, SHELL_TIMEOUT_ENV_VAR,
};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid duration in {var}: {source}")]
  InvalidDuration {
    var: &'static str,
    source: humantime::DurationError,
  },

  #[error("installer command is empty")]
  EmptyInstaller,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
  /// Installation root holding the script, its manifest and dependencies
  pub root: PathBuf,
  /// Script base name, without extension
  pub script_name: String,
  /// Installer command template
  pub installer: String,
  pub install_timeout: Option<Duration>,
  pub shell_timeout: Option<Duration>,
}

impl Default for RunnerConfig {
  fn default() -> Self {
    Self {
      root: PathBuf::from(DEFAULT_ROOT),
      script_name: DEFAULT_SCRIPT_NAME.to_string(),
      installer: DEFAULT_INSTALLER.to_string(),
      install_timeout: None,
      shell_timeout: None,
    }
  }
}

impl RunnerConfig {
  /// Build a configuration from the process environment, falling back to defaults.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if let Some(root) = non_empty_var(ROOT_ENV_VAR) {
      config.root = PathBuf::from(root);
    }
    if let Some(name) = non_empty_var(SCRIPT_ENV_VAR) {
      config.script_name = name;
    }
    if let Some(installer) = non_empty_var(INSTALLER_ENV_VAR) {
      config.installer = installer;
    }
    config.install_timeout = duration_var(INSTALL_TIMEOUT_ENV_VAR)?;
    config.shell_timeout = duration_var(SHELL_TIMEOUT_ENV_VAR)?;

    Ok(config)
  }

  pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.root = root.into();
    self
  }

  pub fn with_script_name(mut self, name: impl Into<String>) -> Self {
    self.script_name = name.into();
    self
  }

  pub fn with_installer(mut self, installer: impl Into<String>) -> Self {
    self.installer = installer.into();
    self
  }

  pub fn with_install_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.install_timeout = timeout;
    self
  }

  pub fn with_shell_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.shell_timeout = timeout;
    self
  }

  /// `<root>/<script_name>.lua`
  pub fn script_path(&self) -> PathBuf {
    self.root.join(format!("{}.{}", self.script_name, SCRIPT_EXTENSION))
  }

  /// `<root>/install.json`
  pub fn manifest_path(&self) -> PathBuf {
    self.root.join(MANIFEST_FILE)
  }

  /// Installer template split into arguments.
  pub fn installer_args(&self) -> Result<Vec<String>, ConfigError> {
    let args: Vec<String> = self.installer.split_whitespace().map(str::to_string).collect();
    if args.is_empty() {
      return Err(ConfigError::EmptyInstaller);
    }
    Ok(args)
  }
}

fn non_empty_var(name: &str) -> Option<String> {
  std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn duration_var(var: &'static str) -> Result<Option<Duration>, ConfigError> {
  non_empty_var(var)
    .map(|raw| humantime::parse_duration(raw.trim()).map_err(|source| ConfigError::InvalidDuration { var, source }))
    .transpose()
}
