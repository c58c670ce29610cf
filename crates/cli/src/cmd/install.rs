//! Implementation of `luarunner install`.
//!
//! Resolves one dependency the same way a manifest entry would be resolved.

use anyhow::Result;

use luarunner_lib::RunnerConfig;
use luarunner_lib::bootstrap::install_one;

use crate::output::print_success;

pub fn cmd_install(config: &RunnerConfig, name: &str, path: Option<&str>) -> Result<()> {
  let resolution = install_one(config, None, name, path)?;
  print_success(&resolution.to_string());
  Ok(())
}
