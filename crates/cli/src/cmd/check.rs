//! Implementation of `luarunner check`.
//!
//! Validates the root, compiles the script and reads the manifest. Nothing is
//! installed and the script is not run.

use anyhow::Result;

use luarunner_lib::RunnerConfig;
use luarunner_lib::bootstrap::check;

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success, symbols};

pub fn cmd_check(config: &RunnerConfig, format: OutputFormat) -> Result<()> {
  let report = check(config)?;

  if format.is_json() {
    return print_json(&report);
  }

  print_success(&format!("Script compiles: {}", report.script.display()));
  print_stat("Manifest", &report.manifest.display().to_string());
  print_stat("Dependencies", &report.declarations.len().to_string());

  for decl in &report.declarations {
    match &decl.path {
      Some(path) => print_info(&format!("{} {} {}", decl.name, symbols::ARROW, path)),
      None => print_info(&decl.name),
    }
  }

  Ok(())
}
