//! Implementation of `luarunner run`, the default command.
//!
//! Validates the mounted root, resolves the manifest's dependencies and calls
//! the script's entry point with the capability table.

use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use luarunner_lib::consts::APP_NAME;
use luarunner_lib::{Runner, RunnerConfig};

use crate::output::{format_duration, print_banner, print_stat};

pub fn cmd_run(config: RunnerConfig) -> Result<()> {
  let started = Instant::now();
  print_banner(&format!("Welcome to {}", APP_NAME));

  let prepared = Runner::new(config).prepare()?;
  let resolved = prepared.summary().dependencies.len();

  print_banner(&format!("{} will now invoke your script", APP_NAME));
  println!();
  let summary = prepared.invoke()?;
  println!();

  debug!(
    script = %summary.script.display(),
    installed = summary.installed_count(),
    resolved,
    "run complete"
  );
  if resolved > 0 {
    print_stat("Dependencies", &format!("{} ({} installed)", resolved, summary.installed_count()));
  }
  print_stat("Elapsed", &format_duration(started.elapsed()));
  print_banner(&format!("{} will now terminate", APP_NAME));

  Ok(())
}
