//! CLI output formatting: status lines, banners and failure diagnostics.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use luarunner_lib::RunnerError;
use luarunner_lib::consts::{APP_NAME, DEFAULT_SCRIPT_NAME, INSTALLER_ENV_VAR, SCRIPT_ENV_VAR};
use luarunner_lib::env::EnvironmentError;
use luarunner_lib::script::LoadError;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    format!("{}m {}s", secs / 60, secs % 60)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// A line that frames a stage of the run.
pub fn print_banner(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.bold()));
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Render a fatal error: the error itself, what the operator can do about
/// it, and the abort notice.
pub fn report_failure(err: &anyhow::Error) {
  eprintln!();
  print_error(&format!("{:#}", err));

  if let Some(runner_err) = err.downcast_ref::<RunnerError>() {
    for line in hint(runner_err) {
      eprintln!("  {}", line.if_supports_color(Stream::Stderr, |s| s.dimmed()));
    }
  }

  eprintln!();
  print_warning(&format!("Unable to continue, so {} will abort", APP_NAME));
}

/// Operator guidance for a runner failure.
pub fn hint(err: &RunnerError) -> Vec<String> {
  match err {
    RunnerError::Environment(EnvironmentError::MissingMountPoint { root }) => vec![
      format!(
        "When you start the container you must map your target folder to its {} folder,",
        root.display()
      ),
      format!("for example: -v ~/my-project:{}", root.display()),
    ],
    RunnerError::Environment(EnvironmentError::MissingScript { path }) => {
      let root = path.parent().map(|p| p.display().to_string()).unwrap_or_default();
      vec![
        format!("Map a folder that contains your script to the container's {} folder.", root),
        format!(
          "Without a {} environment variable the runner looks for {}.lua.",
          SCRIPT_ENV_VAR, DEFAULT_SCRIPT_NAME
        ),
      ]
    }
    RunnerError::Manifest(_) => vec![
      "install.json must be a JSON array of module names or { \"name\": ..., \"path\": ... } objects.".to_string(),
    ],
    RunnerError::Load(LoadError::Syntax { .. }) => {
      vec!["The script probably contains one or more Lua syntax errors.".to_string()]
    }
    RunnerError::Load(LoadError::NoEntryPoint { .. }) => {
      vec!["The script must return a function, or a table with a run function.".to_string()]
    }
    RunnerError::Load(LoadError::Init { .. }) => {
      vec!["The script raised an error while loading; check its top-level require calls.".to_string()]
    }
    RunnerError::Install(_) => vec![
      "Check the installer output above.".to_string(),
      format!("Set {} to change the install command.", INSTALLER_ENV_VAR),
    ],
    _ => Vec::new(),
  }
}
