mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use luarunner_lib::{RunnerConfig, RunnerError};

use crate::output::OutputFormat;

/// Exit status for command line usage errors (sysexits `EX_USAGE`).
const USAGE_EXIT_CODE: u8 = 64;

/// Install a Lua script's dependencies and run it from a mounted root
#[derive(Parser)]
#[command(name = "luarunner")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(flatten)]
  global: GlobalArgs,

  #[command(subcommand)]
  command: Option<Commands>,
}

/// Flags take precedence over the matching environment variables.
#[derive(Args)]
struct GlobalArgs {
  /// Installation root holding the script and install.json [env: LUARUNNER_ROOT] [default: /lua]
  #[arg(long, global = true)]
  root: Option<PathBuf>,

  /// Script base name, without .lua [env: lua_script] [default: lua-script]
  #[arg(long, global = true)]
  script: Option<String>,

  /// Installer command; {package}, {root} and {store} are expanded [env: LUARUNNER_INSTALLER]
  #[arg(long, global = true)]
  installer: Option<String>,

  /// Kill an installer running longer than this, e.g. 90s or 5m [env: LUARUNNER_INSTALL_TIMEOUT]
  #[arg(long, global = true, value_parser = humantime::parse_duration)]
  install_timeout: Option<Duration>,

  /// Kill a script shell command running longer than this [env: LUARUNNER_SHELL_TIMEOUT]
  #[arg(long, global = true, value_parser = humantime::parse_duration)]
  shell_timeout: Option<Duration>,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
  /// Install manifest dependencies and run the script (default)
  Run,
  /// Validate the root, compile the script and list its manifest
  Check {
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
  /// Install a single dependency under the root
  Install {
    /// Package specifier, e.g. left-pad or @scope/name@1.0.0
    name: String,
    /// Subpath under the root to install into
    #[arg(long)]
    path: Option<String>,
  },
}

impl GlobalArgs {
  fn config(&self) -> Result<RunnerConfig> {
    let mut config = RunnerConfig::from_env()?;
    if let Some(root) = &self.root {
      config = config.with_root(root);
    }
    if let Some(script) = &self.script {
      config = config.with_script_name(script);
    }
    if let Some(installer) = &self.installer {
      config = config.with_installer(installer);
    }
    if self.install_timeout.is_some() {
      config = config.with_install_timeout(self.install_timeout);
    }
    if self.shell_timeout.is_some() {
      config = config.with_shell_timeout(self.shell_timeout);
    }
    Ok(config)
  }
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let config = cli.global.config()?;

  match cli.command.unwrap_or(Commands::Run) {
    Commands::Run => cmd::cmd_run(config),
    Commands::Check { format } => cmd::cmd_check(&config, format),
    Commands::Install { name, path } => cmd::cmd_install(&config, &name, path.as_deref()),
  }
}

fn exit_code(err: &anyhow::Error) -> u8 {
  err
    .downcast_ref::<RunnerError>()
    .map_or(1, |e| u8::try_from(e.exit_code()).unwrap_or(1))
}

fn main() -> ExitCode {
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      // Help and version requests also arrive here, on stdout.
      let _ = err.print();
      return if err.use_stderr() {
        ExitCode::from(USAGE_EXIT_CODE)
      } else {
        ExitCode::SUCCESS
      };
    }
  };
  init_tracing(cli.global.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      output::report_failure(&err);
      ExitCode::from(exit_code(&err))
    }
  }
}
