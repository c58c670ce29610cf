//! Fixed-order startup: validate, compile, resolve, evaluate, invoke.
//!
//! Nothing is installed when the script does not compile, and the script's
//! top level only runs once every declared dependency is on the search path.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use mlua::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::capabilities::{Capabilities, Prompt, ShellRunner, TerminalPrompt};
use crate::config::RunnerConfig;
use crate::deps::{CommandInstaller, DependencyDecl, Installer, Resolution, Resolved, Resolver, manifest};
use crate::env::{self, EnvironmentError};
use crate::error::RunnerError;
use crate::lua::runtime::create_runtime;
use crate::script::{self, EntryPoint, ScriptModule};
use crate::search_path::{ExecutionEnv, ModulePaths};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
  pub script: PathBuf,
  /// Manifest dependencies in declaration order
  pub dependencies: Vec<Resolved>,
}

impl RunSummary {
  pub fn installed_count(&self) -> usize {
    self.dependencies.iter().filter(|d| d.resolution.was_installed()).count()
  }
}

pub struct Runner {
  config: RunnerConfig,
  /// `None` until overridden; the configured command installer is built after validation.
  installer: Option<Box<dyn Installer>>,
  prompt: Rc<dyn Prompt>,
}

impl Runner {
  /// Runner with the configured command installer and a terminal prompt.
  pub fn new(config: RunnerConfig) -> Self {
    Self {
      config,
      installer: None,
      prompt: Rc::new(TerminalPrompt),
    }
  }

  pub fn with_installer(mut self, installer: Box<dyn Installer>) -> Self {
    self.installer = Some(installer);
    self
  }

  pub fn with_prompt(mut self, prompt: Rc<dyn Prompt>) -> Self {
    self.prompt = prompt;
    self
  }

  /// Everything up to, but not including, calling the entry point.
  pub fn prepare(self) -> Result<PreparedRun, RunnerError> {
    let script_path = env::validate(&self.config)?;
    let installer = installer_or_configured(self.installer, &self.config)?;

    let lua = create_runtime()?;
    let script = ScriptModule::load(&lua, script_path.as_path())?;

    let decls = manifest::load(&self.config.manifest_path())?;
    let env = ExecutionEnv::new(&self.config.root, ModulePaths::current(&lua)?);
    let resolver = Rc::new(RefCell::new(Resolver::new(env, installer)));

    let dependencies = resolver.borrow_mut().resolve_all(&lua, &decls)?;
    resolver.borrow().env().paths().apply(&lua)?;
    debug!(count = dependencies.len(), "manifest dependencies resolved");

    let entry = script.entry_point()?;
    let capabilities = Capabilities::new(self.prompt, Rc::clone(&resolver), ShellRunner::new(self.config.shell_timeout));
    let table = capabilities.to_lua(&lua)?;

    Ok(PreparedRun {
      _lua: lua,
      entry,
      capabilities: table,
      summary: RunSummary {
        script: script_path.as_path().to_path_buf(),
        dependencies,
      },
    })
  }

  /// [`Runner::prepare`] followed by [`PreparedRun::invoke`].
  pub fn run(self) -> Result<RunSummary, RunnerError> {
    self.prepare()?.invoke()
  }
}

/// A script whose entry point is ready to be called.
pub struct PreparedRun {
  // Keeps the VM alive for as long as the handles below.
  _lua: Lua,
  entry: EntryPoint,
  capabilities: LuaTable,
  summary: RunSummary,
}

impl PreparedRun {
  pub fn summary(&self) -> &RunSummary {
    &self.summary
  }

  pub fn invoke(self) -> Result<RunSummary, RunnerError> {
    info!(script = %self.summary.script.display(), "invoking script");
    script::dispatch(&self.entry, self.capabilities)?;
    info!("script finished");
    Ok(self.summary)
  }
}

/// What `check` reports: a validated script and the manifest it would resolve.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
  pub script: PathBuf,
  pub manifest: PathBuf,
  pub declarations: Vec<DependencyDecl>,
}

/// Validate the environment, compile the script and read the manifest,
/// without installing or running anything.
pub fn check(config: &RunnerConfig) -> Result<CheckReport, RunnerError> {
  let script_path = env::validate(config)?;
  let lua = create_runtime()?;
  ScriptModule::load(&lua, script_path.as_path())?;

  let manifest = config.manifest_path();
  let declarations = manifest::load(&manifest)?;

  Ok(CheckReport {
    script: script_path.as_path().to_path_buf(),
    manifest,
    declarations,
  })
}

/// Resolve a single dependency under the configured root.
///
/// Only the root has to exist; no script is needed. Without an explicit
/// `installer` the configured command installer is used.
pub fn install_one(
  config: &RunnerConfig,
  installer: Option<Box<dyn Installer>>,
  name: &str,
  subpath: Option<&str>,
) -> Result<Resolution, RunnerError> {
  if !config.root.is_dir() {
    return Err(EnvironmentError::MissingMountPoint {
      root: config.root.clone(),
    }
    .into());
  }
  let installer = installer_or_configured(installer, config)?;

  let lua = create_runtime()?;
  let env = ExecutionEnv::new(&config.root, ModulePaths::current(&lua)?);
  let mut resolver = Resolver::new(env, installer);
  Ok(resolver.resolve(&lua, name, subpath)?)
}

fn installer_or_configured(
  installer: Option<Box<dyn Installer>>,
  config: &RunnerConfig,
) -> Result<Box<dyn Installer>, RunnerError> {
  match installer {
    Some(installer) => Ok(installer),
    None => Ok(Box::new(CommandInstaller::from_config(config)?)),
  }
}
