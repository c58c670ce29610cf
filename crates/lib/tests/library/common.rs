//! Shared helpers for library integration tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use luarunner_lib::capabilities::{CapabilityError, Prompt};
use luarunner_lib::deps::{InstallError, InstallRequest, Installer, lookup_key};
use luarunner_lib::{Runner, RunnerConfig};
use tempfile::TempDir;

/// Temporary installation root.
pub struct TestRoot {
  pub temp: TempDir,
}

impl TestRoot {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Root with `lua-script.lua` holding `script`.
  pub fn with_script(script: &str) -> Self {
    let root = Self::new();
    root.write("lua-script.lua", script);
    root
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  pub fn write(&self, relative: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  pub fn read(&self, relative: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative)).unwrap()
  }

  pub fn manifest(&self, json: &str) {
    self.write("install.json", json);
  }

  pub fn config(&self) -> RunnerConfig {
    RunnerConfig::default().with_root(self.temp.path())
  }

  /// Runner wired to `spy` and a prompt answering `answers`.
  pub fn runner(&self, spy: &SpyInstaller, answers: &[&str]) -> Runner {
    Runner::new(self.config())
      .with_installer(Box::new(spy.clone()))
      .with_prompt(Rc::new(CannedPrompt::new(answers)))
  }
}

/// Records installer calls; optionally fails or lays down a module.
#[derive(Clone, Default)]
pub struct SpyInstaller {
  calls: Rc<RefCell<Vec<(String, PathBuf)>>>,
  fail_on: Option<String>,
  materialize: bool,
}

impl SpyInstaller {
  pub fn failing_on(package: &str) -> Self {
    Self {
      fail_on: Some(package.to_string()),
      ..Self::default()
    }
  }

  /// Writes `<store>/<key>/init.lua` returning `{ name = <package> }`.
  pub fn materializing() -> Self {
    Self {
      materialize: true,
      ..Self::default()
    }
  }

  pub fn calls(&self) -> Vec<(String, PathBuf)> {
    self.calls.borrow().clone()
  }

  pub fn packages(&self) -> Vec<String> {
    self.calls().into_iter().map(|(name, _)| name).collect()
  }
}

impl Installer for SpyInstaller {
  fn install(&self, request: &InstallRequest<'_>) -> Result<(), InstallError> {
    self
      .calls
      .borrow_mut()
      .push((request.package.to_string(), request.root.to_path_buf()));

    if self.fail_on.as_deref() == Some(request.package) {
      return Err(InstallError::Failed {
        package: request.package.to_string(),
        code: Some(1),
      });
    }

    if self.materialize {
      let dir = request.store.join(lookup_key(request.package));
      std::fs::create_dir_all(&dir).unwrap();
      std::fs::write(dir.join("init.lua"), format!("return {{ name = {:?} }}", request.package)).unwrap();
    }
    Ok(())
  }
}

pub struct CannedPrompt(RefCell<VecDeque<String>>);

impl CannedPrompt {
  pub fn new(answers: &[&str]) -> Self {
    Self(RefCell::new(answers.iter().map(|a| a.to_string()).collect()))
  }
}

impl Prompt for CannedPrompt {
  fn question(&self, _query: &str) -> Result<String, CapabilityError> {
    self.0.borrow_mut().pop_front().ok_or(CapabilityError::InputClosed)
  }
}
