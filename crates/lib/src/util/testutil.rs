//! Test utilities for luarunner-lib.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use crate::capabilities::{CapabilityError, Prompt};
use crate::deps::{InstallError, InstallRequest, Installer, lookup_key};

/// Installer that records its calls instead of running anything.
///
/// Clones share the same call log.
#[derive(Clone, Default)]
pub struct SpyInstaller {
  calls: Rc<RefCell<Vec<(String, PathBuf)>>>,
  fail_on: Option<String>,
  materialize: bool,
}

impl SpyInstaller {
  /// Fail with exit code 1 when asked for `package`.
  pub fn failing_on(package: &str) -> Self {
    Self {
      fail_on: Some(package.to_string()),
      ..Self::default()
    }
  }

  /// Create `<store>/<lookup key>/init.lua` on every successful call.
  pub fn materializing() -> Self {
    Self {
      materialize: true,
      ..Self::default()
    }
  }

  /// `(package, root)` for every call, in order.
  pub fn calls(&self) -> Vec<(String, PathBuf)> {
    self.calls.borrow().clone()
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
      fs::create_dir_all(&dir).map_err(|source| InstallError::Store {
        path: dir.clone(),
        source,
      })?;
      fs::write(dir.join("init.lua"), "return { installed = true }").map_err(|source| InstallError::Store {
        path: dir.clone(),
        source,
      })?;
    }
    Ok(())
  }
}

/// Prompt that answers from a fixed list and records the questions asked.
#[derive(Default)]
pub struct CannedPrompt {
  answers: RefCell<VecDeque<String>>,
  asked: RefCell<Vec<String>>,
}

impl CannedPrompt {
  pub fn new(answers: &[&str]) -> Self {
    Self {
      answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
      asked: RefCell::default(),
    }
  }

  pub fn asked(&self) -> Vec<String> {
    self.asked.borrow().clone()
  }
}

impl Prompt for CannedPrompt {
  fn question(&self, query: &str) -> Result<String, CapabilityError> {
    self.asked.borrow_mut().push(query.to_string());
    self.answers.borrow_mut().pop_front().ok_or(CapabilityError::InputClosed)
  }
}
