//! Services handed to the script's entry point.
//!
//! The script receives one table with exactly the services named in
//! [`CAPABILITY_NAMES`]. The table is read-only on the Lua side.
//!
//! - [`prompt`] - `ask.question` / `ask.confirm`
//! - [`fs`] - filesystem helpers
//! - [`transform`] - JSON templates
//! - [`shell`] - shell commands
//! - [`lua`] - the Lua table itself

pub mod fs;
pub mod lua;
pub mod prompt;
pub mod shell;
pub mod transform;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use thiserror::Error;

use crate::deps::Resolver;
use crate::process::ProcessError;

pub use prompt::{Prompt, TerminalPrompt};
pub use shell::ShellRunner;
pub use transform::{TransformError, transform};

/// Keys of the capability table, in the order scripts usually meet them.
pub const CAPABILITY_NAMES: [&str; 7] = ["ask", "fs", "install_module", "is_numeric", "uuid", "transform", "shell"];

#[derive(Debug, Error)]
pub enum CapabilityError {
  #[error("{}: {source}", path.display())]
  Io { path: PathBuf, source: std::io::Error },

  #[error("invalid JSON in {}: {source}", path.display())]
  Json { path: PathBuf, source: serde_json::Error },

  #[error("prompt failed: {0}")]
  Prompt(std::io::Error),

  #[error("no more input to answer the prompt")]
  InputClosed,

  #[error("command '{command}' failed ({})", code.map_or("terminated by signal".to_string(), |c| format!("exit code {}", c)))]
  CommandFailed { command: String, code: Option<i32> },

  #[error(transparent)]
  Process(#[from] ProcessError),

  #[error(transparent)]
  Transform(#[from] TransformError),
}

/// Everything the capability table is built from.
pub struct Capabilities {
  prompt: Rc<dyn Prompt>,
  resolver: Rc<RefCell<Resolver>>,
  shell: ShellRunner,
}

impl Capabilities {
  /// `resolver` is shared with the bootstrap so scripts extend the same search path.
  pub fn new(prompt: Rc<dyn Prompt>, resolver: Rc<RefCell<Resolver>>, shell: ShellRunner) -> Self {
    Self {
      prompt,
      resolver,
      shell,
    }
  }
}

/// Whether `text`, ignoring surrounding whitespace, is a finite number.
pub fn is_numeric(text: &str) -> bool {
  text.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

/// A random (v4) UUID in hyphenated lowercase form.
pub fn uuid() -> String {
  ::uuid::Uuid::new_v4().to_string()
}
