//! The user script: compilation, entry point lookup and invocation.
//!
//! Loading happens in two steps so dependency resolution can sit between
//! them. [`ScriptModule::load`] only compiles, which is enough to reject a
//! script with a syntax error before anything gets installed.
//! [`ScriptModule::entry_point`] then runs the chunk's top level, once the
//! search path includes every declared dependency.

use std::fs;
use std::path::{Path, PathBuf};

use mlua::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::lua::loaders::compile_chunk;

/// Field looked up when the chunk returns a table.
pub const ENTRY_FIELD: &str = "run";

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("cannot read {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("syntax error in {}: {message}", path.display())]
  Syntax { path: PathBuf, message: String },

  #[error("error while loading {}: {message}", path.display())]
  Init { path: PathBuf, message: String },

  #[error(
    "{} must return a function or a table with a '{}' function (got {kind})",
    path.display(),
    ENTRY_FIELD
  )]
  NoEntryPoint { path: PathBuf, kind: String },
}

/// Error raised by the script while its entry point was running.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RuntimeError {
  pub message: String,
}

/// A compiled, not yet evaluated, script.
#[derive(Debug)]
pub struct ScriptModule {
  path: PathBuf,
  chunk: LuaFunction,
}

/// The function a script exposes to the runner.
#[derive(Debug, Clone)]
pub struct EntryPoint(LuaFunction);

impl ScriptModule {
  /// Read and compile the script at `path`.
  pub fn load(lua: &Lua, path: &Path) -> Result<Self, LoadError> {
    let source = fs::read_to_string(path).map_err(|source| LoadError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let chunk = compile_chunk(lua, path, &source).map_err(|e| LoadError::Syntax {
      path: path.to_path_buf(),
      message: syntax_message(&e),
    })?;

    debug!(script = %path.display(), "script compiled");
    Ok(Self {
      path: path.to_path_buf(),
      chunk,
    })
  }

  /// Run the chunk's top level and pick out its entry point.
  ///
  /// Accepts a returned function, or a returned table whose `run` field is a
  /// function.
  pub fn entry_point(&self) -> Result<EntryPoint, LoadError> {
    let exported = self.chunk.call::<LuaValue>(()).map_err(|e| LoadError::Init {
      path: self.path.clone(),
      message: e.to_string(),
    })?;

    let no_entry = |kind: &str| LoadError::NoEntryPoint {
      path: self.path.clone(),
      kind: kind.to_string(),
    };

    match exported {
      LuaValue::Function(f) => Ok(EntryPoint(f)),
      LuaValue::Table(t) => match t.get::<LuaValue>(ENTRY_FIELD) {
        Ok(LuaValue::Function(f)) => Ok(EntryPoint(f)),
        Ok(other) => Err(no_entry(&format!("table with '{}' of type {}", ENTRY_FIELD, other.type_name()))),
        Err(e) => Err(LoadError::Init {
          path: self.path.clone(),
          message: e.to_string(),
        }),
      },
      other => Err(no_entry(other.type_name())),
    }
  }
}

/// Call the entry point with the capability table as its only argument.
///
/// Return values are ignored; a raised error becomes a [`RuntimeError`].
pub fn dispatch(entry: &EntryPoint, capabilities: LuaTable) -> Result<(), RuntimeError> {
  entry.0.call::<()>(capabilities).map_err(|e| RuntimeError {
    message: e.to_string(),
  })
}

fn syntax_message(err: &LuaError) -> String {
  match err {
    LuaError::SyntaxError { message, .. } => message.clone(),
    other => other.to_string(),
  }
}
