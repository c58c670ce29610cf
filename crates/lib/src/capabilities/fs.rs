//! Filesystem helpers exposed to scripts as `fs`.
//!
//! Writers create missing parent directories. Listings are sorted by name.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use super::CapabilityError;

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> CapabilityError + '_ {
  move |source| CapabilityError::Io {
    path: path.to_path_buf(),
    source,
  }
}

fn ensure_parent(path: &Path) -> Result<(), CapabilityError> {
  match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).map_err(io_err(parent)),
    _ => Ok(()),
  }
}

pub fn exists(path: &Path) -> bool {
  path.exists()
}

pub fn read_file(path: &Path) -> Result<String, CapabilityError> {
  fs::read_to_string(path).map_err(io_err(path))
}

pub fn write_file(path: &Path, content: &str) -> Result<(), CapabilityError> {
  ensure_parent(path)?;
  fs::write(path, content).map_err(io_err(path))
}

pub fn read_json(path: &Path) -> Result<Value, CapabilityError> {
  let content = read_file(path)?;
  serde_json::from_str(&content).map_err(|source| CapabilityError::Json {
    path: path.to_path_buf(),
    source,
  })
}

pub fn ensure_dir(path: &Path) -> Result<(), CapabilityError> {
  fs::create_dir_all(path).map_err(io_err(path))
}

/// Remove a file or a directory tree. Removing something absent succeeds.
pub fn remove(path: &Path) -> Result<(), CapabilityError> {
  let result = match fs::symlink_metadata(path) {
    Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
    Ok(_) => fs::remove_file(path),
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
    Err(e) => Err(e),
  };
  result.map_err(io_err(path))
}

/// Names of all entries in `path`.
pub fn list(path: &Path) -> Result<Vec<String>, CapabilityError> {
  entries(path, |_| true)
}

/// Names of the subdirectories of `path`.
pub fn get_directories(path: &Path) -> Result<Vec<String>, CapabilityError> {
  entries(path, |entry| entry.file_type().is_ok_and(|t| t.is_dir()))
}

fn entries(path: &Path, keep: impl Fn(&fs::DirEntry) -> bool) -> Result<Vec<String>, CapabilityError> {
  let mut names = Vec::new();
  for entry in fs::read_dir(path).map_err(io_err(path))? {
    let entry = entry.map_err(io_err(path))?;
    if keep(&entry) {
      names.push(entry.file_name().to_string_lossy().into_owned());
    }
  }
  names.sort();
  Ok(names)
}

/// Write `value` as two-space indented JSON followed by a newline.
pub fn create_json_file(value: &Value, path: &Path) -> Result<(), CapabilityError> {
  let mut content = serde_json::to_string_pretty(value).map_err(|source| CapabilityError::Json {
    path: path.to_path_buf(),
    source,
  })?;
  content.push('\n');
  write_file(path, &content)
}

/// Write `lines` joined with newlines.
pub fn create_file(lines: &[String], path: &Path) -> Result<(), CapabilityError> {
  write_file(path, &lines.join("\n"))
}
