//! Optional dependency manifest (`install.json`).

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use super::decl::DependencyDecl;

#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("cannot read {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("cannot parse {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },
}

/// Load the ordered list of declarations at `path`.
///
/// A missing file is an empty manifest. A well-formed document that is not an
/// array is ignored with a warning.
pub fn load(path: &Path) -> Result<Vec<DependencyDecl>, ManifestError> {
  if !path.exists() {
    debug!(path = %path.display(), "no dependency manifest");
    return Ok(Vec::new());
  }

  let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  let parse_err = |source| ManifestError::Parse {
    path: path.to_path_buf(),
    source,
  };

  let document: serde_json::Value = serde_json::from_str(&content).map_err(parse_err)?;
  if !document.is_array() {
    warn!(path = %path.display(), "dependency manifest is not an array, ignoring it");
    return Ok(Vec::new());
  }

  let decls: Vec<DependencyDecl> = serde_json::from_value(document).map_err(parse_err)?;
  debug!(path = %path.display(), count = decls.len(), "loaded dependency manifest");
  Ok(decls)
}
