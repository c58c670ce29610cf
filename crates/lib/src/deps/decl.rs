//! Dependency declarations and their lookup keys.

use serde::{Deserialize, Serialize};

/// Prefix of a scoped package name (`@scope/name`). Also separates a version pin.
pub const SCOPE_MARKER: char = '@';

/// A dependency the script needs, as written in the manifest or passed to `install_module`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDecl")]
pub struct DependencyDecl {
  /// Install specifier handed to the installer verbatim
  pub name: String,
  /// Installation subpath under the root
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,
}

impl DependencyDecl {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      path: None,
    }
  }

  pub fn with_path(mut self, path: impl Into<String>) -> Self {
    self.path = Some(path.into());
    self
  }

  pub fn lookup_key(&self) -> &str {
    lookup_key(&self.name)
  }
}

/// Manifest entries are either a bare name or `{ "name": ..., "path": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecl {
  Name(String),
  Detailed {
    name: String,
    #[serde(default)]
    path: Option<String>,
  },
}

impl From<RawDecl> for DependencyDecl {
  fn from(raw: RawDecl) -> Self {
    match raw {
      RawDecl::Name(name) => Self::new(name),
      RawDecl::Detailed { name, path } => Self { name, path },
    }
  }
}

/// Identity used to decide whether a dependency is already installed.
///
/// Scoped names keep the scope and the first segment after it (`@s/n`);
/// other names keep everything before the first version pin or path
/// separator. Version pins and trailing subpaths never take part.
pub fn lookup_key(name: &str) -> &str {
  match name.strip_prefix(SCOPE_MARKER) {
    Some(rest) => {
      let unpinned = rest.split(SCOPE_MARKER).next().unwrap_or_default();
      let end = match unpinned.find('/') {
        Some(slash) => unpinned[slash + 1..]
          .find('/')
          .map_or(unpinned.len(), |next| slash + 1 + next),
        None => unpinned.len(),
      };
      &name[..1 + end]
    }
    None => {
      let end = name.find([SCOPE_MARKER, '/']).unwrap_or(name.len());
      &name[..end]
    }
  }
}
