//! Dependency resolution: decide whether a declaration is satisfied, install it if not.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use mlua::Lua;
use tracing::info;

use super::decl::{DependencyDecl, lookup_key};
use super::installer::{InstallError, InstallRequest, Installer};
use crate::search_path::{ExecutionEnv, Located, rocks_dir, store_dir};

/// Where an already-present dependency was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentIn {
  /// The Lua runtime can already provide the lookup key
  Runtime(Located),
  /// The dependency store has a directory named after the lookup key
  Store(PathBuf),
  /// A luarocks tree under the root has a rock named after the lookup key
  Rock(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  Installed { key: String },
  AlreadyPresent { key: String, found: PresentIn },
}

impl Resolution {
  pub fn key(&self) -> &str {
    match self {
      Resolution::Installed { key } | Resolution::AlreadyPresent { key, .. } => key,
    }
  }

  pub fn was_installed(&self) -> bool {
    matches!(self, Resolution::Installed { .. })
  }
}

impl fmt::Display for Resolution {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Resolution::Installed { key } => write!(f, "{} installed", key),
      Resolution::AlreadyPresent { key, .. } => write!(f, "{} already installed", key),
    }
  }
}

/// A declaration together with how it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
  pub decl: DependencyDecl,
  pub resolution: Resolution,
}

/// Owns the execution environment and the installer used to satisfy dependencies.
pub struct Resolver {
  env: ExecutionEnv,
  installer: Box<dyn Installer>,
}

impl Resolver {
  pub fn new(env: ExecutionEnv, installer: Box<dyn Installer>) -> Self {
    Self { env, installer }
  }

  pub fn env(&self) -> &ExecutionEnv {
    &self.env
  }

  /// Make `name` available, installing it under the (sub)root when needed.
  ///
  /// The installer receives the full specifier; satisfaction is judged on the
  /// lookup key alone, asking `lua` first and the root's directories second.
  pub fn resolve(&mut self, lua: &Lua, name: &str, subpath: Option<&str>) -> Result<Resolution, InstallError> {
    let key = lookup_key(name);
    if key.is_empty() || key == "@" {
      return Err(InstallError::InvalidName(name.to_string()));
    }

    let root = self.env.dependency_root(subpath);
    let store = store_dir(&root);
    fs::create_dir_all(&store).map_err(|source| InstallError::Store {
      path: store.clone(),
      source,
    })?;
    self.env.ensure(&root);

    if let Some(found) = self.present(lua, key, &root, &store)? {
      info!(package = %name, found = ?found, "already installed");
      return Ok(Resolution::AlreadyPresent {
        key: key.to_string(),
        found,
      });
    }

    info!(package = %name, root = %root.display(), "installing");
    self.installer.install(&InstallRequest {
      package: name,
      root: &root,
      store: &store,
      paths: self.env.paths(),
    })?;
    info!(package = %name, "installed");

    Ok(Resolution::Installed { key: key.to_string() })
  }

  /// Resolve declarations in order, stopping at the first failure.
  pub fn resolve_all(&mut self, lua: &Lua, decls: &[DependencyDecl]) -> Result<Vec<Resolved>, InstallError> {
    decls
      .iter()
      .map(|decl| {
        let resolution = self.resolve(lua, &decl.name, decl.path.as_deref())?;
        Ok(Resolved {
          decl: decl.clone(),
          resolution,
        })
      })
      .collect()
  }

  fn present(&self, lua: &Lua, key: &str, root: &Path, store: &Path) -> Result<Option<PresentIn>, InstallError> {
    let located = self.env.paths().locate(lua, key).map_err(|e| InstallError::Lookup {
      package: key.to_string(),
      message: e.to_string(),
    })?;
    if let Some(located) = located {
      return Ok(Some(PresentIn::Runtime(located)));
    }

    let local = store.join(key);
    if local.is_dir() {
      return Ok(Some(PresentIn::Store(local)));
    }

    let rock = rocks_dir(root).join(key);
    if rock.is_dir() {
      return Ok(Some(PresentIn::Rock(rock)));
    }
    Ok(None)
  }
}
