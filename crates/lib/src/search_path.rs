//! Module search path state.
//!
//! Lua resolves `require` through `package.path` and `package.cpath`. The
//! runner keeps its own copy of both in an [`ExecutionEnv`] so every extension
//! is an explicit call, and pushes the result into a VM with
//! [`ModulePaths::apply`]. Child processes receive the same value through
//! their environment; the runner's own process environment is never touched.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use mlua::prelude::*;
use tracing::{info, warn};

use crate::consts::{LUA_CPATH_VARS, LUA_PATH_VARS, LUA_VERSION, STORE_DIR};

/// Snapshot of `package.path` and `package.cpath`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulePaths {
  pub path: String,
  pub cpath: String,
}

impl ModulePaths {
  pub fn new(path: impl Into<String>, cpath: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      cpath: cpath.into(),
    }
  }

  /// Read the paths a VM is currently resolving modules with.
  ///
  /// A fresh VM has already folded `LUA_PATH`/`LUA_CPATH` (and their `_5_4`
  /// variants) into these values.
  pub fn current(lua: &Lua) -> LuaResult<Self> {
    let package: LuaTable = lua.globals().get("package")?;
    Ok(Self {
      path: package.get("path")?,
      cpath: package.get("cpath")?,
    })
  }

  /// Make `lua` resolve modules with these paths.
  pub fn apply(&self, lua: &Lua) -> LuaResult<()> {
    let package: LuaTable = lua.globals().get("package")?;
    package.set("path", self.path.as_str())?;
    package.set("cpath", self.cpath.as_str())?;
    Ok(())
  }

  /// Environment variables a child process needs to see the same paths.
  pub fn env_vars(&self) -> Vec<(&'static str, String)> {
    LUA_PATH_VARS
      .iter()
      .map(|var| (*var, self.path.clone()))
      .chain(LUA_CPATH_VARS.iter().map(|var| (*var, self.cpath.clone())))
      .collect()
  }

  /// Ask `lua` whether it can already provide `name`.
  ///
  /// Checks `package.loaded`, then `package.preload`, then runs the VM's own
  /// `package.searchpath` over these paths (`path` first, then `cpath`).
  pub fn locate(&self, lua: &Lua, name: &str) -> LuaResult<Option<Located>> {
    let package: LuaTable = lua.globals().get("package")?;

    let loaded: LuaTable = package.get("loaded")?;
    if !loaded.get::<LuaValue>(name)?.is_nil() {
      return Ok(Some(Located::Loaded));
    }

    let preload: LuaTable = package.get("preload")?;
    if !preload.get::<LuaValue>(name)?.is_nil() {
      return Ok(Some(Located::Preloaded));
    }

    let searchpath: LuaFunction = package.get("searchpath")?;
    for templates in [&self.path, &self.cpath] {
      // (filename) on success, (nil, message) otherwise
      let (found, _): (Option<String>, Option<String>) = searchpath.call((name, templates.as_str()))?;
      if let Some(found) = found {
        return Ok(Some(Located::File(PathBuf::from(found))));
      }
    }
    Ok(None)
  }

  /// Whether `path` already lists `root` as a distinct entry.
  pub fn contains_root(&self, root: &Path) -> bool {
    let primary = primary_entry(root);
    has_entry(&self.path, &primary)
  }

  fn prepend(&mut self, root: &Path) {
    self.path = prepend_entries(&path_entries(root), &self.path);
    self.cpath = prepend_entries(&cpath_entries(root), &self.cpath);
  }
}

/// How the Lua runtime can already provide a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
  /// Already in `package.loaded`, standard libraries included
  Loaded,
  /// Has a loader in `package.preload`
  Preloaded,
  /// `package.searchpath` resolved it to this file
  File(PathBuf),
}

/// Process-wide resolution state owned by the bootstrap.
#[derive(Debug, Clone)]
pub struct ExecutionEnv {
  base_root: PathBuf,
  paths: ModulePaths,
  extended: BTreeSet<PathBuf>,
}

impl ExecutionEnv {
  pub fn new(base_root: impl Into<PathBuf>, paths: ModulePaths) -> Self {
    Self {
      base_root: base_root.into(),
      paths,
      extended: BTreeSet::new(),
    }
  }

  pub fn paths(&self) -> &ModulePaths {
    &self.paths
  }

  /// Installation root for a dependency: the base root, optionally extended by `subpath`.
  ///
  /// `subpath` always lands under the base root, whether or not it starts with a separator.
  pub fn dependency_root(&self, subpath: Option<&str>) -> PathBuf {
    match subpath.map(|s| s.trim_start_matches(['/', '\\'])) {
      Some(sub) if !sub.is_empty() => self.base_root.join(sub),
      _ => self.base_root.clone(),
    }
  }

  /// Whether `root` has been passed through [`ExecutionEnv::ensure`].
  pub fn is_extended(&self, root: &Path) -> bool {
    self.extended.contains(root)
  }

  /// Make sure `root` is part of the search path exactly once.
  ///
  /// Creates the root's dependency store when missing and prepends the root's
  /// entries unless `package.path` already lists it. Repeated calls with the
  /// same root change nothing.
  pub fn ensure(&mut self, root: &Path) -> &ModulePaths {
    let store = store_dir(root);
    if !store.is_dir()
      && let Err(e) = fs::create_dir_all(&store)
    {
      warn!(store = %store.display(), error = %e, "cannot create dependency store");
    }

    if !self.paths.contains_root(root) {
      self.paths.prepend(root);
      info!(root = %root.display(), path = %self.paths.path, "module search path updated");
    }
    self.extended.insert(root.to_path_buf());

    &self.paths
  }
}

/// `<root>/lua_modules`
pub fn store_dir(root: &Path) -> PathBuf {
  root.join(STORE_DIR)
}

/// `<root>/lib/luarocks/rocks-5.4`, where a luarocks `--tree <root>` install
/// keeps one directory per installed rock.
pub fn rocks_dir(root: &Path) -> PathBuf {
  root
    .join("lib")
    .join("luarocks")
    .join(format!("rocks-{}", LUA_VERSION))
}

/// `package.path` templates contributed by an installation root, in priority order.
pub fn path_entries(root: &Path) -> Vec<String> {
  let store = store_dir(root);
  let tree = root.join("share").join("lua").join(LUA_VERSION);
  vec![
    template(&store, "?.lua"),
    template(&store, "?/init.lua"),
    template(&tree, "?.lua"),
    template(&tree, "?/init.lua"),
  ]
}

/// `package.cpath` templates contributed by an installation root.
pub fn cpath_entries(root: &Path) -> Vec<String> {
  let ext = if cfg!(windows) { "?.dll" } else { "?.so" };
  let store = store_dir(root);
  let tree = root.join("lib").join("lua").join(LUA_VERSION);
  vec![template(&store, ext), template(&tree, ext)]
}

fn primary_entry(root: &Path) -> String {
  template(&store_dir(root), "?.lua")
}

fn template(dir: &Path, pattern: &str) -> String {
  format!("{}/{}", dir.to_string_lossy(), pattern)
}

fn has_entry(value: &str, entry: &str) -> bool {
  value.split(';').any(|e| e == entry)
}

fn prepend_entries(entries: &[String], current: &str) -> String {
  let head = entries.join(";");
  if current.is_empty() {
    head
  } else {
    format!("{};{}", head, current)
  }
}
