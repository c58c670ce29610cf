use mlua::prelude::*;
use tracing::debug;

use crate::consts::APP_NAME;

/// Create a Lua 5.4 VM with the standard libraries loaded.
///
/// `package.path` and `package.cpath` keep whatever the VM derived from
/// `LUA_PATH`/`LUA_CPATH`; the runner prepends its own roots later.
/// A `_RUNNER` global carries the runner name and version for scripts that
/// want to report them.
pub fn create_runtime() -> LuaResult<Lua> {
  let lua = Lua::new();

  let runner = lua.create_table()?;
  runner.set("name", APP_NAME)?;
  runner.set("version", env!("CARGO_PKG_VERSION"))?;
  lua.globals().set("_RUNNER", runner)?;

  debug!(version = %env!("CARGO_PKG_VERSION"), "lua runtime created");
  Ok(lua)
}
