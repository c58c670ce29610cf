//! Script chunk loading with `__dir` injection.
//!
//! The chunk runs in its own environment table holding `__dir`, the directory
//! of the file. Reads fall through to `_G` and writes land in `_G`, so
//! globals behave as in a plain chunk.

use std::path::Path;

use mlua::prelude::*;

/// Compile `source` as the chunk for `path`, without running it.
///
/// Syntax errors surface here as [`LuaError::SyntaxError`].
pub fn compile_chunk(lua: &Lua, path: &Path, source: &str) -> LuaResult<LuaFunction> {
  let dir = path.parent().unwrap_or(Path::new(".")).to_string_lossy().into_owned();

  let env = lua.create_table()?;
  env.set("__dir", dir)?;

  let mt = lua.create_table()?;
  mt.set("__index", lua.globals())?;
  mt.set("__newindex", lua.globals())?;
  env.set_metatable(Some(mt))?;

  lua
    .load(source)
    .set_name(format!("@{}", path.display()))
    .set_environment(env)
    .into_function()
}
