//! The capability table as the script sees it.

use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;
use serde_json::Value;

use super::{Capabilities, fs, is_numeric, transform, uuid};

impl Capabilities {
  /// Build the read-only table passed to the entry point.
  pub fn to_lua(&self, lua: &Lua) -> LuaResult<LuaTable> {
    let services = lua.create_table()?;
    services.set("ask", self.ask_table(lua)?)?;
    services.set("fs", fs_table(lua)?)?;
    services.set("install_module", self.install_module_fn(lua)?)?;
    services.set(
      "is_numeric",
      lua.create_function(|_, value: LuaValue| {
        Ok(match value {
          LuaValue::Integer(_) => true,
          LuaValue::Number(n) => n.is_finite(),
          LuaValue::String(s) => is_numeric(&s.to_str()?),
          _ => false,
        })
      })?,
    )?;
    services.set("uuid", lua.create_function(|_, ()| Ok(uuid()))?)?;
    services.set(
      "transform",
      lua.create_function(|lua, (template, data): (LuaValue, LuaValue)| {
        let template: Value = lua.from_value(template)?;
        let data: Value = lua.from_value(data)?;
        let out = transform(&template, &data).map_err(LuaError::external)?;
        to_lua_value(lua, &out)
      })?,
    )?;
    services.set("shell", self.shell_fn(lua)?)?;

    read_only(lua, services, "capabilities")
  }

  fn ask_table(&self, lua: &Lua) -> LuaResult<LuaTable> {
    let ask = lua.create_table()?;

    let prompt = Rc::clone(&self.prompt);
    ask.set(
      "question",
      lua.create_function(move |_, query: String| prompt.question(&query).map_err(LuaError::external))?,
    )?;

    let prompt = Rc::clone(&self.prompt);
    ask.set(
      "confirm",
      lua.create_function(move |_, query: String| prompt.confirm(&query).map_err(LuaError::external))?,
    )?;

    read_only(lua, ask, "ask")
  }

  fn install_module_fn(&self, lua: &Lua) -> LuaResult<LuaFunction> {
    let resolver = Rc::clone(&self.resolver);
    lua.create_function(move |lua, (name, path): (String, Option<String>)| {
      let mut resolver = resolver.try_borrow_mut().map_err(LuaError::external)?;
      let resolution = resolver.resolve(lua, &name, path.as_deref()).map_err(LuaError::external)?;
      resolver.env().paths().apply(lua)?;
      Ok(if resolution.was_installed() { "installed" } else { "present" })
    })
  }

  fn shell_fn(&self, lua: &Lua) -> LuaResult<LuaFunction> {
    let resolver = Rc::clone(&self.resolver);
    let shell = self.shell;
    lua.create_function(move |_, cmd: String| {
      let paths = resolver.try_borrow().map_err(LuaError::external)?.env().paths().clone();
      shell.run(&cmd, &paths).map_err(LuaError::external)
    })
  }
}

fn fs_table(lua: &Lua) -> LuaResult<LuaTable> {
  let t = lua.create_table()?;

  t.set("exists", lua.create_function(|_, path: String| Ok(fs::exists(Path::new(&path))))?)?;
  t.set(
    "read_file",
    lua.create_function(|_, path: String| fs::read_file(Path::new(&path)).map_err(LuaError::external))?,
  )?;
  t.set(
    "write_file",
    lua.create_function(|_, (path, content): (String, String)| {
      fs::write_file(Path::new(&path), &content).map_err(LuaError::external)
    })?,
  )?;
  t.set(
    "read_json",
    lua.create_function(|lua, path: String| {
      let value = fs::read_json(Path::new(&path)).map_err(LuaError::external)?;
      to_lua_value(lua, &value)
    })?,
  )?;
  t.set(
    "ensure_dir",
    lua.create_function(|_, path: String| fs::ensure_dir(Path::new(&path)).map_err(LuaError::external))?,
  )?;
  t.set(
    "remove",
    lua.create_function(|_, path: String| fs::remove(Path::new(&path)).map_err(LuaError::external))?,
  )?;
  t.set(
    "list",
    lua.create_function(|_, path: String| fs::list(Path::new(&path)).map_err(LuaError::external))?,
  )?;
  t.set(
    "get_directories",
    lua.create_function(|_, path: String| fs::get_directories(Path::new(&path)).map_err(LuaError::external))?,
  )?;
  t.set(
    "create_json_file",
    lua.create_function(|lua, (value, path): (LuaValue, String)| {
      let value: Value = lua.from_value(value)?;
      fs::create_json_file(&value, Path::new(&path)).map_err(LuaError::external)
    })?,
  )?;
  t.set(
    "create_file",
    lua.create_function(|_, (lines, path): (Vec<String>, String)| {
      fs::create_file(&lines, Path::new(&path)).map_err(LuaError::external)
    })?,
  )?;

  read_only(lua, t, "fs")
}

/// JSON `null` becomes `nil` rather than a sentinel value.
fn to_lua_value(lua: &Lua, value: &Value) -> LuaResult<LuaValue> {
  let options = LuaSerializeOptions::new()
    .serialize_none_to_null(false)
    .serialize_unit_to_null(false);
  lua.to_value_with(value, options)
}

/// Empty proxy whose metatable reads from `inner`, rejects writes and
/// enumerates `inner` under `pairs`.
fn read_only(lua: &Lua, inner: LuaTable, label: &'static str) -> LuaResult<LuaTable> {
  let proxy = lua.create_table()?;
  let mt = lua.create_table()?;

  mt.set("__index", inner.clone())?;
  mt.set(
    "__newindex",
    lua.create_function(move |_, (_proxy, key, _value): (LuaTable, LuaValue, LuaValue)| {
      Err::<(), _>(LuaError::runtime(format!(
        "{} table is read-only (cannot set '{}')",
        label,
        key.to_string()?
      )))
    })?,
  )?;
  mt.set(
    "__pairs",
    lua.create_function(move |lua, _proxy: LuaTable| {
      let next: LuaFunction = lua.globals().get("next")?;
      Ok((next, inner.clone(), LuaValue::Nil))
    })?,
  )?;
  mt.set("__metatable", label)?;

  proxy.set_metatable(Some(mt))?;
  Ok(proxy)
}
