//! Well-known names and locations shared by the library and the CLI.

pub const APP_NAME: &str = "luarunner";

/// Installation root expected to be mounted into the container.
pub const DEFAULT_ROOT: &str = "/lua";

/// Overrides [`DEFAULT_ROOT`] outside of a container.
pub const ROOT_ENV_VAR: &str = "LUARUNNER_ROOT";

/// Selects the script's base name.
pub const SCRIPT_ENV_VAR: &str = "lua_script";

pub const DEFAULT_SCRIPT_NAME: &str = "lua-script";

pub const SCRIPT_EXTENSION: &str = "lua";

/// Optional dependency manifest, relative to the installation root.
pub const MANIFEST_FILE: &str = "install.json";

/// Dependency store directory, relative to an installation root.
pub const STORE_DIR: &str = "lua_modules";

pub const INSTALLER_ENV_VAR: &str = "LUARUNNER_INSTALLER";

pub const INSTALL_TIMEOUT_ENV_VAR: &str = "LUARUNNER_INSTALL_TIMEOUT";

pub const SHELL_TIMEOUT_ENV_VAR: &str = "LUARUNNER_SHELL_TIMEOUT";

/// Placeholders: `{package}`, `{root}`, `{store}`.
pub const DEFAULT_INSTALLER: &str = "luarocks install --tree {root} {package}";

/// Lua version segment used by luarocks tree layouts.
pub const LUA_VERSION: &str = "5.4";

/// Search-path variables, most specific first, as Lua itself consults them.
pub const LUA_PATH_VARS: [&str; 2] = ["LUA_PATH_5_4", "LUA_PATH"];
pub const LUA_CPATH_VARS: [&str; 2] = ["LUA_CPATH_5_4", "LUA_CPATH"];
