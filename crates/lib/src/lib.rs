//! luarunner-lib: bootstrap a Lua script inside a prepared container.
//!
//! The runner checks that the installation root is mounted and holds the
//! script, installs the dependencies listed in the optional `install.json`,
//! extends the module search path so `require` finds them, and finally calls
//! the script's entry point with a table of host services.
//!
//! - [`bootstrap`]: the fixed startup sequence ([`bootstrap::Runner`])
//! - [`deps`]: dependency declarations, installers and resolution
//! - [`search_path`]: `package.path` / `package.cpath` state
//! - [`script`]: compiling, evaluating and invoking the script
//! - [`capabilities`]: services handed to the script

pub mod bootstrap;
pub mod capabilities;
pub mod config;
pub mod consts;
pub mod deps;
pub mod env;
pub mod error;
pub mod lua;
pub mod process;
pub mod script;
pub mod search_path;
#[cfg(test)]
mod util;

pub use bootstrap::{PreparedRun, RunSummary, Runner};
pub use config::RunnerConfig;
pub use error::RunnerError;
