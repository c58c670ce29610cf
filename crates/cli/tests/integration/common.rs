//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Installer stand-in: creates `<store>/<package>/init.lua` and appends the
/// package to `installs.log` in the working directory of the test.
const FAKE_INSTALLER: &str = r#"#!/bin/sh
store="$1"
package="$2"
echo "$package" >> "$LOG"
mkdir -p "$store/$package"
printf 'return { marker = "%s" }\n' "$package" > "$store/$package/init.lua"
"#;

/// Isolated installation root.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Root whose `lua-script.lua` is a copy of the fixture.
  pub fn from_fixture(name: &str) -> Self {
    let env = Self::empty();
    env.write_file("root/lua-script.lua", &fixture_content(name));
    env
  }

  /// Root directory exists but holds nothing.
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("root")).unwrap();
    std::fs::write(temp.path().join("installer.sh"), FAKE_INSTALLER).unwrap();
    Self { temp }
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn root_path(&self) -> PathBuf {
    let p = self.temp.path().join("root");
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn root_file(&self, relative: &str) -> PathBuf {
    self.root_path().join(relative)
  }

  pub fn read_root_file(&self, relative: &str) -> String {
    std::fs::read_to_string(self.root_file(relative)).unwrap()
  }

  /// Packages the fake installer was asked for, in order.
  pub fn installs(&self) -> Vec<String> {
    std::fs::read_to_string(self.log_path())
      .map(|log| log.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }

  fn log_path(&self) -> PathBuf {
    self.temp.path().join("installs.log")
  }

  fn installer_path(&self) -> PathBuf {
    self.temp.path().join("installer.sh")
  }

  /// Get a pre-configured Command for the luarunner binary.
  ///
  /// Points the runner at the isolated root and the fake installer, and
  /// clears variables a developer may have set.
  pub fn luarunner_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("luarunner");
    cmd.env("LUARUNNER_ROOT", self.root_path());
    cmd.env(
      "LUARUNNER_INSTALLER",
      format!("/bin/sh {} {{store}} {{package}}", self.installer_path().display()),
    );
    cmd.env("LOG", self.log_path());
    cmd.env_remove("lua_script");
    cmd.env_remove("LUARUNNER_INSTALL_TIMEOUT");
    cmd.env_remove("LUARUNNER_SHELL_TIMEOUT");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}

pub fn path_str(path: &Path) -> String {
  path.display().to_string()
}
