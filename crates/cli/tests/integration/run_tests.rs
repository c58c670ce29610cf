//! `luarunner run`, `check` and `install` against a real root.

use predicates::prelude::*;

use super::common::{TestEnv, path_str};

#[test]
fn run_invokes_script_between_banners() {
  let env = TestEnv::from_fixture("hello.lua");

  env
    .luarunner_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Welcome to luarunner"))
    .stdout(predicate::str::contains("luarunner will now invoke your script"))
    .stdout(predicate::str::contains("script says hi"))
    .stdout(predicate::str::contains("luarunner will now terminate"));

  assert_eq!(env.read_root_file("hello.txt"), "hello from lua");
}

#[test]
fn explicit_run_subcommand_matches_default() {
  let env = TestEnv::from_fixture("hello.lua");

  env.luarunner_cmd().arg("run").assert().success();

  assert!(env.root_file("hello.txt").exists());
}

#[test]
fn manifest_dependencies_are_installed_once() {
  if cfg!(windows) {
    return;
  }

  let env = TestEnv::from_fixture("uses_dependency.lua");
  env.write_file("root/install.json", r#"["left-pad"]"#);

  env.luarunner_cmd().assert().success();
  env.luarunner_cmd().assert().success();

  assert_eq!(env.installs(), vec!["left-pad"]);
  assert_eq!(env.read_root_file("dep.txt"), "left-pad");
}

#[test]
fn missing_root_exits_2_with_mapping_hint() {
  let env = TestEnv::empty();

  env
    .luarunner_cmd()
    .arg("--root")
    .arg(env.temp.path().join("not-mounted"))
    .assert()
    .code(2)
    .stderr(predicate::str::contains("installation root not found"))
    .stderr(predicate::str::contains("-v ~/my-project:"))
    .stderr(predicate::str::contains("will abort"));
}

#[test]
fn missing_script_exits_3() {
  let env = TestEnv::empty();

  env
    .luarunner_cmd()
    .assert()
    .code(3)
    .stderr(predicate::str::contains("lua-script.lua"))
    .stderr(predicate::str::contains("lua_script"));
}

#[test]
fn script_name_from_environment() {
  let env = TestEnv::empty();
  env.write_file("root/deploy.lua", &super::common::fixture_content("hello.lua"));

  env.luarunner_cmd().env("lua_script", "deploy").assert().success();

  assert!(env.root_file("hello.txt").exists());
}

#[test]
fn script_flag_overrides_environment() {
  let env = TestEnv::empty();
  env.write_file("root/flagged.lua", &super::common::fixture_content("hello.lua"));

  env
    .luarunner_cmd()
    .env("lua_script", "does-not-exist")
    .arg("--script")
    .arg("flagged")
    .assert()
    .success();
}

#[test]
fn malformed_manifest_exits_4() {
  let env = TestEnv::from_fixture("hello.lua");
  env.write_file("root/install.json", "[\"left-pad\",");

  env.luarunner_cmd().assert().code(4);

  assert!(!env.root_file("hello.txt").exists());
}

#[test]
fn syntax_error_exits_5_without_installing() {
  let env = TestEnv::from_fixture("syntax_error.lua");
  env.write_file("root/install.json", r#"["left-pad"]"#);

  env
    .luarunner_cmd()
    .assert()
    .code(5)
    .stderr(predicate::str::contains("syntax"));

  assert!(env.installs().is_empty());
}

#[test]
fn missing_entry_point_exits_5() {
  let env = TestEnv::from_fixture("no_entry.lua");

  env
    .luarunner_cmd()
    .assert()
    .code(5)
    .stderr(predicate::str::contains("run function"));
}

#[test]
fn failing_installer_exits_6() {
  let env = TestEnv::from_fixture("hello.lua");
  env.write_file("root/install.json", r#"["left-pad"]"#);

  env
    .luarunner_cmd()
    .arg("--installer")
    .arg("/bin/sh -c false")
    .assert()
    .code(6)
    .stderr(predicate::str::contains("left-pad"));

  assert!(!env.root_file("hello.txt").exists());
}

#[test]
fn install_timeout_is_enforced() {
  if cfg!(windows) {
    return;
  }

  let env = TestEnv::from_fixture("hello.lua");
  env.write_file("root/install.json", r#"["slow"]"#);

  env
    .luarunner_cmd()
    .args(["--installer", "sleep 5", "--install-timeout", "100ms"])
    .assert()
    .code(6)
    .stderr(predicate::str::contains("timed out"));
}

#[test]
fn script_error_exits_7() {
  let env = TestEnv::from_fixture("runtime_error.lua");

  env
    .luarunner_cmd()
    .assert()
    .code(7)
    .stderr(predicate::str::contains("deployment target unreachable"));
}

#[test]
fn answers_are_read_from_stdin() {
  let env = TestEnv::from_fixture("ask.lua");

  env.luarunner_cmd().write_stdin("demo\nyes\n").assert().success();

  let project: serde_json::Value = serde_json::from_str(&env.read_root_file("project.json")).unwrap();
  assert_eq!(project["name"], "demo");
}

#[test]
fn check_lists_manifest_without_side_effects() {
  let env = TestEnv::from_fixture("hello.lua");
  env.write_file("root/install.json", r#"["left-pad", {"name": "lpeg", "path": "tools"}]"#);

  env
    .luarunner_cmd()
    .arg("check")
    .assert()
    .success()
    .stdout(predicate::str::contains("left-pad"))
    .stdout(predicate::str::contains("lpeg → tools"));

  assert!(env.installs().is_empty());
  assert!(!env.root_file("hello.txt").exists());
}

#[test]
fn check_json_output() {
  let env = TestEnv::from_fixture("hello.lua");
  env.write_file("root/install.json", r#"["left-pad"]"#);

  let output = env.luarunner_cmd().args(["check", "--format", "json"]).output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["declarations"][0]["name"], "left-pad");
  assert_eq!(report["script"], path_str(&env.root_file("lua-script.lua")));
}

#[test]
fn install_subcommand_uses_subpath() {
  if cfg!(windows) {
    return;
  }

  let env = TestEnv::empty();

  env
    .luarunner_cmd()
    .args(["install", "inspect", "--path", "vendor"])
    .assert()
    .success()
    .stdout(predicate::str::contains("inspect installed"));

  assert!(env.root_file("vendor/lua_modules/inspect/init.lua").is_file());

  env
    .luarunner_cmd()
    .args(["install", "inspect", "--path", "vendor"])
    .assert()
    .success()
    .stdout(predicate::str::contains("already installed"));
  assert_eq!(env.installs(), vec!["inspect"]);
}
