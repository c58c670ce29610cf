//! CLI integration tests.

mod common;
mod run_tests;
