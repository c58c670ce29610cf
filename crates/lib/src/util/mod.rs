//! Helpers shared by unit tests.

pub mod testutil;
