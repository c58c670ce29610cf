//! Library integration tests: the full bootstrap against a temporary root.

mod common;
