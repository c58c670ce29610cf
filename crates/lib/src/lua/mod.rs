//! Lua VM setup and chunk loading.
//!
//! - [`runtime`] - VM creation
//! - [`loaders`] - Script chunks compiled with a per-file `__dir`

pub mod loaders;
pub mod runtime;
