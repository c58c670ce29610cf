//! Third-party dependencies of the script.
//!
//! - [`decl`] - declarations and lookup keys
//! - [`manifest`] - the optional `install.json`
//! - [`installer`] - external installer invocation
//! - [`resolver`] - satisfaction test and installation

pub mod decl;
pub mod installer;
pub mod manifest;
pub mod resolver;

pub use decl::{DependencyDecl, lookup_key};
pub use installer::{CommandInstaller, InstallError, InstallRequest, Installer};
pub use manifest::ManifestError;
pub use resolver::{PresentIn, Resolution, Resolved, Resolver};
