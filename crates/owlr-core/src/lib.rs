#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Load-path index and module resolution for Opal source trees.
//!
//! Enumerating load paths means shelling out to the Ruby toolchain, which
//! costs anywhere from hundreds of milliseconds to seconds. This crate keeps
//! a persistent on-disk index of load paths and their file entries, rebuilt
//! only when the dependency lock file changes, and resolves module
//! specifiers against it with a live-filesystem fallback for files created
//! after the index was built.

pub mod cache;
pub mod config;
pub mod error;
pub mod hook;
pub mod index;
pub mod loadpaths;
pub mod resolver;
pub mod version;

pub use cache::{CacheData, CacheState, CacheStore, CacheWarning};
pub use config::Config;
pub use error::Error;
pub use hook::{Outcome, ResolveRequest, ResolverHook};
pub use loadpaths::{BundlerEnumerator, LoadPathsSource};
pub use resolver::Resolver;
pub use version::VERSION;
