// src/exec/mod.rs

//! Execution dispatch layer.
//!
//! This module decides how a process-execution request is served: first by
//! the task registry, then, for the two conditions that mean "this is not a
//! registry executable", by the host's process-replacement primitive.
//!
//! - [`platform`] provides the `Platform` trait over the host primitives
//!   (image replacement and process termination) and the production
//!   `HostPlatform`, so tests can substitute a recording double.
//! - [`dispatch`] owns the registry-first/host-fallback decision and the
//!   explicit-path wrappers of the exec family.
//! - [`path_search`] resolves bare filenames against the search path and
//!   handles shell-script reinterpretation.

pub mod dispatch;
pub mod path_search;
pub mod platform;

pub use dispatch::Dispatcher;
pub use path_search::{BOURNE_SHELL, DEFAULT_SEARCH_PATH};
pub use platform::{HostPlatform, Platform, classify_errno};
