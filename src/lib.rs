// src/lib.rs

//! execshim: a registry-first dispatch layer for the exec family.
//!
//! Process-execution requests are routed to a content-addressed task
//! registry when the executable is registered there, and fall back to the
//! host's process-replacement primitive when it is not. Both backends are
//! consumed through traits ([`registry::Registry`], [`exec::Platform`]), so
//! embedders wire in their facility and tests substitute doubles.

pub mod argv;
pub mod cli;
pub mod env;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod name;
pub mod registry;

use std::convert::Infallible;

use tracing::info;

use crate::argv::Argv;
use crate::cli::CliArgs;
use crate::env::EnvVec;
use crate::errors::{ExecError, Result};
use crate::exec::{Dispatcher, HostPlatform};
use crate::registry::DisconnectedRegistry;

/// High-level entry point used by `main.rs`.
///
/// Captures the ambient environment once, applies `--env` overrides,
/// collects the argument vector, and dispatches. No registry facility is
/// attached to the binary, so every request legally falls through to host
/// exec, which makes the binary a working end-to-end exercise of the
/// fallback path. Returns only on failure.
pub fn run(args: CliArgs) -> Result<Infallible> {
    let mut env = EnvVec::capture();
    for pair in &args.env {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            ExecError::InvalidInput(format!("--env expects KEY=VALUE, got {pair:?}"))
        })?;
        env.set(key, value)?;
    }

    let argv = Argv::collect(args.command.iter().map(String::as_str))?;
    let file = &args.command[0];

    let dispatcher = Dispatcher::new(DisconnectedRegistry, HostPlatform);

    info!(command = %file, path_search = !args.no_search, "dispatching command");

    if args.no_search {
        dispatcher.execve(file, &argv, &env)
    } else {
        dispatcher.execvpe(file, &argv, &env)
    }
}
