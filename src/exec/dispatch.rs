// src/exec/dispatch.rs

//! The executable dispatcher: registry first, host exec as fallback.
//!
//! A dispatch succeeds by *not returning*: the registry path spawns the task
//! as an independent unit and terminates the calling process, the host path
//! replaces the process image. Success is therefore typed as the
//! uninhabited `Ok` arm of `Result<Infallible, ExecError>`; the only thing
//! a caller can ever observe is a classified failure.

use std::convert::Infallible;
use std::ffi::CString;

use tracing::{debug, info};

use crate::argv::Argv;
use crate::env::EnvVec;
use crate::errors::{ExecError, Result};
use crate::name::derive_name;
use crate::registry::{Registry, RegistryError, Scope, TaskSpec};

use super::platform::Platform;

/// Routes exec requests to the registry or the host, with the failure
/// classification that decides between the two.
#[derive(Debug)]
pub struct Dispatcher<R, P> {
    registry: R,
    platform: P,
}

impl<R: Registry, P: Platform> Dispatcher<R, P> {
    pub fn new(registry: R, platform: P) -> Self {
        Self { registry, platform }
    }

    /// Execute `path` with an explicit argument vector and environment.
    ///
    /// The registry is consulted first. Only a lookup miss or an unavailable
    /// facility sends the request to the host exec primitive, since those
    /// two conditions mean "this is not a registry executable right now". Every
    /// other failure is surfaced as classified, because the registry
    /// recognized the request and retrying it on the host would mask the
    /// real failure.
    pub fn execve(&self, path: &str, argv: &Argv, env: &EnvVec) -> Result<Infallible> {
        let host_path = CString::new(path).map_err(|_| {
            ExecError::InvalidInput("path contains an interior NUL byte".into())
        })?;

        debug!(path, argc = argv.len(), "dispatching");

        let err = match self.run_registered(path, argv) {
            Ok(()) => {
                // The registry spawned the task as an independent unit; the
                // exec contract says the caller must not keep running.
                info!(path, "registry dispatch succeeded, terminating caller");
                self.platform.exit(0)
            }
            Err(err) => err,
        };

        match err {
            ExecError::NotFound | ExecError::RegistryUnavailable => {
                debug!(path, reason = %err, "not a registry executable, trying host exec");
                Err(self
                    .platform
                    .replace_image(&host_path, argv.args(), env.entries()))
            }
            other => Err(other),
        }
    }

    /// Execute `path` with an explicit argument vector and the ambient
    /// environment, snapshotted on entry.
    pub fn execv(&self, path: &str, argv: &Argv) -> Result<Infallible> {
        let env = EnvVec::capture();
        self.execve(path, argv, &env)
    }

    /// Execute `path` with a fixed argument list and the ambient
    /// environment. The first item is conventionally the program name.
    pub fn execl<I, S>(&self, path: &str, args: I) -> Result<Infallible>
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let argv = Argv::collect(args)?;
        let env = EnvVec::capture();
        self.execve(path, &argv, &env)
    }

    /// Execute `path` with a fixed argument list and an explicit
    /// environment.
    pub fn execle<I, S>(&self, path: &str, args: I, env: &EnvVec) -> Result<Infallible>
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let argv = Argv::collect(args)?;
        self.execve(path, &argv, env)
    }

    /// Try the registry: name the path, look it up, run it. `Ok(())` means
    /// the task was spawned and the caller must now terminate.
    fn run_registered(&self, path: &str, argv: &Argv) -> Result<()> {
        let spec = TaskSpec::from_argv(argv);
        let name = derive_name(path)?;

        let reference = match self.registry.lookup(Scope::None, &name) {
            Ok(Some(reference)) => reference,
            Ok(None) => return Err(ExecError::NotFound),
            Err(RegistryError::Unavailable) => return Err(ExecError::RegistryUnavailable),
            Err(err) => return Err(ExecError::Registry(err)),
        };

        let receipt = match self.registry.run(Scope::None, reference, &spec) {
            Ok(receipt) => receipt,
            Err(RegistryError::Unavailable) => return Err(ExecError::RegistryUnavailable),
            Err(err) => return Err(ExecError::Registry(err)),
        };

        if receipt.status != 0 {
            return Err(ExecError::Registry(RegistryError::TaskFailed(
                receipt.status,
            )));
        }

        debug!(name = %name, task = receipt.task.raw(), "registry spawned task");
        Ok(())
    }
}
