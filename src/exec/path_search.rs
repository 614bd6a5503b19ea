// src/exec/path_search.rs

//! PATH resolution and shell-script reinterpretation.
//!
//! A bare filename (no `/`) is resolved against the search path, dispatching
//! each candidate in order until one does not return. Per-candidate failures
//! fall into three classes: permission denials are remembered and the search
//! continues, conditions that mean "this candidate path is unusable" are
//! skipped silently, and anything else means a candidate was found and
//! failed for real, so the search stops and reports it.
//!
//! When the host rejects a candidate as a native binary, the file is retried
//! as a shell script: the original argv is re-seated behind the default
//! interpreter. That argv is built once per search, lazily, and its
//! interpreted-file slot is rewritten as the search moves on to later
//! candidates.

use std::convert::Infallible;

use tracing::debug;

use crate::argv::Argv;
use crate::env::EnvVec;
use crate::errors::{ExecError, Result};
use crate::registry::Registry;

use super::dispatch::Dispatcher;
use super::platform::Platform;

/// Interpreter used when a file is reinterpreted as a script.
pub const BOURNE_SHELL: &str = "/bin/sh";

/// Search path used when the environment carries no `PATH`: the current
/// directory (the leading empty segment), then the conventional utility
/// directories.
pub const DEFAULT_SEARCH_PATH: &str = ":/bin:/usr/bin";

impl<R: Registry, P: Platform> Dispatcher<R, P> {
    /// Resolve `file` against the search path and execute it with the
    /// ambient environment, snapshotted on entry.
    pub fn execvp(&self, file: &str, argv: &Argv) -> Result<Infallible> {
        let env = EnvVec::capture();
        self.execvpe(file, argv, &env)
    }

    /// Resolve `file` against the search path and execute it with a fixed
    /// argument list and the ambient environment.
    pub fn execlp<I, S>(&self, file: &str, args: I) -> Result<Infallible>
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let argv = Argv::collect(args)?;
        let env = EnvVec::capture();
        self.execvpe(file, &argv, &env)
    }

    /// Resolve `file` against the `PATH` of an explicit environment and
    /// execute it there.
    ///
    /// If `file` contains a path separator no search happens: it is
    /// dispatched directly, with one script reinterpretation if the host
    /// rejects it as a native binary.
    pub fn execvpe(&self, file: &str, argv: &Argv, env: &EnvVec) -> Result<Infallible> {
        if file.is_empty() {
            return Err(ExecError::NotFound);
        }

        if file.contains('/') {
            let err = self.dispatch_failure(file, argv, env);
            if err == ExecError::NotExecutable {
                let script = script_argv(file, argv)?;
                return self.execve(BOURNE_SHELL, &script, env);
            }
            return Err(err);
        }

        // One snapshot of the search path per resolution.
        let search = env.search_path().unwrap_or(DEFAULT_SEARCH_PATH);

        let mut script: Option<Argv> = None;
        let mut denied = false;

        for dir in search.split(':') {
            let candidate = if dir.is_empty() {
                // An empty segment means the current directory; the
                // candidate is the bare filename.
                file.to_string()
            } else {
                format!("{dir}/{file}")
            };

            debug!(candidate = %candidate, "trying search-path candidate");
            let mut err = self.dispatch_failure(&candidate, argv, env);

            if err == ExecError::NotExecutable {
                if let Some(existing) = script.as_mut() {
                    existing.set(1, candidate.as_str())?;
                } else {
                    // Built once, lazily, and shared with the remaining
                    // candidates. A remembered permission denial matters
                    // less than an allocation failure here: `?` abandons
                    // the whole search.
                    script = Some(script_argv(&candidate, argv)?);
                }
                if let Some(shell_argv) = script.as_ref() {
                    err = self.dispatch_failure(BOURNE_SHELL, shell_argv, env);
                }
            }

            match err {
                ExecError::PermissionDenied => {
                    // Something was found but we may not run it. Keep
                    // searching; report this only if nothing else works.
                    denied = true;
                }
                ExecError::NotFound | ExecError::TransientPath(_) => {
                    // The candidate path is missing or unusable; try the
                    // next directory.
                }
                other => {
                    // A candidate was found and invoked but failed for a
                    // substantive reason. Stop the search and report it.
                    debug!(candidate = %candidate, error = %other, "candidate failed, aborting search");
                    return Err(other);
                }
            }
        }

        if denied {
            Err(ExecError::PermissionDenied)
        } else {
            Err(ExecError::NotFound)
        }
    }

    /// Run one dispatch attempt and surface its failure. Success diverges,
    /// so this returning at all means the attempt failed.
    fn dispatch_failure(&self, path: &str, argv: &Argv, env: &EnvVec) -> ExecError {
        match self.execve(path, argv, env) {
            Err(err) => err,
            Ok(never) => match never {},
        }
    }
}

/// Build the shell-invocation argv for a file the host rejected as a native
/// binary: `[shell, file, original args after the program name]`.
fn script_argv(file: &str, argv: &Argv) -> Result<Argv> {
    let mut script = Argv::new();
    script.push(BOURNE_SHELL)?;
    script.push(file)?;
    for arg in argv.args().iter().skip(1) {
        script.push(arg.as_bytes())?;
    }
    Ok(script)
}
