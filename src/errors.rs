// src/errors.rs

//! Crate-wide error type and helpers.
//!
//! Every fallible step in the dispatch layer returns one of these variants,
//! classified once at the point of failure and never reclassified later.
//! The variants mirror the conditions the dispatcher and the PATH resolver
//! branch on, so control flow is a `match` over this enum rather than an
//! inspection of ambient state.

use nix::errno::Errno;
use thiserror::Error;

use crate::registry::RegistryError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// The request is unusable before any backend is consulted: a path
    /// longer than [`crate::name::MAX_PATH_LEN`] bytes, an interior NUL in a
    /// path or argument, or a malformed `KEY=VALUE` environment entry.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Argument-vector growth could not be satisfied. Always fatal to the
    /// current operation; partially collected arguments are dropped before
    /// this reaches the caller.
    #[error("out of memory while building argument vector")]
    OutOfMemory,

    /// The executable is neither registered in the registry nor present on
    /// the host (ENOENT class).
    #[error("executable not found")]
    NotFound,

    /// The candidate was found but may not be executed (EACCES class).
    #[error("permission denied")]
    PermissionDenied,

    /// The host rejected the file as a native binary (ENOEXEC). The PATH
    /// resolver reinterprets this as "run it as a shell script".
    #[error("not executable as a native binary")]
    NotExecutable,

    /// The candidate path is unusable for reasons local to that path
    /// (ESTALE, ENOTDIR, ENODEV, ETIMEDOUT). The PATH resolver skips the
    /// candidate and keeps searching.
    #[error("transient path condition: {0}")]
    TransientPath(Errno),

    /// The registry facility is not attached or not reachable. Treated like
    /// NotFound for fallback purposes: the request may still name a legacy
    /// executable.
    #[error("registry unavailable")]
    RegistryUnavailable,

    /// The registry recognized the request and then failed. Fatal: falling
    /// back to the host here would mask a real failure.
    #[error("registry failure: {0}")]
    Registry(RegistryError),

    /// An errno from the host exec primitive outside the classified set.
    /// Fatal and propagated verbatim.
    #[error("host exec failed: {0}")]
    Host(Errno),
}

impl ExecError {
    /// Shell-convention exit status for the `execshim` binary: 127 when the
    /// command was not found, 126 when it was found but not runnable, 2 for
    /// caller mistakes, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecError::NotFound | ExecError::RegistryUnavailable => 127,
            ExecError::PermissionDenied | ExecError::NotExecutable => 126,
            ExecError::InvalidInput(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExecError>;
