// src/exec/platform.rs

//! Host platform port.
//!
//! The dispatcher talks to a [`Platform`] instead of calling the host
//! primitives directly. Production code uses [`HostPlatform`]; tests can
//! provide their own implementation that records calls and models process
//! termination without terminating the test runner.

use std::ffi::{CStr, CString};

use nix::errno::Errno;
use nix::unistd;

use crate::errors::ExecError;

/// The two host primitives the dispatch layer consumes.
pub trait Platform {
    /// Replace the current process image with `path`, handing it `argv` and
    /// `env`. By the primitive's own contract this returns only on failure,
    /// with the condition already classified.
    fn replace_image(&self, path: &CStr, argv: &[CString], env: &[CString]) -> ExecError;

    /// Terminate the calling process with `status`. Never returns.
    fn exit(&self, status: i32) -> !;
}

/// Real host platform used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPlatform;

impl Platform for HostPlatform {
    fn replace_image(&self, path: &CStr, argv: &[CString], env: &[CString]) -> ExecError {
        match unistd::execve(path, argv, env) {
            Ok(never) => match never {},
            Err(errno) => classify_errno(errno),
        }
    }

    fn exit(&self, status: i32) -> ! {
        std::process::exit(status)
    }
}

/// Classify an errno reported by the host exec primitive.
///
/// This is the single place host failures are classified; the dispatcher and
/// the PATH resolver branch on the resulting variants and never look at an
/// errno again. ESTALE, ENOTDIR, ENODEV and ETIMEDOUT form the
/// transient-path class: some network filesystems report them for paths that
/// are simply unusable, so a search treats them like a missing candidate.
pub fn classify_errno(errno: Errno) -> ExecError {
    match errno {
        Errno::ENOENT => ExecError::NotFound,
        Errno::EACCES => ExecError::PermissionDenied,
        Errno::ENOEXEC => ExecError::NotExecutable,
        Errno::ESTALE | Errno::ENOTDIR | Errno::ENODEV | Errno::ETIMEDOUT => {
            ExecError::TransientPath(errno)
        }
        other => ExecError::Host(other),
    }
}
