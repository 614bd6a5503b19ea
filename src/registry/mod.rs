// src/registry/mod.rs

//! Registry port.
//!
//! The registry is the content-addressed task facility dispatch prefers over
//! host exec. This layer consumes exactly two of its operations (look a
//! [`Name`] up to a [`Reference`], and run a referenced executable with a
//! [`TaskSpec`]) and treats everything behind them as opaque. How the
//! registry stores or schedules tasks is not this crate's concern.
//!
//! - [`Registry`] is the trait the dispatcher is generic over.
//! - [`DisconnectedRegistry`] is the implementation for hosts with no
//!   facility attached; every call reports [`RegistryError::Unavailable`],
//!   which sends the dispatcher down the host exec path.
//! - [`mock`] provides a scripted in-memory double for tests.

use std::ffi::CString;

use thiserror::Error;

use crate::argv::Argv;
use crate::name::Name;

pub mod mock;

pub use mock::ScriptedRegistry;

/// Context parameter for registry operations.
///
/// The registry's own model scopes lookups and runs; the dispatch layer
/// always operates unscoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Scope {
    #[default]
    None,
}

/// Opaque handle to a registered executable or a running task instance.
///
/// Returned by the registry and passed back into it; never dereferenced or
/// retained here beyond the single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference(u64);

impl Reference {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// An argv-only task invocation.
///
/// The registry's invocation model carries dataflow input and output slots;
/// dispatch issues plain argv invocations, so both counts are always zero
/// on this path.
#[derive(Debug, Clone)]
pub struct TaskSpec<'a> {
    argv: &'a [CString],
    inputs: u32,
    outputs: u32,
}

impl<'a> TaskSpec<'a> {
    pub fn from_argv(argv: &'a Argv) -> Self {
        Self {
            argv: argv.args(),
            inputs: 0,
            outputs: 0,
        }
    }

    pub fn argv(&self) -> &[CString] {
        self.argv
    }

    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    pub fn inputs(&self) -> u32 {
        self.inputs
    }

    pub fn outputs(&self) -> u32 {
        self.outputs
    }
}

/// What the registry reports back from a run: the launch status and the
/// reference of the spawned task instance. A non-zero status is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReceipt {
    pub status: u64,
    pub task: Reference,
}

/// Failures reported by a registry implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The facility is not attached to this host or cannot be reached.
    #[error("registry facility is not available")]
    Unavailable,

    /// The registry accepted the request and the task failed to launch.
    #[error("task launch returned status {0}")]
    TaskFailed(u64),

    /// Any other backend-reported failure.
    #[error("registry backend error: {0}")]
    Backend(String),
}

/// The registry operations dispatch relies on.
pub trait Registry {
    /// Resolve a name to a reference. `Ok(None)` means the name is not
    /// registered; `Err` means the registry itself failed.
    fn lookup(&self, scope: Scope, name: &Name) -> Result<Option<Reference>, RegistryError>;

    /// Run a referenced executable with the given task specification.
    fn run(
        &self,
        scope: Scope,
        reference: Reference,
        spec: &TaskSpec<'_>,
    ) -> Result<RunReceipt, RegistryError>;
}

/// Registry stand-in for hosts with no facility attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisconnectedRegistry;

impl Registry for DisconnectedRegistry {
    fn lookup(&self, _scope: Scope, _name: &Name) -> Result<Option<Reference>, RegistryError> {
        Err(RegistryError::Unavailable)
    }

    fn run(
        &self,
        _scope: Scope,
        _reference: Reference,
        _spec: &TaskSpec<'_>,
    ) -> Result<RunReceipt, RegistryError> {
        Err(RegistryError::Unavailable)
    }
}
