// src/registry/mock.rs

//! Scripted in-memory registry for tests.
//!
//! Tests register a path with the outcome its dispatch should observe, then
//! assert against the recorded lookup and run calls. No storage or
//! scheduling is modeled; the double answers exactly what it was told to.

use std::collections::HashMap;
use std::ffi::CString;
use std::sync::{Arc, Mutex};

use crate::name::{derive_name, Name};

use super::{Reference, Registry, RegistryError, RunReceipt, Scope, TaskSpec};

/// What a registered path should report when dispatched.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Lookup succeeds and the run returns this launch status.
    Run(u64),
    /// Lookup succeeds and the run fails.
    RunError(RegistryError),
    /// Lookup itself fails.
    LookupError(RegistryError),
}

/// One recorded `run` call.
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub reference: Reference,
    pub argv: Vec<CString>,
    pub argc: usize,
    pub inputs: u32,
    pub outputs: u32,
}

/// Clones share state, so a test can keep a handle for assertions after
/// moving the double into a dispatcher.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRegistry {
    tasks: Arc<Mutex<HashMap<Name, (Reference, ScriptedOutcome)>>>,
    lookups: Arc<Mutex<Vec<Name>>>,
    runs: Arc<Mutex<Vec<RecordedRun>>>,
    next_ref: Arc<Mutex<u64>>,
}

impl ScriptedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` with the given outcome and return the reference its
    /// lookup will resolve to.
    ///
    /// Panics if the path cannot be named; the double is test-only.
    pub fn register(&self, path: &str, outcome: ScriptedOutcome) -> Reference {
        let name = derive_name(path).expect("mock path within naming limits");
        let mut next = self.next_ref.lock().unwrap();
        *next += 1;
        let reference = Reference::new(*next);
        self.tasks
            .lock()
            .unwrap()
            .insert(name, (reference, outcome));
        reference
    }

    pub fn lookups(&self) -> Vec<Name> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap().clone()
    }
}

impl Registry for ScriptedRegistry {
    fn lookup(&self, _scope: Scope, name: &Name) -> Result<Option<Reference>, RegistryError> {
        self.lookups.lock().unwrap().push(*name);

        match self.tasks.lock().unwrap().get(name) {
            Some((_, ScriptedOutcome::LookupError(err))) => Err(err.clone()),
            Some((reference, _)) => Ok(Some(*reference)),
            None => Ok(None),
        }
    }

    fn run(
        &self,
        _scope: Scope,
        reference: Reference,
        spec: &TaskSpec<'_>,
    ) -> Result<RunReceipt, RegistryError> {
        self.runs.lock().unwrap().push(RecordedRun {
            reference,
            argv: spec.argv().to_vec(),
            argc: spec.argc(),
            inputs: spec.inputs(),
            outputs: spec.outputs(),
        });

        let tasks = self.tasks.lock().unwrap();
        let entry = tasks
            .values()
            .find(|(r, _)| *r == reference)
            .map(|(_, outcome)| outcome.clone());

        match entry {
            Some(ScriptedOutcome::Run(status)) => {
                let mut next = self.next_ref.lock().unwrap();
                *next += 1;
                Ok(RunReceipt {
                    status,
                    task: Reference::new(*next),
                })
            }
            Some(ScriptedOutcome::RunError(err)) => Err(err),
            Some(ScriptedOutcome::LookupError(_)) | None => Err(RegistryError::Backend(
                format!("run with unknown reference {reference:?}"),
            )),
        }
    }
}
