// src/env.rs

//! Environment vectors.
//!
//! The dispatcher never reads process-global environment state while it
//! works: every entry point takes an [`EnvVec`], and the wrappers that
//! default to the ambient environment snapshot it exactly once with
//! [`EnvVec::capture`] on entry. The PATH resolver in particular reads its
//! search path from the vector it was handed, so a search runs against one
//! consistent snapshot.

use std::ffi::CString;
use std::os::unix::ffi::OsStringExt;

use crate::errors::{ExecError, Result};

/// A read-only process environment: `KEY=VALUE` entries, NUL-free.
#[derive(Debug, Clone, Default)]
pub struct EnvVec {
    entries: Vec<CString>,
}

impl EnvVec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the ambient process environment.
    pub fn capture() -> Self {
        let mut entries = Vec::new();
        for (key, value) in std::env::vars_os() {
            let mut bytes = key.into_vec();
            bytes.push(b'=');
            bytes.extend(value.into_vec());
            // Interior NULs cannot occur in a Unix environment block; an
            // entry that somehow carries one is dropped rather than handed
            // to the exec backends malformed.
            if let Ok(entry) = CString::new(bytes) {
                entries.push(entry);
            }
        }
        Self { entries }
    }

    /// Build an explicit environment from `(key, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut env = Self::new();
        for (key, value) in pairs {
            env.set(key.as_ref(), value.as_ref())?;
        }
        Ok(env)
    }

    /// Set `key` to `value`, replacing an existing entry for the same key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() || key.contains('=') {
            return Err(ExecError::InvalidInput(format!(
                "invalid environment key {key:?}"
            )));
        }
        let entry = CString::new(format!("{key}={value}")).map_err(|_| {
            ExecError::InvalidInput(format!(
                "environment entry for {key:?} contains an interior NUL byte"
            ))
        })?;

        match self.position(key) {
            Some(i) => self.entries[i] = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    /// Look up the value of `key`, if present and valid UTF-8.
    pub fn var(&self, key: &str) -> Option<&str> {
        let i = self.position(key)?;
        let bytes = &self.entries[i].to_bytes()[key.len() + 1..];
        std::str::from_utf8(bytes).ok()
    }

    /// The `PATH` entry, as consumed by the PATH resolver.
    pub fn search_path(&self) -> Option<&str> {
        self.var("PATH")
    }

    pub fn entries(&self) -> &[CString] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| {
            let bytes = entry.to_bytes();
            bytes.len() > key.len()
                && bytes[key.len()] == b'='
                && &bytes[..key.len()] == key.as_bytes()
        })
    }
}
