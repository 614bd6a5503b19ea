// src/name.rs

//! Name derivation: executable path → registry lookup key.

use std::fmt;

use blake3::Hasher;

use crate::errors::{ExecError, Result};

/// Longest path string a name can be derived from, in bytes.
pub const MAX_PATH_LEN: usize = 4096;

/// Width of a registry name in bytes.
pub const NAME_LEN: usize = 32;

/// A 256-bit content address identifying an executable in the registry.
///
/// Names are derived from the *spelling* of the path string, not from the
/// file it resolves to: a symlink and its target, or a relative and an
/// absolute spelling of the same binary, derive unrelated names, and a file
/// replaced in place keeps its predecessor's name. Registry deployments
/// account for this when registering executables.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Name([u8; NAME_LEN]);

impl Name {
    pub fn from_bytes(bytes: [u8; NAME_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NAME_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({self})")
    }
}

/// Derive the registry name for an executable path.
///
/// A single digest pass over the raw bytes of the path string. Fails with
/// `InvalidInput` when the path exceeds [`MAX_PATH_LEN`] bytes.
pub fn derive_name(path: &str) -> Result<Name> {
    if path.len() > MAX_PATH_LEN {
        return Err(ExecError::InvalidInput(format!(
            "path exceeds {MAX_PATH_LEN} bytes"
        )));
    }

    let mut hasher = Hasher::new();
    hasher.update(path.as_bytes());
    Ok(Name(*hasher.finalize().as_bytes()))
}
