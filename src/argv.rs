// src/argv.rs

//! Argument marshaling.
//!
//! [`SmallBuf`] is the growable buffer underneath: a fixed inline capacity
//! for the common case, promoted to owned heap storage when it runs out.
//! [`Argv`] builds the argument vector for a dispatch on top of it and
//! enforces the invariants the exec backends rely on: no element contains an
//! interior NUL (the terminating sentinel is appended at the FFI boundary by
//! the host exec binding), and the element count never exceeds [`MAX_ARGS`].
//!
//! All growth is fallible. An allocation that cannot be satisfied surfaces
//! as an error value and whatever was collected so far is dropped; callers
//! never see partial results.

use std::collections::TryReserveError;
use std::ffi::{CStr, CString};

use crate::errors::{ExecError, Result};

/// Inline capacity of an [`Argv`]; vectors at or below this length never
/// touch the heap.
pub const ARGV_INLINE: usize = 64;

/// Hard ceiling on argument-vector length: a 64 KiB budget of pointer-sized
/// slots, matching the stack/heap cutoff the exec path is allowed to burn.
pub const MAX_ARGS: usize = (64 * 1024) / size_of::<usize>();

/// A growable buffer with a fixed inline capacity.
///
/// Elements live in an inline array until the `N`-th push, at which point
/// storage is promoted to a heap `Vec` with double the capacity and the
/// inline contents are moved over once. Further growth doubles the heap
/// capacity. Every reservation goes through `try_reserve`, so allocator
/// refusal is an error value, not an abort.
#[derive(Debug, Clone)]
pub struct SmallBuf<T: Default, const N: usize> {
    inline: [T; N],
    /// Number of live elements in `inline`; meaningless once spilled.
    len: usize,
    heap: Option<Vec<T>>,
}

impl<T: Default, const N: usize> SmallBuf<T, N> {
    pub fn new() -> Self {
        Self {
            inline: std::array::from_fn(|_| T::default()),
            len: 0,
            heap: None,
        }
    }

    pub fn len(&self) -> usize {
        match &self.heap {
            Some(v) => v.len(),
            None => self.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once storage has been promoted to the heap.
    pub fn spilled(&self) -> bool {
        self.heap.is_some()
    }

    /// Append an element, growing storage if needed.
    pub fn push(&mut self, value: T) -> std::result::Result<(), TryReserveError> {
        if let Some(v) = self.heap.as_mut() {
            if v.len() == v.capacity() {
                v.try_reserve(v.capacity())?;
            }
            v.push(value);
        } else if self.len < N {
            self.inline[self.len] = value;
            self.len += 1;
        } else {
            // First promotion: reserve double the inline capacity and move
            // the already collected elements over once.
            let mut v = Vec::new();
            v.try_reserve_exact(N * 2)?;
            for slot in &mut self.inline {
                v.push(std::mem::take(slot));
            }
            v.push(value);
            self.heap = Some(v);
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[T] {
        match &self.heap {
            Some(v) => v,
            None => &self.inline[..self.len],
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.heap {
            Some(v) => v,
            None => &mut self.inline[..self.len],
        }
    }
}

impl<T: Default, const N: usize> Default for SmallBuf<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// An argument vector for dispatch.
///
/// Element 0 is conventionally the program name. Elements are NUL-free
/// `CString`s; the host exec binding appends the terminating sentinel when
/// the vector crosses the FFI boundary.
#[derive(Debug, Clone, Default)]
pub struct Argv {
    buf: SmallBuf<CString, ARGV_INLINE>,
}

impl Argv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect an argument vector from an iterator. This is the entry point
    /// the fixed-argument wrappers use to expand their lists.
    ///
    /// Fails with `InvalidInput` if any argument contains an interior NUL
    /// and with `OutOfMemory` if growth cannot be satisfied; in both cases
    /// everything collected so far is dropped.
    pub fn collect<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        let mut argv = Argv::new();
        for arg in args {
            argv.push(arg)?;
        }
        Ok(argv)
    }

    /// Append one argument.
    pub fn push(&mut self, arg: impl Into<Vec<u8>>) -> Result<()> {
        if self.buf.len() == MAX_ARGS {
            return Err(ExecError::OutOfMemory);
        }
        let arg = CString::new(arg).map_err(|_| {
            ExecError::InvalidInput("argument contains an interior NUL byte".into())
        })?;
        self.buf.push(arg).map_err(|_| ExecError::OutOfMemory)
    }

    /// Replace the element at `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, arg: impl Into<Vec<u8>>) -> Result<()> {
        let arg = CString::new(arg).map_err(|_| {
            ExecError::InvalidInput("argument contains an interior NUL byte".into())
        })?;
        self.buf.as_mut_slice()[index] = arg;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True once the vector has outgrown its inline storage.
    pub fn spilled(&self) -> bool {
        self.buf.spilled()
    }

    pub fn args(&self) -> &[CString] {
        self.buf.as_slice()
    }

    pub fn arg(&self, index: usize) -> Option<&CStr> {
        self.buf.as_slice().get(index).map(CString::as_c_str)
    }
}
