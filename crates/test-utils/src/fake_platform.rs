use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::sync::{Arc, Mutex};

use execshim::errors::ExecError;
use execshim::exec::Platform;

/// Panic payload carried by [`RecordingPlatform::exit`].
///
/// Process termination cannot happen inside a test runner, so the fake
/// models it as an unwind carrying the exit status; tests wrap the dispatch
/// in `catch_unwind` and downcast to assert the termination side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCall(pub i32);

/// One recorded `replace_image` call, with everything the host primitive
/// was handed.
#[derive(Debug, Clone)]
pub struct ReplacedImage {
    pub path: String,
    pub argv: Vec<String>,
    pub env: Vec<String>,
}

/// A fake platform that:
/// - records every `replace_image` call verbatim
/// - reports a scripted error per path (unscripted paths report NotFound)
/// - models `exit` as an [`ExitCall`] unwind.
///
/// Clones share state, so a test can keep a handle for assertions after
/// moving the fake into a dispatcher.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlatform {
    errors: Arc<Mutex<HashMap<String, ExecError>>>,
    calls: Arc<Mutex<Vec<ReplacedImage>>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the error `replace_image` reports for `path`.
    pub fn fail_with(&self, path: &str, err: ExecError) {
        self.errors.lock().unwrap().insert(path.to_string(), err);
    }

    pub fn calls(&self) -> Vec<ReplacedImage> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Paths handed to `replace_image`, in call order.
    pub fn attempted_paths(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.path.clone())
            .collect()
    }
}

fn lossy(strings: &[CString]) -> Vec<String> {
    strings
        .iter()
        .map(|s| s.to_string_lossy().into_owned())
        .collect()
}

impl Platform for RecordingPlatform {
    fn replace_image(&self, path: &CStr, argv: &[CString], env: &[CString]) -> ExecError {
        let path = path.to_string_lossy().into_owned();

        self.calls.lock().unwrap().push(ReplacedImage {
            path: path.clone(),
            argv: lossy(argv),
            env: lossy(env),
        });

        self.errors
            .lock()
            .unwrap()
            .get(&path)
            .cloned()
            .unwrap_or(ExecError::NotFound)
    }

    fn exit(&self, status: i32) -> ! {
        std::panic::panic_any(ExitCall(status));
    }
}
