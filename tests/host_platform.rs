// tests/host_platform.rs

//! Real host classification: drive `HostPlatform` against actual files and
//! check the errno mapping the rest of the crate branches on.

use std::error::Error;
use std::ffi::CString;
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;

use execshim::argv::Argv;
use execshim::errors::ExecError;
use execshim::exec::{Dispatcher, HostPlatform, Platform, classify_errno};
use execshim::registry::DisconnectedRegistry;
use execshim_test_utils::init_tracing;
use nix::errno::Errno;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn c(s: &str) -> CString {
    CString::new(s).unwrap()
}

#[test]
fn missing_path_reports_not_found() {
    init_tracing();

    let err = HostPlatform.replace_image(
        &c("/nonexistent/execshim-missing-binary"),
        &[c("missing")],
        &[],
    );

    assert_eq!(err, ExecError::NotFound);
}

#[test]
fn file_without_exec_bit_reports_permission_denied() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let path = dir.path().join("plain-file");
    let mut file = fs::File::create(&path)?;
    writeln!(file, "just data")?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644))?;

    let err = HostPlatform.replace_image(
        &CString::new(path.to_str().unwrap())?,
        &[c("plain-file")],
        &[],
    );

    assert_eq!(err, ExecError::PermissionDenied);

    Ok(())
}

#[test]
fn executable_garbage_reports_not_executable() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let path = dir.path().join("garbage-bin");
    let mut file = fs::File::create(&path)?;
    // Neither a shebang nor a recognizable binary image.
    file.write_all(b"this is not a binary\n")?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;

    let err = HostPlatform.replace_image(
        &CString::new(path.to_str().unwrap())?,
        &[c("garbage-bin")],
        &[],
    );

    assert_eq!(err, ExecError::NotExecutable);

    Ok(())
}

#[test]
fn dispatcher_with_host_platform_surfaces_not_found() -> TestResult {
    init_tracing();

    let dispatcher = Dispatcher::new(DisconnectedRegistry, HostPlatform);
    let argv = Argv::collect(["missing"])?;

    let result = dispatcher.execv("/nonexistent/execshim-missing-binary", &argv);
    assert_eq!(result.unwrap_err(), ExecError::NotFound);

    Ok(())
}

#[test]
fn errno_classification_covers_the_dispatch_classes() {
    assert_eq!(classify_errno(Errno::ENOENT), ExecError::NotFound);
    assert_eq!(classify_errno(Errno::EACCES), ExecError::PermissionDenied);
    assert_eq!(classify_errno(Errno::ENOEXEC), ExecError::NotExecutable);

    for errno in [Errno::ESTALE, Errno::ENOTDIR, Errno::ENODEV, Errno::ETIMEDOUT] {
        assert_eq!(classify_errno(errno), ExecError::TransientPath(errno));
    }

    assert_eq!(classify_errno(Errno::E2BIG), ExecError::Host(Errno::E2BIG));
}
