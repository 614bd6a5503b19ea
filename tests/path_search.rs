// tests/path_search.rs

//! PATH resolver behavior: candidate order, per-candidate failure
//! classification, empty segments, and the default search path.

use std::error::Error;
use std::panic::{AssertUnwindSafe, catch_unwind};

use execshim::argv::Argv;
use execshim::env::EnvVec;
use execshim::errors::ExecError;
use execshim::exec::{DEFAULT_SEARCH_PATH, Dispatcher};
use execshim::registry::mock::ScriptedOutcome;
use execshim::registry::{DisconnectedRegistry, ScriptedRegistry};
use execshim_test_utils::fake_platform::{ExitCall, RecordingPlatform};
use execshim_test_utils::init_tracing;
use nix::errno::Errno;

type TestResult = Result<(), Box<dyn Error>>;

fn env_with_path(path: &str) -> EnvVec {
    EnvVec::from_pairs([("PATH", path)]).unwrap()
}

fn searcher(platform: &RecordingPlatform) -> Dispatcher<DisconnectedRegistry, RecordingPlatform> {
    Dispatcher::new(DisconnectedRegistry, platform.clone())
}

#[test]
fn candidates_tried_in_search_order() -> TestResult {
    init_tracing();

    let platform = RecordingPlatform::new();
    let dispatcher = searcher(&platform);

    let argv = Argv::collect(["prog"])?;
    let result = dispatcher.execvpe("prog", &argv, &env_with_path("/a:/b"));

    assert_eq!(result.unwrap_err(), ExecError::NotFound);
    assert_eq!(platform.attempted_paths(), vec!["/a/prog", "/b/prog"]);

    Ok(())
}

#[test]
fn permission_denied_is_remembered_not_fatal() -> TestResult {
    init_tracing();

    let platform = RecordingPlatform::new();
    platform.fail_with("/a/prog", ExecError::PermissionDenied);
    let dispatcher = searcher(&platform);

    let argv = Argv::collect(["prog"])?;
    let result = dispatcher.execvpe("prog", &argv, &env_with_path("/a:/b"));

    // /b/prog reported NotFound, but /a/prog was found and denied; the
    // denial wins once the search is exhausted.
    assert_eq!(result.unwrap_err(), ExecError::PermissionDenied);
    assert_eq!(platform.attempted_paths(), vec!["/a/prog", "/b/prog"]);

    Ok(())
}

#[test]
fn empty_segment_means_current_directory() -> TestResult {
    init_tracing();

    let platform = RecordingPlatform::new();
    let dispatcher = searcher(&platform);

    let argv = Argv::collect(["prog"])?;
    let result = dispatcher.execvpe("prog", &argv, &env_with_path("/a::/b"));

    assert_eq!(result.unwrap_err(), ExecError::NotFound);
    // The doubled separator becomes the bare filename, no directory prefix.
    assert_eq!(platform.attempted_paths(), vec!["/a/prog", "prog", "/b/prog"]);

    Ok(())
}

#[test]
fn leading_and_trailing_separators_mean_current_directory() -> TestResult {
    init_tracing();

    let platform = RecordingPlatform::new();
    let dispatcher = searcher(&platform);

    let argv = Argv::collect(["prog"])?;
    let result = dispatcher.execvpe("prog", &argv, &env_with_path(":/a:"));

    assert_eq!(result.unwrap_err(), ExecError::NotFound);
    assert_eq!(platform.attempted_paths(), vec!["prog", "/a/prog", "prog"]);

    Ok(())
}

#[test]
fn transient_conditions_skip_the_candidate() -> TestResult {
    init_tracing();

    let platform = RecordingPlatform::new();
    platform.fail_with("/stale/prog", ExecError::TransientPath(Errno::ESTALE));
    platform.fail_with("/notdir/prog", ExecError::TransientPath(Errno::ENOTDIR));
    let dispatcher = searcher(&platform);

    let argv = Argv::collect(["prog"])?;
    let result = dispatcher.execvpe("prog", &argv, &env_with_path("/stale:/notdir:/c"));

    assert_eq!(result.unwrap_err(), ExecError::NotFound);
    assert_eq!(
        platform.attempted_paths(),
        vec!["/stale/prog", "/notdir/prog", "/c/prog"]
    );

    Ok(())
}

#[test]
fn substantive_failure_aborts_the_search() -> TestResult {
    init_tracing();

    let platform = RecordingPlatform::new();
    platform.fail_with("/a/prog", ExecError::Host(Errno::EIO));
    let dispatcher = searcher(&platform);

    let argv = Argv::collect(["prog"])?;
    let result = dispatcher.execvpe("prog", &argv, &env_with_path("/a:/b"));

    // The candidate was found and invoked; its failure is the caller's
    // answer, and /b is never tried.
    assert_eq!(result.unwrap_err(), ExecError::Host(Errno::EIO));
    assert_eq!(platform.attempted_paths(), vec!["/a/prog"]);

    Ok(())
}

#[test]
fn substantive_failure_outranks_remembered_denial() -> TestResult {
    init_tracing();

    let platform = RecordingPlatform::new();
    platform.fail_with("/a/prog", ExecError::PermissionDenied);
    platform.fail_with("/b/prog", ExecError::Host(Errno::EIO));
    let dispatcher = searcher(&platform);

    let argv = Argv::collect(["prog"])?;
    let result = dispatcher.execvpe("prog", &argv, &env_with_path("/a:/b:/c"));

    assert_eq!(result.unwrap_err(), ExecError::Host(Errno::EIO));
    assert_eq!(platform.attempted_paths(), vec!["/a/prog", "/b/prog"]);

    Ok(())
}

#[test]
fn unset_path_falls_back_to_default_search_path() -> TestResult {
    init_tracing();

    let platform = RecordingPlatform::new();
    let dispatcher = searcher(&platform);

    // No PATH entry at all.
    let env = EnvVec::from_pairs([("HOME", "/home/test")])?;
    let argv = Argv::collect(["prog"])?;
    let result = dispatcher.execvpe("prog", &argv, &env);

    assert_eq!(result.unwrap_err(), ExecError::NotFound);

    let expected: Vec<String> = DEFAULT_SEARCH_PATH
        .split(':')
        .map(|dir| {
            if dir.is_empty() {
                "prog".to_string()
            } else {
                format!("{dir}/prog")
            }
        })
        .collect();
    assert_eq!(platform.attempted_paths(), expected);

    Ok(())
}

#[test]
fn empty_file_fails_immediately() -> TestResult {
    init_tracing();

    let registry = ScriptedRegistry::new();
    let platform = RecordingPlatform::new();
    let dispatcher = Dispatcher::new(registry.clone(), platform.clone());

    let argv = Argv::collect([""])?;
    let result = dispatcher.execvpe("", &argv, &env_with_path("/a:/b"));

    assert_eq!(result.unwrap_err(), ExecError::NotFound);
    assert_eq!(platform.call_count(), 0);
    assert_eq!(registry.lookup_count(), 0);

    Ok(())
}

#[test]
fn slash_in_file_skips_the_search() -> TestResult {
    init_tracing();

    let platform = RecordingPlatform::new();
    let dispatcher = searcher(&platform);

    let argv = Argv::collect(["tool"])?;
    let result = dispatcher.execvpe("bin/tool", &argv, &env_with_path("/a:/b"));

    assert_eq!(result.unwrap_err(), ExecError::NotFound);
    assert_eq!(platform.attempted_paths(), vec!["bin/tool"]);

    Ok(())
}

#[test]
fn registry_hit_mid_search_terminates_caller() -> TestResult {
    init_tracing();

    let registry = ScriptedRegistry::new();
    registry.register("/b/prog", ScriptedOutcome::Run(0));
    let platform = RecordingPlatform::new();
    let dispatcher = Dispatcher::new(registry, platform.clone());

    let argv = Argv::collect(["prog"])?;
    let env = env_with_path("/a:/b");

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        dispatcher.execvpe("prog", &argv, &env)
    }));

    let payload = outcome.expect_err("registry hit must not return");
    assert_eq!(*payload.downcast_ref::<ExitCall>().unwrap(), ExitCall(0));
    // /a/prog fell through to the host and missed; /b/prog never reached
    // the host because the registry took it.
    assert_eq!(platform.attempted_paths(), vec!["/a/prog"]);

    Ok(())
}
