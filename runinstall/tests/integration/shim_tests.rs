use crate::common::{ShimEnv, assert_contains, assert_not_contains, init_test_logging};

const PYPROJECT: &str = r#"[tool.poetry]
name = "demo"
version = "0.1.0"

[tool.poetry.dependencies]
python = "^3.11"
"#;

#[cfg(unix)]
#[test]
fn test_unsupported_tool_exits_without_delegating() {
    init_test_logging();
    crate::test_log!("TEST START: test_unsupported_tool_exits_without_delegating");

    let env = ShimEnv::new();
    let output = env.run("gradle", &["build"]);

    // -1 as seen by the parent process.
    assert_eq!(output.status.code(), Some(255));
    let log = env.log();
    assert_contains(&log, "Unknown command");
    assert_contains(&log, "gradle");
    assert!(env.history().is_empty());

    crate::test_log!("TEST PASS: test_unsupported_tool_exits_without_delegating");
}

#[test]
fn test_gate_mismatch_passes_through() {
    init_test_logging();
    crate::test_log!("TEST START: test_gate_mismatch_passes_through");

    let env = ShimEnv::new();
    env.write("pyproject.toml", PYPROJECT);
    let output = env
        .command("runinstall-test-no-such-tool")
        .env("RUNINSTALL_MATCH", "/runinstall-test-nowhere/*")
        .output()
        .expect("Failed to run runinstall");

    // Bypassed runs delegate even unknown names; the binary is missing.
    assert_eq!(output.status.code(), Some(127));
    let log = env.log();
    assert_not_contains(&log, "Unknown command");
    assert_not_contains(&log, "runinstall result");
    assert!(env.history().is_empty());

    crate::test_log!("TEST PASS: test_gate_mismatch_passes_through");
}

#[test]
fn test_first_run_records_history_and_second_is_skipped() {
    init_test_logging();
    crate::test_log!("TEST START: test_first_run_records_history_and_second_is_skipped");

    let env = ShimEnv::new();
    env.write("pyproject.toml", PYPROJECT);

    env.run("poetry", &["--version"]);
    let expected_line = format!("{} poetry", env.project.display());
    assert_eq!(env.history().lines().collect::<Vec<_>>(), vec![expected_line.as_str()]);
    let log = env.log();
    assert_contains(&log, "runinstall result");
    assert_contains(&log, "^3.11");
    assert_contains(&log, "poetry --version");
    assert_contains(&log, "Configuration value from RUNINSTALL_HISTORY_FILE");
    assert_not_contains(&log, "runinstall skipped");

    env.run("poetry", &["--version"]);
    assert_eq!(env.history().lines().count(), 1);
    assert_contains(&env.log(), "runinstall skipped");

    crate::test_log!("TEST PASS: test_first_run_records_history_and_second_is_skipped");
}

#[test]
fn test_malformed_manifest_still_records_and_logs() {
    init_test_logging();
    crate::test_log!("TEST START: test_malformed_manifest_still_records_and_logs");

    let env = ShimEnv::new();
    env.write("pyproject.toml", "[tool.poetry\npython = ");

    env.run("poetry", &["install"]);

    assert_eq!(env.history().lines().count(), 1);
    let log = env.log();
    assert_contains(&log, "runinstall result");
    assert_contains(&log, "Failed to parse");

    crate::test_log!("TEST PASS: test_malformed_manifest_still_records_and_logs");
}

#[test]
fn test_sensitive_args_masked_in_log() {
    init_test_logging();
    crate::test_log!("TEST START: test_sensitive_args_masked_in_log");

    let env = ShimEnv::new();
    env.run("gradle", &["publish", "-Dpassword=hunter2"]);

    let log = env.log();
    assert_contains(&log, "-Dpassword=***");
    assert_contains(&log, "gradle publish -Dpassword=***");
    assert_not_contains(&log, "hunter2");

    crate::test_log!("TEST PASS: test_sensitive_args_masked_in_log");
}

#[test]
fn test_run_event_logged_at_quiet_levels() {
    init_test_logging();
    crate::test_log!("TEST START: test_run_event_logged_at_quiet_levels");

    for level in ["warn", "error", "off"] {
        let env = ShimEnv::new();
        env.write("pyproject.toml", PYPROJECT);

        env.command("poetry")
            .arg("--version")
            .env("RUNINSTALL_LOG_LEVEL", level)
            .output()
            .expect("Failed to run runinstall");

        assert_eq!(env.history().lines().count(), 1, "level {level}");
        let log = env.log();
        assert_eq!(log.matches("runinstall result").count(), 1, "level {level}: {log}");
        assert_not_contains(&log, "Installing: ");
    }

    crate::test_log!("TEST PASS: test_run_event_logged_at_quiet_levels");
}
