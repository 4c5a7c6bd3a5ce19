//! Failure modes of `compile-stats collect`
//!
//! Every failure must exit non-zero with a sysexits code and leave no report
//! behind.

use predicates::prelude::*;
use std::fs;

mod common;
use common::fixtures::{BuildDir, LOG_HEADER};
use common::get_bin;

fn collect(build: &BuildDir) -> (assert_cmd::assert::Assert, std::path::PathBuf) {
    let output = build.path().join("stats.json");
    let assert = get_bin()
        .arg("collect")
        .arg(build.path())
        .arg("--output")
        .arg(&output)
        .args(["--commit", "abc"])
        .assert();
    (assert, output)
}

#[test]
fn test_unsupported_log_header_fails_without_report() {
    let build = BuildDir::new().unwrap();
    build
        .add_measured_case("TFLite", "PoseNet", "d__GPU-Mali__m", "posenet", 1)
        .unwrap();
    fs::write(build.path().join(".ninja_log"), "# ninja log v4\n").unwrap();

    let (assert, output) = collect(&build);
    assert
        .failure()
        .code(65)
        .stderr(predicate::str::contains("Unsupported ninja log version"));
    assert!(!output.exists());
}

#[test]
fn test_malformed_log_row_reports_line() {
    let build = BuildDir::new().unwrap();
    fs::write(
        build.path().join(".ninja_log"),
        format!("{}\n0\t10\t0\tbenchmark_suites/T/vmfb/a.vmfb\n", LOG_HEADER),
    )
    .unwrap();

    let (assert, output) = collect(&build);
    assert
        .failure()
        .code(65)
        .stderr(predicate::str::contains("row 2"));
    assert!(!output.exists());
}

#[test]
fn test_missing_build_log_is_io_error() {
    let build = BuildDir::new().unwrap();

    let (assert, output) = collect(&build);
    assert.failure().code(74);
    assert!(!output.exists());
}

#[test]
fn test_unrecognized_component_names_entry() {
    let build = BuildDir::new().unwrap();
    build
        .add_case("TFLite", "PoseNet", "d__GPU-Mali__m", "posenet")
        .unwrap();
    build
        .add_stats_module(
            "TFLite",
            "posenet",
            &[("module.fb", 1), ("_const.bin", 1), ("debug_info.txt", 1)],
        )
        .unwrap();
    let target = BuildDir::stats_target("TFLite", "posenet");
    build.write_log(&[(0, 5, target.as_str())]).unwrap();

    let (assert, output) = collect(&build);
    assert
        .failure()
        .code(65)
        .stderr(predicate::str::contains("debug_info.txt"));
    assert!(!output.exists());
}

#[test]
fn test_missing_const_component_fails() {
    let build = BuildDir::new().unwrap();
    build
        .add_case("TFLite", "PoseNet", "d__GPU-Mali__m", "posenet")
        .unwrap();
    build
        .add_stats_module("TFLite", "posenet", &[("module.fb", 1)])
        .unwrap();
    let target = BuildDir::stats_target("TFLite", "posenet");
    build.write_log(&[(0, 5, target.as_str())]).unwrap();

    let (assert, _) = collect(&build);
    assert
        .failure()
        .code(65)
        .stderr(predicate::str::contains("_const.bin"));
}

#[test]
fn test_module_absent_from_log_fails() {
    let build = BuildDir::new().unwrap();
    build
        .add_measured_case("TFLite", "PoseNet", "d__GPU-Mali__m", "posenet", 1)
        .unwrap();
    build
        .write_log(&[(0, 5, "benchmark_suites/TFLite/vmfb/posenet.vmfb")])
        .unwrap();

    let (assert, output) = collect(&build);
    assert
        .failure()
        .code(65)
        .stderr(predicate::str::contains(
            "benchmark_suites/TFLite/vmfb/posenet-compile-stats.vmfb",
        ));
    assert!(!output.exists());
}

#[test]
fn test_flagfile_without_module_fails() {
    let build = BuildDir::new().unwrap();
    let case_dir = build
        .add_case("TFLite", "PoseNet", "d__GPU-Mali__m", "posenet")
        .unwrap();
    fs::write(case_dir.join("flagfile"), "--device=vulkan\n").unwrap();
    build.write_log(&[]).unwrap();

    let (assert, _) = collect(&build);
    assert
        .failure()
        .code(65)
        .stderr(predicate::str::contains("module file"));
}

#[test]
fn test_invalid_config_exit_code() {
    let build = BuildDir::new().unwrap();
    build.write_log(&[]).unwrap();
    fs::write(
        build.path().join(".compile-stats.toml"),
        "[components]\ndispatch-patterns = ['(']\n",
    )
    .unwrap();

    let (assert, _) = collect(&build);
    assert.failure().code(78);
}

#[test]
fn test_commit_unavailable_outside_repository() {
    let build = BuildDir::new().unwrap();
    build.write_log(&[]).unwrap();
    let output = build.path().join("stats.json");
    let ceiling = build.path().parent().unwrap();

    get_bin()
        .current_dir(build.path())
        .env("GIT_CEILING_DIRECTORIES", ceiling)
        .arg("collect")
        .arg(build.path())
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("git commit"))
        .stderr(predicate::str::contains("--commit"));
    assert!(!output.exists());
}

#[test]
fn test_invalid_filter_regex_is_usage_error() {
    let build = BuildDir::new().unwrap();

    get_bin()
        .arg("collect")
        .arg(build.path())
        .args(["--output", "stats.json", "--model-name-regex", "[unclosed"])
        .assert()
        .failure()
        .code(2);
}
