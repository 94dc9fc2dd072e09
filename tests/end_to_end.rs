//! Generate -> sort -> check, against the stub subject binary.

use bigsort_harness::{
    create_file_with_random_data, create_file_with_shuffled_ascending_integers,
    find_first_incorrect_ascending, find_first_unsorted, BigSort, Error, RunOptions, SortSubject,
};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn stub() -> BigSort {
    BigSort::new(env!("CARGO_BIN_EXE_stub_bigsort"))
}

fn scratch() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("test.in");
    let output = dir.path().join("test.out");
    (dir, input, output)
}

fn shuffled_input(path: &Path, size: u64) {
    create_file_with_shuffled_ascending_integers(path, size, &mut rand::thread_rng()).unwrap();
}

#[test]
fn run_size_smaller_than_data_size() {
    let (_dir, input, output) = scratch();
    shuffled_input(&input, 1_000_000);

    let result = stub()
        .run(&input, &output, &RunOptions::new(100_000))
        .unwrap();
    assert_eq!(result.exit_code, 0, "stderr: {}", result.stderr);
    assert_eq!(result.num_runs, 11);
    assert_eq!(result.num_generations, 4);

    assert_eq!(find_first_incorrect_ascending(&output).unwrap(), None);
}

#[test]
fn run_size_same_as_data_size() {
    let (_dir, input, output) = scratch();
    shuffled_input(&input, 1_000_000);

    let result = stub()
        .run(&input, &output, &RunOptions::new(1_000_000))
        .unwrap();
    assert!(result.success());
    assert_eq!(result.num_runs, 2);
    assert_eq!(result.num_generations, 1);

    assert_eq!(find_first_incorrect_ascending(&output).unwrap(), None);
}

#[test]
fn quiet_run_still_reports_stats() {
    let (_dir, input, output) = scratch();
    shuffled_input(&input, 4_000);

    let result = stub()
        .run(&input, &output, &RunOptions::new(1_000).quiet(true))
        .unwrap();
    assert!(result.success());
    assert!(!result.stdout.contains("Proceeding with"));
    assert_eq!(result.num_runs, 5);
    assert_eq!(result.num_generations, 3);
}

#[test]
fn random_data_sorts_non_decreasing() {
    let (_dir, input, output) = scratch();
    create_file_with_random_data(&input, 40_000).unwrap();

    let result = stub()
        .run(&input, &output, &RunOptions::new(4_096))
        .unwrap();
    assert!(result.success());
    assert_eq!(find_first_unsorted(&output).unwrap(), None);
    assert_eq!(std::fs::metadata(&output).unwrap().len(), 40_000);
}

#[test]
fn subject_failure_is_reported_not_raised() {
    let (_dir, input, output) = scratch();
    std::fs::write(&input, [1u8, 2, 3]).unwrap();

    let result = stub()
        .run(&input, &output, &RunOptions::new(100))
        .unwrap();
    assert_ne!(result.exit_code, 0);
    assert!(result.stderr.contains("multiple of 4"), "stderr: {}", result.stderr);
    assert_eq!(result.num_runs, 0);
    assert_eq!(result.num_generations, 0);
}

#[test]
fn missing_subject_is_a_spawn_error() {
    let (dir, input, output) = scratch();
    let subject = BigSort::new(dir.path().join("bigsort"));
    let err = subject
        .run(&input, &output, &RunOptions::new(100))
        .unwrap_err();
    assert!(matches!(err, Error::Spawn { .. }));
}

#[test]
fn bigfile_rounds_up_and_reports_progress() {
    let (dir, _, _) = scratch();
    let path = dir.path().join("big.bin");
    let out = Command::new(env!("CARGO_BIN_EXE_bigfile"))
        .arg(&path)
        .arg("10KB")
        .arg("--chunksize=3KB")
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 10_000);
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.lines().collect::<Vec<_>>(), ["30%", "60%", "90%", "100%"]);

    let odd = dir.path().join("odd.bin");
    let out = Command::new(env!("CARGO_BIN_EXE_bigfile"))
        .arg(&odd)
        .arg("10")
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(std::fs::metadata(&odd).unwrap().len(), 12);
}

#[test]
fn check_sorted_cli_messages() {
    let (dir, _, _) = scratch();
    let sorted = dir.path().join("sorted.bin");
    let unsorted = dir.path().join("unsorted.bin");
    let bytes = |values: &[u32]| values.iter().flat_map(|v| v.to_ne_bytes()).collect::<Vec<u8>>();
    std::fs::write(&sorted, bytes(&[3, 5, 5, 9])).unwrap();
    std::fs::write(&unsorted, bytes(&[3, 5, 2, 9])).unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_check_sorted"))
        .arg(&sorted)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "File is fully sorted!\n");

    let out = Command::new(env!("CARGO_BIN_EXE_check_sorted"))
        .arg(&unsorted)
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Integer value 0x2 at offset 2 (byte offset 0x8) is mis-sorted."));
    assert!(stdout.contains("smaller than the previous value 0x5"));
}

#[test]
fn drive_bigsort_cli_reports_stats() {
    let (_dir, input, output) = scratch();
    shuffled_input(&input, 40_000);

    let out = Command::new(env!("CARGO_BIN_EXE_drive_bigsort"))
        .arg("--subject")
        .arg(env!("CARGO_BIN_EXE_stub_bigsort"))
        .arg("--runsize=10000")
        .arg(&input)
        .arg(&output)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("exit code: 0"));
    assert!(stdout.contains("initial runs: 5"));
    assert!(stdout.contains("merge generations: 3"));
    assert_eq!(find_first_incorrect_ascending(&output).unwrap(), None);
}
