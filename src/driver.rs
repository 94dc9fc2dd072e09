//! Drives the external sorting program and collects what it reports.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::debug;

const INITIAL_RUNS_KEY: &str = "initial runs:";
const MERGE_GENERATIONS_KEY: &str = "merge generations:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Bytes per initial run, passed as `--runsize`.
    pub run_size: u64,
    /// Pass `--quiet` to the subject.
    pub quiet: bool,
}

impl RunOptions {
    pub fn new(run_size: u64) -> Self {
        Self {
            run_size,
            quiet: false,
        }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Statistics the subject prints on stdout. Missing lines read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    pub num_runs: u64,
    pub num_generations: u64,
}

/// Outcome of one subject invocation. A non-zero exit code is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub num_runs: u64,
    pub num_generations: u64,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stats(&self) -> SortStats {
        SortStats {
            num_runs: self.num_runs,
            num_generations: self.num_generations,
        }
    }
}

/// Anything that can sort `input` into `output`.
pub trait SortSubject {
    fn run(&self, input: &Path, output: &Path, options: &RunOptions) -> Result<RunResult>;
}

/// The real subject: an executable spawned once per run.
#[derive(Debug, Clone)]
pub struct BigSort {
    program: PathBuf,
}

impl BigSort {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, input: &Path, output: &Path, options: &RunOptions) -> Command {
        let mut cmd = Command::new(&self.program);
        if options.quiet {
            cmd.arg("--quiet");
        }
        cmd.arg(format!("--runsize={}", options.run_size))
            .arg(input)
            .arg(output);
        cmd
    }
}

impl SortSubject for BigSort {
    /// Blocks until the subject exits. There is no timeout.
    fn run(&self, input: &Path, output: &Path, options: &RunOptions) -> Result<RunResult> {
        let mut cmd = self.command(input, output, options);
        debug!(command = ?cmd, "spawning subject");
        let out = cmd.output().map_err(|source| Error::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&out.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&out.stderr).into_owned();
        let stats = parse_stats(&stdout);
        let exit_code = exit_code(out.status);
        debug!(exit_code, ?stats, "subject finished");

        Ok(RunResult {
            exit_code,
            stdout,
            stderr,
            num_runs: stats.num_runs,
            num_generations: stats.num_generations,
        })
    }
}

/// Exit code, or `128 + signal` for a subject killed by a signal.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

/// Pulls `initial runs: N` and `merge generations: N` out of subject output.
///
/// Keys may appear anywhere in a line, in either order; the first occurrence
/// of each wins and a key that never appears yields zero.
pub fn parse_stats(stdout: &str) -> SortStats {
    let mut runs = None;
    let mut generations = None;
    for line in stdout.lines() {
        if runs.is_none() {
            runs = value_after(line, INITIAL_RUNS_KEY);
        }
        if generations.is_none() {
            generations = value_after(line, MERGE_GENERATIONS_KEY);
        }
        if runs.is_some() && generations.is_some() {
            break;
        }
    }
    SortStats {
        num_runs: runs.unwrap_or(0),
        num_generations: generations.unwrap_or(0),
    }
}

fn value_after(line: &str, key: &str) -> Option<u64> {
    let (_, rest) = line.split_once(key)?;
    let rest = rest.trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}
