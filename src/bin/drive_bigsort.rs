use anyhow::Context;
use bigsort_harness::{init_logging, BigSort, RunOptions, SortSubject};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Run the sorting program once and report what it printed.
#[derive(Parser, Debug)]
struct Args {
    /// Path to the sorting program
    #[arg(long, env = "BIGSORT_PATH", default_value = "./cmake-build-debug/bigsort")]
    subject: PathBuf,

    /// Size of initial runs in bytes
    #[arg(long = "runsize", default_value_t = 1_000_000)]
    run_size: u64,

    /// Pass --quiet through to the sorting program
    #[arg(long)]
    quiet: bool,

    input: PathBuf,
    output: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    init_logging();
    let args = Args::parse();

    let subject = BigSort::new(&args.subject);
    let options = RunOptions::new(args.run_size).quiet(args.quiet);
    let now = Instant::now();
    let result = subject
        .run(&args.input, &args.output, &options)
        .with_context(|| format!("could not run {}", args.subject.display()))?;
    let elapsed = now.elapsed();

    println!("exit code: {}", result.exit_code);
    println!("initial runs: {}", result.num_runs);
    println!("merge generations: {}", result.num_generations);
    println!("elapsed: {elapsed:.2?}");
    if !result.stderr.is_empty() {
        eprint!("{}", result.stderr);
    }

    Ok(if result.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
