//! Minimal sorting subject speaking the bigsort command-line contract.
//!
//! Runs and merges happen in memory; this exists so the driver and checkers
//! can be exercised without the real out-of-core sorter.

use anyhow::{bail, Context};
use bigsort_harness::{advise_sequential, init_logging, round_up_to_multiple_of_4};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

const DEFAULT_RUN_SIZE: u64 = 1 << 20;

#[derive(Parser, Debug)]
#[command(
    name = "bigsort",
    about = "Sort a large file filled with unsigned, 32-bit integers"
)]
struct Args {
    /// Size of initial runs in bytes
    #[arg(short = 'r', long = "runsize", default_value_t = DEFAULT_RUN_SIZE)]
    run_size: u64,

    /// Only print the statistics lines
    #[arg(short, long)]
    quiet: bool,

    /// Input file name
    input: PathBuf,

    /// Output file name
    output: PathBuf,
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();
    match sort(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn sort(args: &Args) -> anyhow::Result<()> {
    let run_size = round_up_to_multiple_of_4(args.run_size);
    if run_size == 0 {
        bail!("run size must be positive");
    }
    if !args.quiet {
        println!(
            "Proceeding with:\n  input file: {}\n  output file: {}\n  run size: {}",
            args.input.display(),
            args.output.display(),
            run_size
        );
    }

    let input = File::open(&args.input).context("unable to open input file")?;
    if input.metadata()?.len() % 4 != 0 {
        bail!("input file's size must be a multiple of 4.");
    }
    advise_sequential(&input);
    let runs = create_runs(BufReader::new(input), run_size).context("unable to create runs")?;
    let num_runs = runs.len();
    let (sorted, generations) = merge_runs(runs);

    let output = File::create(&args.output).context("unable to create output file")?;
    let mut out = BufWriter::new(output);
    for value in sorted {
        out.write_all(&value.to_ne_bytes())?;
    }
    out.flush()?;

    println!("initial runs: {num_runs}");
    println!("merge generations: {generations}");
    if !args.quiet {
        println!("Completed successfully!");
    }
    Ok(())
}

/// Cuts the input into sorted runs of `run_size` bytes. A run ends on a
/// short read, so input that divides evenly leaves one trailing empty run.
fn create_runs<R: Read>(mut input: R, run_size: u64) -> io::Result<Vec<Vec<u32>>> {
    let mut runs = Vec::new();
    loop {
        let mut bytes = Vec::new();
        let read = input.by_ref().take(run_size).read_to_end(&mut bytes)?;
        let mut run: Vec<u32> = bytes
            .chunks_exact(4)
            .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        run.sort_unstable();
        debug!(run = runs.len(), records = run.len(), "created run");
        runs.push(run);
        if (read as u64) < run_size {
            return Ok(runs);
        }
    }
}

/// Merges runs pairwise, one generation at a time, until one remains.
fn merge_runs(mut runs: Vec<Vec<u32>>) -> (Vec<u32>, u32) {
    let mut generations = 0;
    while runs.len() > 1 {
        generations += 1;
        let mut next = Vec::with_capacity(runs.len().div_ceil(2));
        let mut pending = runs.into_iter();
        while let Some(left) = pending.next() {
            match pending.next() {
                Some(right) => next.push(merge(&left, &right)),
                None => next.push(left),
            }
        }
        debug!(generation = generations, runs = next.len(), "merged generation");
        runs = next;
    }
    (runs.pop().unwrap_or_default(), generations)
}

fn merge(left: &[u32], right: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if left[i] <= right[j] {
            out.push(left[i]);
            i += 1;
        } else {
            out.push(right[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
    out
}
