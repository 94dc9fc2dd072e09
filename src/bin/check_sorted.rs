//! Check that a file containing unsigned 32-bit integers is sorted.
//!
//! Records are read in the host's native byte order.

use anyhow::Context;
use bigsort_harness::{
    find_first_incorrect_ascending_with_policy, find_first_unsorted_with_policy, init_logging,
    TailPolicy,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(about = "Check that a file containing unsigned 32-bit integers is sorted")]
struct Args {
    /// Input file name
    infile: PathBuf,

    /// Require exactly 0, 1, 2, ... with no gaps or duplicates
    #[arg(long)]
    ascending: bool,

    /// Fail on a trailing partial record instead of ignoring it
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    init_logging();
    let args = Args::parse();
    let policy = if args.strict {
        TailPolicy::Reject
    } else {
        TailPolicy::Ignore
    };

    let violation = if args.ascending {
        find_first_incorrect_ascending_with_policy(&args.infile, policy)
    } else {
        find_first_unsorted_with_policy(&args.infile, policy)
    }
    .with_context(|| format!("failed to check {}", args.infile.display()))?;

    let Some(violation) = violation else {
        println!("File is fully sorted!");
        return Ok(ExitCode::SUCCESS);
    };

    println!(
        "Integer value {:#x} at offset {} (byte offset {:#x}) is mis-sorted.",
        violation.value,
        violation.offset,
        violation.byte_offset()
    );
    match violation.previous {
        Some(previous) if args.ascending => {
            println!("It does not follow the previous value {previous:#x}")
        }
        Some(previous) => println!("It is smaller than the previous value {previous:#x}"),
        None => println!("The first value must be 0x0"),
    }
    Ok(ExitCode::FAILURE)
}
