//! Create a large file filled with random binary data, aligned to a 32-bit boundary.

use anyhow::Context;
use bigsort_harness::{
    format_size, init_logging, make_big_file, parse_size, round_up_to_multiple_of_4,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Create a large file filled with random binary data, aligned to 32-bit boundary")]
struct Args {
    /// Output file name
    outfile: PathBuf,

    /// Size of file to generate in bytes or human-friendly format (e.g. "1GB")
    size: String,

    /// Size of chunks to use when writing the file (e.g. "1MB")
    #[arg(long = "chunksize", default_value = "1MB")]
    chunk_size: String,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    // every byte must belong to a whole record
    let size = round_up_to_multiple_of_4(parse_size(&args.size)?);
    let chunk_size = usize::try_from(parse_size(&args.chunk_size)?)
        .context("chunk size does not fit in memory")?;

    eprintln!(
        "writing {} to {} in {} chunks",
        format_size(size),
        args.outfile.display(),
        format_size(chunk_size as u64)
    );
    make_big_file(&args.outfile, size, chunk_size, |percent| println!("{percent}%"))
        .with_context(|| format!("failed to write {}", args.outfile.display()))?;
    Ok(())
}
