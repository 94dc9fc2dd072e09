//! Tooling for testing an out-of-core sort of 32-bit integer files: input
//! generators, streaming output checkers, and a driver for the sorting
//! program itself.

pub mod check;
pub mod driver;
pub mod error;
pub mod generate;
pub mod size;

pub use check::{
    advise_sequential, find_first_incorrect_ascending, find_first_incorrect_ascending_with_policy,
    find_first_unsorted, find_first_unsorted_with_policy, RecordReader, TailPolicy, Violation,
};
pub use driver::{parse_stats, BigSort, RunOptions, RunResult, SortStats, SortSubject};
pub use error::{Error, Result};
pub use generate::{
    create_file_with_random_data, create_file_with_shuffled_ascending_integers, make_big_file,
    write_random_data, write_shuffled_ascending, NoProgress, Progress,
};
pub use size::{format_size, parse_size, round_up_to_multiple_of_4};

/// Installs the stderr log subscriber shared by the binaries.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
