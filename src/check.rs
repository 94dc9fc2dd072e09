//! Constant-memory verification of record files.
//!
//! Both checks make a single forward pass, keep only the previous record,
//! and stop at the first record that breaks the property.

use crate::error::{Error, Result};
use crate::size::RECORD_SIZE;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::debug;

const READ_BUFFER: usize = 1 << 20;

/// What to do with 1-3 bytes left over after the last whole record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TailPolicy {
    /// Treat a short final read as end of file.
    #[default]
    Ignore,
    /// Fail with [`Error::TruncatedRecord`].
    Reject,
}

/// First record that breaks the required ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    /// Zero-based record index.
    pub offset: u64,
    pub value: u32,
    /// Record the violation was detected against. `None` only when the very
    /// first record of a strict-successor scan is not zero.
    pub previous: Option<u32>,
}

impl Violation {
    pub fn byte_offset(&self) -> u64 {
        self.offset * RECORD_SIZE
    }
}

/// Iterator over native-endian `u32` records.
pub struct RecordReader<R> {
    inner: R,
    policy: TailPolicy,
    offset: u64,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R, policy: TailPolicy) -> Self {
        Self {
            inner,
            policy,
            offset: 0,
            done: false,
        }
    }

    fn read_record(&mut self) -> Result<Option<u32>> {
        let mut buf = [0u8; 4];
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        match filled {
            4 => {
                self.offset += 1;
                Ok(Some(u32::from_ne_bytes(buf)))
            }
            0 => Ok(None),
            trailing => match self.policy {
                TailPolicy::Ignore => Ok(None),
                TailPolicy::Reject => Err(Error::TruncatedRecord {
                    offset: self.offset,
                    trailing,
                }),
            },
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let record = self.read_record().transpose();
        if !matches!(record, Some(Ok(_))) {
            self.done = true;
        }
        record
    }
}

fn open_records(path: &Path, policy: TailPolicy) -> Result<RecordReader<BufReader<File>>> {
    let file = File::open(path)?;
    advise_sequential(&file);
    Ok(RecordReader::new(
        BufReader::with_capacity(READ_BUFFER, file),
        policy,
    ))
}

/// Hints the kernel that `file` will be read front to back. Best effort.
#[cfg(target_os = "linux")]
pub fn advise_sequential(file: &File) {
    use std::os::fd::AsRawFd;
    let rc = unsafe { libc::posix_fadvise(file.as_raw_fd(), 0, 0, libc::POSIX_FADV_SEQUENTIAL) };
    if rc != 0 {
        debug!(errno = rc, "posix_fadvise failed");
    }
}

#[cfg(not(target_os = "linux"))]
pub fn advise_sequential(_file: &File) {}

/// Returns the first record smaller than its predecessor.
pub fn first_unsorted<R: Read>(records: RecordReader<R>) -> Result<Option<Violation>> {
    let mut previous = 0u32;
    for (offset, current) in (0u64..).zip(records) {
        let current = current?;
        if current < previous {
            return Ok(Some(Violation {
                offset,
                value: current,
                previous: Some(previous),
            }));
        }
        previous = current;
    }
    Ok(None)
}

/// Returns the first record that is not exactly its predecessor plus one,
/// with the sequence required to start at zero. Out-of-order, missing and
/// duplicate values all show up this way.
pub fn first_incorrect_ascending<R: Read>(records: RecordReader<R>) -> Result<Option<Violation>> {
    let mut previous: Option<u32> = None;
    for (offset, current) in (0u64..).zip(records) {
        let current = current?;
        let expected = previous.map_or(Some(0), |p| p.checked_add(1));
        if expected != Some(current) {
            return Ok(Some(Violation {
                offset,
                value: current,
                previous,
            }));
        }
        previous = Some(current);
    }
    Ok(None)
}

pub fn find_first_unsorted(path: impl AsRef<Path>) -> Result<Option<Violation>> {
    find_first_unsorted_with_policy(path, TailPolicy::Ignore)
}

pub fn find_first_unsorted_with_policy(
    path: impl AsRef<Path>,
    policy: TailPolicy,
) -> Result<Option<Violation>> {
    let path = path.as_ref();
    let violation = first_unsorted(open_records(path, policy)?)?;
    debug!(path = %path.display(), ?violation, "non-decreasing check finished");
    Ok(violation)
}

pub fn find_first_incorrect_ascending(path: impl AsRef<Path>) -> Result<Option<Violation>> {
    find_first_incorrect_ascending_with_policy(path, TailPolicy::Ignore)
}

pub fn find_first_incorrect_ascending_with_policy(
    path: impl AsRef<Path>,
    policy: TailPolicy,
) -> Result<Option<Violation>> {
    let path = path.as_ref();
    let violation = first_incorrect_ascending(open_records(path, policy)?)?;
    debug!(path = %path.display(), ?violation, "strict-successor check finished");
    Ok(violation)
}
