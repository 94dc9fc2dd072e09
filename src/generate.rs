//! Random test-input generation.

use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, trace};

/// Receives generation progress as a whole percentage in `0..=100`.
pub trait Progress {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> Progress for F {
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// Observer that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _percent: u8) {}
}

/// `100 * written / total`, rounded half to even (12.5 -> 12, 13.5 -> 14).
fn percent_done(written: u64, total: u64) -> u8 {
    let (w, t) = (u128::from(written), u128::from(total));
    let (q, r) = (100 * w / t, 100 * w % t);
    let round_up = 2 * r > t || (2 * r == t && q % 2 == 1);
    (q + u128::from(round_up)) as u8
}

/// Writes `total_size` random bytes to `sink`, never more than `chunk_size`
/// per write. `progress` hears about each new percentage exactly once.
pub fn write_random_data<W: Write, P: Progress>(
    sink: &mut W,
    total_size: u64,
    chunk_size: usize,
    mut progress: P,
) -> Result<()> {
    if chunk_size == 0 {
        return Err(Error::InvalidSize("chunk size must be positive".into()));
    }

    let mut rng = rand::thread_rng();
    let mut buf = vec![0u8; chunk_size.min(usize::try_from(total_size).unwrap_or(usize::MAX))];
    let mut remaining = total_size;
    let mut last_percent = None;

    while remaining > 0 {
        let len = remaining.min(buf.len() as u64) as usize;
        let chunk = &mut buf[..len];
        rng.fill_bytes(chunk);
        sink.write_all(chunk)?;
        remaining -= len as u64;

        let percent = percent_done(total_size - remaining, total_size);
        trace!(remaining, percent, "wrote chunk");
        if last_percent != Some(percent) {
            progress.report(percent);
            last_percent = Some(percent);
        }
    }
    Ok(())
}

/// Creates (or truncates) `path` and fills it with random data in chunks.
pub fn make_big_file<P: Progress>(
    path: impl AsRef<Path>,
    size: u64,
    chunk_size: usize,
    progress: P,
) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), size, chunk_size, "generating random file");
    let mut file = File::create(path)?;
    write_random_data(&mut file, size, chunk_size, progress)?;
    file.flush()?;
    Ok(())
}

/// Single-shot variant for small fixtures: the whole payload is built in memory.
pub fn create_file_with_random_data(path: impl AsRef<Path>, size: usize) -> Result<()> {
    let mut data = vec![0u8; size];
    rand::thread_rng().fill_bytes(&mut data);
    std::fs::write(path, data)?;
    Ok(())
}

/// Writes every integer in `0..total_size / 4` exactly once, shuffled, as
/// native-endian `u32` records.
///
/// The whole key space is held in memory while shuffling. `total_size` must
/// be a multiple of 4 and at most `4 * 2^32`.
pub fn write_shuffled_ascending<W: Write, R: Rng + ?Sized>(
    sink: &mut W,
    total_size: u64,
    rng: &mut R,
) -> Result<()> {
    let mut numbers: Vec<u32> = match last_key(total_size)? {
        Some(last) => (0..=last).collect(),
        None => Vec::new(),
    };
    numbers.shuffle(rng);

    let mut writer = BufWriter::new(sink);
    for number in numbers {
        writer.write_all(&number.to_ne_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Largest key a shuffled file of `total_size` bytes holds, `None` when empty.
fn last_key(total_size: u64) -> Result<Option<u32>> {
    if total_size % 4 != 0 {
        return Err(Error::InvalidSize(format!("{total_size} is not a multiple of 4")));
    }
    let count = total_size / 4;
    let Some(last) = count.checked_sub(1) else {
        return Ok(None);
    };
    let last = u32::try_from(last)
        .map_err(|_| Error::InvalidSize(format!("{count} records exceed the u32 key space")))?;
    Ok(Some(last))
}

pub fn create_file_with_shuffled_ascending_integers<R: Rng + ?Sized>(
    path: impl AsRef<Path>,
    total_size: u64,
    rng: &mut R,
) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), total_size, "generating shuffled ascending integers");
    let mut file = File::create(path)?;
    write_shuffled_ascending(&mut file, total_size, rng)
}
