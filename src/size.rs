//! Byte-count helpers: record alignment and human-readable sizes.

use crate::error::{Error, Result};

/// Width of one record in bytes.
pub const RECORD_SIZE: u64 = 4;

/// Rounds `size` up so the result splits evenly into 4-byte records.
pub fn round_up_to_multiple_of_4(size: u64) -> u64 {
    size.div_ceil(RECORD_SIZE) * RECORD_SIZE
}

const UNITS: &[(&str, u64)] = &[
    ("kib", 1 << 10),
    ("mib", 1 << 20),
    ("gib", 1 << 30),
    ("tib", 1 << 40),
    ("kb", 1_000),
    ("mb", 1_000_000),
    ("gb", 1_000_000_000),
    ("tb", 1_000_000_000_000),
    ("k", 1_000),
    ("m", 1_000_000),
    ("g", 1_000_000_000),
    ("t", 1_000_000_000_000),
    ("b", 1),
];

/// Parses a raw byte count (`"4096"`) or a magnitude such as `"1MB"`,
/// `"1.5 GiB"` or `"64k"`. Decimal suffixes are powers of 1000, `*iB`
/// suffixes powers of 1024.
pub fn parse_size(input: &str) -> Result<u64> {
    let invalid = || Error::InvalidSize(input.to_string());
    let normalized = input.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(invalid());
    }

    let split = normalized
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(normalized.len());
    let (number, suffix) = normalized.split_at(split);
    let suffix = suffix.trim();

    let multiplier = if suffix.is_empty() {
        1
    } else {
        UNITS
            .iter()
            .find(|(unit, _)| *unit == suffix)
            .map(|(_, m)| *m)
            .ok_or_else(invalid)?
    };

    if let Ok(whole) = number.parse::<u64>() {
        return whole.checked_mul(multiplier).ok_or_else(invalid);
    }
    let value: f64 = number.parse().map_err(|_| invalid())?;
    let bytes = (value * multiplier as f64).round();
    if !bytes.is_finite() || bytes < 0.0 || bytes > u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(bytes as u64)
}

/// Renders `size` with decimal units, e.g. `1 MB`, `1.5 GB`, `999 bytes`.
pub fn format_size(size: u64) -> String {
    const DECIMAL: &[&str] = &["KB", "MB", "GB", "TB", "PB", "EB"];
    if size < 1_000 {
        return if size == 1 {
            "1 byte".to_string()
        } else {
            format!("{size} bytes")
        };
    }
    let mut value = size as f64;
    let mut unit = "";
    for candidate in DECIMAL {
        value /= 1_000.0;
        unit = candidate;
        if value < 1_000.0 {
            break;
        }
    }
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text} {unit}")
}
