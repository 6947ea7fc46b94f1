//! Human-readable size parsing for the body limit option.

use crate::error::{ProxyError, Result};

/// Parse a size string like `"1mb"`, `"512kb"`, `"64b"` or a bare byte
/// count into bytes. Units are binary (1 kb = 1024 bytes) and
/// case-insensitive; fractional values are allowed (`"1.5kb"` = 1536).
pub fn parse_size(input: &str) -> Result<usize> {
    let spec = input.trim().to_ascii_lowercase();

    let (number, multiplier) = if let Some(value) = spec.strip_suffix("gb") {
        (value, 1024u64 * 1024 * 1024)
    } else if let Some(value) = spec.strip_suffix("mb") {
        (value, 1024 * 1024)
    } else if let Some(value) = spec.strip_suffix("kb") {
        (value, 1024)
    } else if let Some(value) = spec.strip_suffix('b') {
        (value, 1)
    } else {
        (spec.as_str(), 1)
    };

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| ProxyError::Config(format!("invalid size limit '{input}'")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ProxyError::Config(format!("invalid size limit '{input}'")));
    }

    Ok((value * multiplier as f64) as usize)
}
