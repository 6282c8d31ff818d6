//! Opt-in dump of every rectangle the processor applies.
//!
//! Enabled by `RFB_DECODE_TRACE=1` or `decoding.trace_payloads = true`.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};

/// Bytes of each payload shown in a hexdump.
pub const HEXDUMP_LIMIT: usize = 256;

static TRACE_ENABLED: Lazy<AtomicBool> = Lazy::new(|| {
    let on = std::env::var("RFB_DECODE_TRACE")
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE"))
        .unwrap_or(false);
    AtomicBool::new(on)
});

#[inline]
pub fn enabled() -> bool {
    TRACE_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn set_enabled(on: bool) {
    TRACE_ENABLED.store(on, Ordering::Relaxed)
}

#[inline]
pub fn in_msg(name: &str, fields: &str) {
    if enabled() {
        tracing::info!(target: "protocol_trace", "IN  {} {}", name, fields);
    }
}

pub fn hexdump(prefix: &str, data: &[u8], max: usize) {
    if !enabled() || data.is_empty() {
        return;
    }
    for line in hex_lines(data, max) {
        tracing::info!(target: "protocol_trace", "{}{}", prefix, line);
    }
}

/// Format up to `max` bytes as rows of 16 space-separated hex pairs.
fn hex_lines(data: &[u8], max: usize) -> Vec<String> {
    use std::fmt::Write as _;

    let max = max.min(data.len());
    data[..max]
        .chunks(16)
        .map(|row| {
            let mut line = String::with_capacity(row.len() * 3);
            for b in row {
                let _ = write!(line, " {:02X}", b);
            }
            line
        })
        .collect()
}
