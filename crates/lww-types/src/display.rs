//! Helpers for rendering diagnostics.

use std::time::Duration;

/// Render bytes as ASCII if every byte is printable.
///
/// Bytes outside `32..=126` are replaced by `.` and a space-separated hex
/// dump of the whole input is appended in brackets, e.g. `a.b [61 00 62]`.
pub fn display_ascii(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut unsafe_bytes = false;
    for &b in bytes {
        if (32..=126).contains(&b) {
            out.push(b as char);
        } else {
            out.push('.');
            unsafe_bytes = true;
        }
    }
    if unsafe_bytes {
        let dump: Vec<String> = bytes.iter().map(|b| hex::encode([*b])).collect();
        out.push_str(" [");
        out.push_str(&dump.join(" "));
        out.push(']');
    }
    out
}

/// Round a duration to whole milliseconds for log output.
pub fn round_millis(d: Duration) -> Duration {
    let millis = (d.as_nanos() + 500_000) / 1_000_000;
    Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
}
