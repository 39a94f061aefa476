//! Shared formatting helpers for the report renderers.
//!
//! All pure formatting functions (no colour, no layout) live here.

/// Binary unit suffixes used by [`format_bytes`].
const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

/// Format byte count as human-readable size with a 1024 divisor.
///
/// `"0 B"`, `"512 B"`, `"1.0 KiB"`, `"476.9 GiB"`
pub fn format_bytes(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// Format a kibibyte count, as found in `/proc/meminfo`.
pub fn format_kib(kib: u64) -> String {
    format_bytes(kib.saturating_mul(1024))
}

/// Format a frequency in MHz.
///
/// Values of 1000 MHz and above are shown in GHz with one truncated
/// decimal: `"800 MHz"`, `"2.4 GHz"`.
pub fn format_frequency(mhz: f64) -> String {
    let whole = mhz.max(0.0) as u64;
    if whole >= 1000 {
        format!("{}.{} GHz", whole / 1000, whole % 1000 / 100)
    } else {
        format!("{} MHz", whole)
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Format an uptime in seconds.
///
/// Leading zero components are omitted:
/// `"42 seconds"`, `"1 hour, 0 minutes, 5 seconds"`.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = secs % 86400 / 3600;
    let minutes = secs % 3600 / 60;
    let seconds = secs % 60;

    let mut parts = Vec::with_capacity(4);
    if days > 0 {
        parts.push(plural(days, "day"));
    }
    if days > 0 || hours > 0 {
        parts.push(plural(hours, "hour"));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        parts.push(plural(minutes, "minute"));
    }
    parts.push(plural(seconds, "second"));
    parts.join(", ")
}

/// Format a percentage with one decimal: `"75.0%"`.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Cuts `s` to at most `max` characters, ending in `...` when shortened.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}
