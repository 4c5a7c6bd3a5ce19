//! Shared formatting utilities for size and duration display

use console::Emoji;

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊", "~");

/// Microscope emoji for analysis/inspection
pub const MICROSCOPE: Emoji = Emoji("🔍", ">>");

/// Hourglass emoji for timing
pub const HOURGLASS: Emoji = Emoji("⏳", "..");

/// Format bytes as human-readable size string
///
/// # Examples
///
/// ```
/// use compile_stats::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a millisecond duration for the summary table
///
/// # Examples
///
/// ```
/// use compile_stats::fmt::format_duration_ms;
///
/// assert_eq!(format_duration_ms(850), "850 ms");
/// assert_eq!(format_duration_ms(1234), "1.23 s");
/// assert_eq!(format_duration_ms(125_000), "2m 05s");
/// ```
pub fn format_duration_ms(ms: u64) -> String {
    if ms >= 60_000 {
        let secs = ms / 1000;
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else if ms >= 1000 {
        format!("{:.2} s", ms as f64 / 1000.0)
    } else {
        format!("{} ms", ms)
    }
}
