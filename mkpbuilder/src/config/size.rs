//! Human-readable sizes.

const UNITS: [&str; 4] = ["B", "K", "M", "G"];

/// Format a byte count using 1024-based units.
///
/// Each step divides by 1024 and truncates, so sizes are never rounded up.
///
/// # Examples
///
/// ```
/// use mkpbuilder::config::format_size;
///
/// assert_eq!(format_size(512), "512B");
/// assert_eq!(format_size(1536), "1K");
/// assert_eq!(format_size(5 * 1024 * 1024 - 1), "4M");
/// ```
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes;
    for unit in UNITS {
        if size < 1024 {
            return format!("{}{}", size, unit);
        }
        size /= 1024;
    }
    format!("{}T", size)
}
