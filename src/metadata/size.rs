/// Binary units above bytes, smallest first.
const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

/// Format a byte count using the largest binary unit whose value is at least 1.
///
/// Counts below 1 KiB are printed as whole bytes. Anything past the last
/// unit stays in TiB.
pub fn format_size(bytes: u64) -> String {
    const STEP: f64 = 1024.0;

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / STEP;
    let mut unit = 0;
    // Compare the value as printed, so 1048575 becomes 1.00 MiB and not 1024.00 KiB
    while (value * 100.0).round() / 100.0 >= STEP && unit + 1 < UNITS.len() {
        value /= STEP;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}
