/// `part / whole * 100`, or 0 when nothing has been attempted
pub fn percentage(part: u64, whole: u64) -> f64 {
    match whole {
        positive if positive > 0 => part as f64 / whole as f64 * 100.0,
        _ => 0.0,
    }
}

/// Rounded percentage as shown to the learner, e.g. "67%"
pub fn format_percentage(pct: f64) -> String {
    format!("{:.0}%", pct)
}
