/// Round to one decimal place, e.g. for display percentages
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole` as a percentage rounded to one decimal, 0.0 when `whole` is zero
pub fn percentage(part: u64, whole: u64) -> f64 {
    match whole {
        positive if positive > 0 => round_tenth(part as f64 / whole as f64 * 100.0),
        _ => 0.0,
    }
}
