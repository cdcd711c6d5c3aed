/// Relative change from `previous` to `current`, as shown next to a period
/// total: `"+20"`, `"-12"`, `"0"`, or `"+∞"` when there is nothing to compare
/// against.
pub fn percentage_change(current: u64, previous: u64) -> String {
    if previous == 0 {
        return if current > 0 { "+∞".into() } else { "0".into() };
    }
    let ratio = (current as f64 - previous as f64) * 100.0 / previous as f64;
    // Half-up rounding, so -12.5 becomes -12.
    let pct = (ratio + 0.5).floor() as i64;
    if pct > 0 {
        format!("+{pct}")
    } else {
        pct.to_string()
    }
}

/// `45m`, `1h`, `1h 15m`.
pub fn format_minutes(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let hours = minutes / 60;
    match minutes % 60 {
        0 => format!("{hours}h"),
        rest => format!("{hours}h {rest}m"),
    }
}

/// Hours with at most one decimal: `0h`, `1.5h`, `12h`.
pub fn format_hours(minutes: u64) -> String {
    let tenths = minutes.saturating_mul(10).saturating_add(30) / 60;
    if tenths % 10 == 0 {
        format!("{}h", tenths / 10)
    } else {
        format!("{}.{}h", tenths / 10, tenths % 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_change_without_baseline() {
        assert_eq!(percentage_change(0, 0), "0");
        assert_eq!(percentage_change(30, 0), "+∞");
    }

    #[test]
    fn percentage_change_signs() {
        assert_eq!(percentage_change(50, 100), "-50");
        assert_eq!(percentage_change(150, 100), "+50");
        assert_eq!(percentage_change(100, 100), "0");
        assert_eq!(percentage_change(0, 40), "-100");
    }

    #[test]
    fn percentage_change_rounds_half_up() {
        // -12.5 and +12.5
        assert_eq!(percentage_change(35, 40), "-12");
        assert_eq!(percentage_change(45, 40), "+13");
        assert_eq!(percentage_change(1, 3), "-67");
    }

    #[test]
    fn minutes_formatting() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(60), "1h");
        assert_eq!(format_minutes(75), "1h 15m");
    }

    #[test]
    fn hours_formatting() {
        assert_eq!(format_hours(0), "0h");
        assert_eq!(format_hours(90), "1.5h");
        assert_eq!(format_hours(60), "1h");
        assert_eq!(format_hours(721), "12h");
        assert_eq!(format_hours(10), "0.2h");
        assert_eq!(format_hours(u64::MAX), "30744573456182586h");
    }
}
