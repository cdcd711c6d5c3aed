//! Duration input parsing.
//!
//! A bare integer is minutes (`"45"` = 2700 s, at least one minute). An
//! integer with an `s` suffix is seconds (`"90s"`, at least one second).

use crate::error::DurationError;

/// Smallest duration accepted from a bare-minutes input.
pub const MIN_MINUTES_INPUT_SECS: u64 = 60;
/// Smallest duration accepted from a seconds input.
pub const MIN_SECONDS_INPUT_SECS: u64 = 1;
/// 999 minutes.
pub const MAX_DURATION_SECS: u64 = 999 * 60;

/// Parses user input into seconds.
pub fn parse_duration_input(input: &str) -> Result<u64, DurationError> {
    let trimmed = input.trim();
    let (digits, per_unit, min_secs) = match trimmed.strip_suffix(['s', 'S']) {
        Some(rest) => (rest.trim_end(), 1, MIN_SECONDS_INPUT_SECS),
        None => (trimmed, 60, MIN_MINUTES_INPUT_SECS),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DurationError::Unparseable(input.to_string()));
    }
    let value: u64 = digits
        .parse()
        .map_err(|_| DurationError::Unparseable(input.to_string()))?;
    let secs = value
        .checked_mul(per_unit)
        .ok_or_else(|| DurationError::Unparseable(input.to_string()))?;

    validate_duration_secs(secs)?;
    if secs < min_secs {
        return Err(DurationError::TooShort { secs, min_secs });
    }
    Ok(secs)
}

/// Bounds every configured duration must respect, however it was entered.
pub fn validate_duration_secs(secs: u64) -> Result<u64, DurationError> {
    if secs == 0 {
        return Err(DurationError::NonPositive);
    }
    if secs > MAX_DURATION_SECS {
        return Err(DurationError::TooLong {
            secs,
            max_secs: MAX_DURATION_SECS,
        });
    }
    Ok(secs)
}

/// `MM:SS`; minutes keep growing past 99.
pub fn format_countdown(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_integer_is_minutes() {
        assert_eq!(parse_duration_input("45"), Ok(2700));
        assert_eq!(parse_duration_input(" 1 "), Ok(60));
    }

    #[test]
    fn seconds_suffix() {
        assert_eq!(parse_duration_input("90s"), Ok(90));
        assert_eq!(parse_duration_input("1s"), Ok(1));
        assert_eq!(parse_duration_input("30 S"), Ok(30));
    }

    #[test]
    fn zero_is_rejected_in_both_forms() {
        assert_eq!(parse_duration_input("0"), Err(DurationError::NonPositive));
        assert_eq!(parse_duration_input("0s"), Err(DurationError::NonPositive));
    }

    #[test]
    fn malformed_input_is_rejected() {
        for input in ["", "s", "-5", "12m", "1.5", "abc", "5ss", "+3"] {
            assert!(
                matches!(parse_duration_input(input), Err(DurationError::Unparseable(_))),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn upper_bound() {
        assert_eq!(parse_duration_input("999"), Ok(MAX_DURATION_SECS));
        assert!(matches!(
            parse_duration_input("1000"),
            Err(DurationError::TooLong { .. })
        ));
        assert!(matches!(
            parse_duration_input("99999999999999999999"),
            Err(DurationError::Unparseable(_))
        ));
    }

    #[test]
    fn countdown_format() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(59), "00:59");
        assert_eq!(format_countdown(3600), "60:00");
        assert_eq!(format_countdown(125 * 60 + 7), "125:07");
    }
}
