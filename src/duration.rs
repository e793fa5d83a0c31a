//! Human-friendly durations: `"1h 30m"` in, `"1:30:00"` out.

use crate::error::ConfigError;

/// Convert a human duration such as `"1h 30m"` to seconds.
///
/// Each whitespace-separated part is an integer followed by a unit letter
/// (`s`, `m`, `h` or `d`). A leading `-` negates the whole duration, so
/// `"-1m"` is sixty seconds before zero.
pub fn parse_duration(input: &str) -> Result<i64, ConfigError> {
    if let Some(rest) = input.strip_prefix('-') {
        return Ok(-parse_duration(rest)?);
    }

    let mut total: i64 = 0;
    for part in input.split_whitespace() {
        let invalid = |reason: &str| ConfigError::InvalidDuration {
            input: input.to_string(),
            reason: format!("invalid part '{part}': {reason}"),
        };
        let unit = part.chars().last().unwrap_or_default();
        let amount = &part[..part.len() - unit.len_utf8()];
        let multiplier = match unit {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            'd' => 86400,
            _ => return Err(invalid("expected a unit of s, m, h or d")),
        };
        let amount: i64 = amount.parse().map_err(|_| invalid("expected an integer"))?;
        total += amount * multiplier;
    }
    Ok(total)
}

/// Format seconds as `MM:SS`, or `H:MM:SS` once there is an hour part.
/// Negative durations get a leading `-`.
pub fn fmt_duration(seconds: i64) -> String {
    if seconds < 0 {
        return format!("-{}", fmt_duration(-seconds));
    }
    let (minutes, seconds) = (seconds / 60, seconds % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_units() {
        assert_eq!(parse_duration("5m").unwrap(), 300);
        assert_eq!(parse_duration("90s").unwrap(), 90);
        assert_eq!(parse_duration("2h").unwrap(), 7200);
        assert_eq!(parse_duration("1d").unwrap(), 86400);
    }

    #[test]
    fn parts_are_summed() {
        assert_eq!(parse_duration("1h 30m").unwrap(), 5400);
        assert_eq!(parse_duration("1m 30s").unwrap(), 90);
    }

    #[test]
    fn leading_minus_negates_everything() {
        assert_eq!(parse_duration("-1m").unwrap(), -60);
        assert_eq!(parse_duration("-1h 30m").unwrap(), -5400);
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(parse_duration("").unwrap(), 0);
    }

    #[test]
    fn bad_unit_is_an_error() {
        let err = parse_duration("5x").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDuration { .. }));
    }

    #[test]
    fn missing_amount_is_an_error() {
        assert!(parse_duration("m").is_err());
        assert!(parse_duration("1h soon").is_err());
    }

    #[test]
    fn formats_with_and_without_hours() {
        assert_eq!(fmt_duration(0), "00:00");
        assert_eq!(fmt_duration(90), "01:30");
        assert_eq!(fmt_duration(5400), "1:30:00");
        assert_eq!(fmt_duration(-90), "-01:30");
    }
}
