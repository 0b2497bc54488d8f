//! Parser for the ISO 8601 durations the video API reports (`PT1H2M3S`, `P1DT4H`).
//!
//! Anything that is not a digit is skipped, which drops the `P`/`T` markers. Each
//! digit run must be followed by one of `D`, `H`, `M` or `S`.

use std::time::Duration;

use crate::errors::AppError;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        'D' => Some(SECONDS_PER_DAY),
        'H' => Some(SECONDS_PER_HOUR),
        'M' => Some(SECONDS_PER_MINUTE),
        'S' => Some(1),
        _ => None,
    }
}

pub fn parse_iso8601_duration(input: &str) -> Result<Duration, AppError> {
    let mut total: u64 = 0;
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            chars.next();
            continue;
        }

        let mut value: u64 = 0;
        while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .ok_or_else(|| AppError::Parse(format!("duration value overflows: {}", input)))?;
            chars.next();
        }

        let unit = chars.next().ok_or_else(|| {
            AppError::Parse(format!("duration ends without a unit after {}: {}", value, input))
        })?;
        let seconds = unit_seconds(unit)
            .ok_or_else(|| AppError::Parse(format!("unknown unit: {}", unit)))?;

        total = value
            .checked_mul(seconds)
            .and_then(|s| total.checked_add(s))
            .ok_or_else(|| AppError::Parse(format!("duration overflows: {}", input)))?;
    }

    Ok(Duration::from_secs(total))
}
