use std::time::Duration;

use crate::error::ValidationError;

use super::run::{InvalidRatio, PPM_PER_PERCENT};

/// Decimal places accepted for a percentage (ppm resolution).
const PERCENT_MAX_DECIMALS: usize = 4;

/// Non-exponent decimal text split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DecimalText<'text> {
    pub(crate) negative: bool,
    pub(crate) whole: &'text str,
    pub(crate) fraction: &'text str,
}

impl DecimalText<'_> {
    pub(crate) fn is_zero(&self) -> bool {
        self.whole.bytes().all(|b| b == b'0') && self.fraction.bytes().all(|b| b == b'0')
    }
}

/// Splits `[-+]digits[.digits]` text. Returns `None` for anything else,
/// including `NaN`, `inf`, and exponent notation.
pub(crate) fn parse_decimal(text: &str) -> Option<DecimalText<'_>> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !digits_only(whole) || !digits_only(fraction) {
        return None;
    }
    Some(DecimalText {
        negative,
        whole,
        fraction,
    })
}

/// Parses the whole-number part of a non-negative decimal, flooring any
/// fraction. Leading zeros and an empty whole part read as zero.
pub(crate) fn floor_decimal(decimal: &DecimalText<'_>) -> Option<u64> {
    let whole = decimal.whole.trim_start_matches('0');
    if whole.is_empty() {
        return Some(0);
    }
    whole.parse().ok()
}

/// Parses percent text such as `0.25` into an exact ratio.
///
/// Negative input parses to its magnitude with the sign reported separately so
/// callers can reject it as out of range rather than malformed.
pub(crate) fn parse_percent(text: &str) -> Option<(bool, InvalidRatio)> {
    let decimal = parse_decimal(text)?;
    if decimal.fraction.len() > PERCENT_MAX_DECIMALS {
        return None;
    }
    let whole = u32::try_from(floor_decimal(&decimal)?).ok()?;
    let mut fraction_digits = decimal.fraction.to_owned();
    while fraction_digits.len() < PERCENT_MAX_DECIMALS {
        fraction_digits.push('0');
    }
    let fraction: u32 = fraction_digits.parse().ok()?;
    let ppm = whole.checked_mul(PPM_PER_PERCENT)?.checked_add(fraction)?;
    Some((decimal.negative, InvalidRatio::from_ppm(ppm)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DefaultUnit {
    Millis,
    Seconds,
}

/// Digits of a fractional duration that still affect whole milliseconds.
const DURATION_FRACTION_DIGITS: usize = 9;

/// Parses `<digits>[.<digits>][ms|s|m|h]`, using `default_unit` when no
/// suffix is given.
///
/// Fractions are floored to whole milliseconds, so `10000.5` is `10000 ms`
/// and `1.5s` is `1500 ms`.
pub(crate) fn parse_duration_value(
    value: &str,
    default_unit: DefaultUnit,
) -> Result<Duration, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let digits_len = value.bytes().take_while(u8::is_ascii_digit).count();
    let (whole_part, rest) = value.split_at(digits_len);
    let (fraction_part, unit_part) = match rest.strip_prefix('.') {
        Some(after_dot) => {
            let fraction_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            after_dot.split_at(fraction_len)
        }
        None => ("", rest),
    };
    if whole_part.is_empty() && fraction_part.is_empty() {
        return Err(ValidationError::DurationNotNumber {
            value: value.to_owned(),
        });
    }

    let unit = match (unit_part, default_unit) {
        ("", DefaultUnit::Millis) => "ms",
        ("", DefaultUnit::Seconds) => "s",
        (unit, _) => unit,
    };
    let unit_ms: u64 = match unit {
        "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        _ => {
            return Err(ValidationError::InvalidDurationUnit {
                unit: unit.to_owned(),
            });
        }
    };

    let whole: u64 = if whole_part.is_empty() {
        0
    } else {
        whole_part
            .parse()
            .map_err(|_err| ValidationError::DurationOverflow)?
    };
    let whole_ms = whole
        .checked_mul(unit_ms)
        .ok_or(ValidationError::DurationOverflow)?;
    let total_ms = whole_ms
        .checked_add(fraction_millis(fraction_part, unit_ms))
        .ok_or(ValidationError::DurationOverflow)?;

    Ok(Duration::from_millis(total_ms))
}

/// Whole milliseconds contributed by `.<fraction>` of one `unit_ms`, floored.
fn fraction_millis(fraction: &str, unit_ms: u64) -> u64 {
    let kept = fraction.get(..DURATION_FRACTION_DIGITS).unwrap_or(fraction);
    if kept.is_empty() {
        return 0;
    }
    let numerator: u64 = kept.parse().unwrap_or(0);
    let scale = u32::try_from(kept.len())
        .ok()
        .and_then(|len| 10_u64.checked_pow(len))
        .unwrap_or(1);
    numerator
        .checked_mul(unit_ms)
        .and_then(|scaled| scaled.checked_div(scale))
        .unwrap_or(0)
}
