//! Duration literals such as `300ms`, `1h30m` or `1.5h`.
//!
//! A literal is an optional sign followed by one or more `<decimal><unit>`
//! segments. Recognised units are `ns`, `us` (also `µs`/`μs`), `ms`, `s`,
//! `m` and `h`. The bare literal `0` needs no unit. Results are capped at
//! `u64::MAX` nanoseconds and negative durations are rejected because
//! [`Duration`] is unsigned.

use std::time::Duration;

use thiserror::Error;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Errors produced while parsing a duration literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DurationError {
    /// The literal does not follow the `<decimal><unit>` grammar.
    #[error("invalid duration {input:?}")]
    Invalid {
        /// Text that failed to parse.
        input: String,
    },
    /// A numeric segment was not followed by a unit.
    #[error("missing unit in duration {input:?}")]
    MissingUnit {
        /// Text that failed to parse.
        input: String,
    },
    /// A segment used a unit outside the recognised set.
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// Unit text as written.
        unit: String,
        /// Text that failed to parse.
        input: String,
    },
    /// The literal denotes a negative, non-zero duration.
    #[error("negative duration {input:?} is not supported")]
    Negative {
        /// Text that failed to parse.
        input: String,
    },
    /// The literal exceeds the representable range.
    #[error("duration {input:?} is out of range")]
    Overflow {
        /// Text that failed to parse.
        input: String,
    },
}

/// Parses a duration literal.
///
/// # Errors
///
/// Returns a [`DurationError`] describing why `input` is not a valid,
/// non-negative duration.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use envflag::duration::parse_duration;
///
/// # fn main() -> Result<(), envflag::duration::DurationError> {
/// assert_eq!(parse_duration("2h")?, Duration::from_secs(7200));
/// assert_eq!(parse_duration("1m30.5s")?, Duration::from_millis(90_500));
/// # Ok(())
/// # }
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let (negative, body) = match input.as_bytes().first() {
        Some(b'-') => (true, input.get(1..).unwrap_or_default()),
        Some(b'+') => (false, input.get(1..).unwrap_or_default()),
        _ => (false, input),
    };
    if body == "0" {
        return Ok(Duration::ZERO);
    }
    if body.is_empty() {
        return Err(DurationError::Invalid {
            input: input.to_owned(),
        });
    }

    let mut total: u128 = 0;
    let mut rest = body;
    while !rest.is_empty() {
        let (nanos, remaining) = parse_segment(rest, input)?;
        total = total
            .checked_add(nanos)
            .ok_or_else(|| DurationError::Overflow {
                input: input.to_owned(),
            })?;
        rest = remaining;
    }

    let nanos = u64::try_from(total).map_err(|_| DurationError::Overflow {
        input: input.to_owned(),
    })?;
    if negative && nanos > 0 {
        return Err(DurationError::Negative {
            input: input.to_owned(),
        });
    }
    Ok(Duration::from_nanos(nanos))
}

/// Parses one `<decimal><unit>` segment, returning its length in
/// nanoseconds and the unparsed remainder.
fn parse_segment<'a>(segment: &'a str, input: &str) -> Result<(u128, &'a str), DurationError> {
    let invalid = || DurationError::Invalid {
        input: input.to_owned(),
    };
    let overflow = || DurationError::Overflow {
        input: input.to_owned(),
    };

    let (whole_digits, after_whole) = split_digits(segment);
    let (fraction_digits, after_number) = match after_whole.strip_prefix('.') {
        Some(tail) => split_digits(tail),
        None => ("", after_whole),
    };
    if whole_digits.is_empty() && fraction_digits.is_empty() {
        return Err(invalid());
    }

    let unit_len = after_number
        .find(|c: char| c == '.' || c.is_ascii_digit())
        .unwrap_or(after_number.len());
    let (unit, remaining) = after_number.split_at(unit_len);
    if unit.is_empty() {
        return Err(DurationError::MissingUnit {
            input: input.to_owned(),
        });
    }
    let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
        unit: unit.to_owned(),
        input: input.to_owned(),
    })?;

    let whole = digits_value(whole_digits)
        .and_then(|value| value.checked_mul(scale))
        .ok_or_else(overflow)?;
    let fraction = fraction_nanos(fraction_digits, scale);
    let nanos = whole.checked_add(fraction).ok_or_else(overflow)?;
    Ok((nanos, remaining))
}

fn split_digits(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text.split_at(end)
}

fn digits_value(digits: &str) -> Option<u128> {
    digits.bytes().try_fold(0_u128, |acc, digit| {
        acc.checked_mul(10)?
            .checked_add(u128::from(digit.saturating_sub(b'0')))
    })
}

/// Contribution of the fractional digits, truncated to whole nanoseconds.
///
/// Digits beyond nanosecond precision of the largest unit are ignored.
fn fraction_nanos(digits: &str, scale: u128) -> u128 {
    let mut numerator: u128 = 0;
    let mut denominator: u128 = 1;
    for digit in digits.bytes().take(20) {
        numerator = numerator * 10 + u128::from(digit.saturating_sub(b'0'));
        denominator *= 10;
    }
    (numerator * scale).div_euclid(denominator)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(60 * NANOS_PER_SECOND),
        "h" => Some(3_600 * NANOS_PER_SECOND),
        _ => None,
    }
}

/// Formats `duration` in the same grammar [`parse_duration`] accepts, for
/// example `2h0m0s`, `1.5s` or `300ms`.
///
/// ```rust
/// use std::time::Duration;
/// use envflag::duration::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h30m0s");
/// assert_eq!(format_duration(Duration::from_millis(300)), "300ms");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return String::from("0s");
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}\u{b5}s", decimal(nanos, 1_000, 3));
    }
    if nanos < NANOS_PER_SECOND {
        return format!("{}ms", decimal(nanos, 1_000_000, 6));
    }

    let seconds = duration.as_secs();
    let hours = seconds.div_euclid(3_600);
    let minutes = seconds.div_euclid(60).rem_euclid(60);
    let sub_minute = u128::from(seconds.rem_euclid(60)) * NANOS_PER_SECOND
        + u128::from(duration.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&decimal(sub_minute, NANOS_PER_SECOND, 9));
    out.push('s');
    out
}

/// Renders `value / scale` with trailing fractional zeros removed.
fn decimal(value: u128, scale: u128, width: usize) -> String {
    let whole = value.div_euclid(scale);
    let fraction = value.rem_euclid(scale);
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
