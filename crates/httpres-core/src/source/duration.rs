//! Duration strings of the form `300ms`, `30s`, `5m`, `1h30m`, `1.5h`.
//!
//! A sequence of decimal numbers, each with an optional fraction and a
//! mandatory unit (`ns`, `us`, `µs`, `ms`, `s`, `m`, `h`). A bare `0` is
//! accepted without a unit. Negative values are rejected.

use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Maximum fraction digits considered; the rest cannot change the result.
const MAX_FRACTION_DIGITS: usize = 18;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let n = s.bytes().take_while(u8::is_ascii_digit).count();
    s.split_at(n)
}

/// Parses a duration string. The error is a human-readable reason.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let mut s = input;
    let mut negative = false;
    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }

    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: u128 = 0;
    while !s.is_empty() {
        let (int_part, rest) = split_digits(s);
        let (frac_part, rest) = match rest.strip_prefix('.') {
            Some(after_dot) => split_digits(after_dot),
            None => ("", rest),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(format!("expected a number at {s:?}"));
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, rest) = rest.split_at(unit_len);
        if unit.is_empty() {
            return Err("missing unit".to_string());
        }
        let scale = unit_nanos(unit).ok_or_else(|| format!("unknown unit {unit:?}"))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| "value out of range".to_string())?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| "value out of range".to_string())?;

        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
            let frac: u128 = digits
                .parse()
                .map_err(|_| "value out of range".to_string())?;
            nanos += frac * scale / 10u128.pow(digits.len() as u32);
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| "value out of range".to_string())?;
        s = rest;
    }

    if negative && total != 0 {
        return Err("negative durations are not allowed".to_string());
    }
    let total = u64::try_from(total).map_err(|_| "value out of range".to_string())?;
    Ok(Duration::from_nanos(total))
}
