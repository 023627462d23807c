// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Quantity string parser.
//!
//! Accepted grammar: an optional sign, a decimal number (`5`, `5.`, `.5`,
//! `1.25`) and an optional unit suffix. Suffixes come in three families:
//! binary SI (`Ki`..`Ei`), decimal SI (`n`, `u`, `m`, `k`, `M`..`E`) and a
//! decimal exponent (`e3`, `E-2`).

use crate::error::{QuantityFormatError, Result};
use crate::quantity::{Quantity, QuantityFormat};

/// How a suffix scales the parsed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Multiplier {
    /// Multiply by `1024^n`.
    Binary(u32),
    /// Multiply by `10^n`.
    Decimal(i32),
}

pub(crate) fn parse_quantity(raw: &str) -> Result<Quantity> {
    if raw.is_empty() {
        return Err(QuantityFormatError::Empty);
    }

    let (negative, rest) = match raw.as_bytes()[0] {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };

    let int_len = leading_digits(rest);
    let (int_digits, rest) = rest.split_at(int_len);
    let (frac_digits, suffix) = match rest.strip_prefix('.') {
        Some(after_dot) => after_dot.split_at(leading_digits(after_dot)),
        None => ("", rest),
    };
    if int_digits.is_empty() && frac_digits.is_empty() {
        return Err(QuantityFormatError::InvalidNumber { raw: raw.to_string() });
    }

    let (multiplier, format) = parse_suffix(raw, suffix)?;
    let out_of_range = || QuantityFormatError::OutOfRange { raw: raw.to_string() };

    // Trailing fractional zeros carry no value and would only risk overflow.
    let frac_digits = frac_digits.trim_end_matches('0');
    let mut mantissa: i128 = 0;
    for digit in int_digits.bytes().chain(frac_digits.bytes()) {
        mantissa = mantissa
            .checked_mul(10)
            .and_then(|m| m.checked_add(i128::from(digit - b'0')))
            .ok_or_else(out_of_range)?;
    }
    let mut scale = -i32::try_from(frac_digits.len()).map_err(|_| out_of_range())?;

    match multiplier {
        Multiplier::Binary(power) => {
            let factor = 1024i128.checked_pow(power).ok_or_else(out_of_range)?;
            mantissa = mantissa.checked_mul(factor).ok_or_else(out_of_range)?;
        }
        Multiplier::Decimal(exp) => {
            scale = scale.checked_add(exp).ok_or_else(out_of_range)?;
        }
    }

    if negative {
        mantissa = -mantissa;
    }
    Quantity::from_parts(mantissa, scale, format).ok_or_else(out_of_range)
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

fn parse_suffix(raw: &str, suffix: &str) -> Result<(Multiplier, QuantityFormat)> {
    use Multiplier::{Binary, Decimal};
    use QuantityFormat::{BinarySi, DecimalExponent, DecimalSi};

    let parsed = match suffix {
        "" => (Decimal(0), DecimalSi),
        "Ki" => (Binary(1), BinarySi),
        "Mi" => (Binary(2), BinarySi),
        "Gi" => (Binary(3), BinarySi),
        "Ti" => (Binary(4), BinarySi),
        "Pi" => (Binary(5), BinarySi),
        "Ei" => (Binary(6), BinarySi),
        "n" => (Decimal(-9), DecimalSi),
        "u" => (Decimal(-6), DecimalSi),
        "m" => (Decimal(-3), DecimalSi),
        "k" | "K" => (Decimal(3), DecimalSi),
        "M" => (Decimal(6), DecimalSi),
        "G" => (Decimal(9), DecimalSi),
        "T" => (Decimal(12), DecimalSi),
        "P" => (Decimal(15), DecimalSi),
        "E" => (Decimal(18), DecimalSi),
        _ => return parse_exponent(raw, suffix).map(|exp| (Decimal(exp), DecimalExponent)),
    };
    Ok(parsed)
}

fn parse_exponent(raw: &str, suffix: &str) -> Result<i32> {
    let unknown = || QuantityFormatError::UnknownSuffix {
        raw: raw.to_string(),
        suffix: suffix.to_string(),
    };

    let exponent = suffix.strip_prefix(['e', 'E']).ok_or_else(unknown)?;
    let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
    if digits.is_empty() || leading_digits(digits) != digits.len() {
        return Err(unknown());
    }
    exponent.parse().map_err(|_| QuantityFormatError::OutOfRange { raw: raw.to_string() })
}
