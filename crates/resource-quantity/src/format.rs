// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Canonical quantity formatting.
//!
//! Binary quantities print with the largest `Ki`..`Ei` suffix that divides
//! them exactly. Decimal quantities print with an exponent that is a multiple
//! of three and an integer mantissa (`1.5` prints as `1500m`). Values that do
//! not fit a suffix fall back to exponent notation.

use crate::quantity::{pow10, Quantity, QuantityFormat};

const BINARY_SUFFIXES: [(u32, &str); 6] =
    [(6, "Ei"), (5, "Pi"), (4, "Ti"), (3, "Gi"), (2, "Mi"), (1, "Ki")];

const MAX_SI_EXPONENT: i32 = 18;

pub(crate) fn canonical(quantity: &Quantity) -> String {
    if quantity.is_zero() {
        return "0".to_string();
    }
    match quantity.format() {
        QuantityFormat::BinarySi => binary_si(quantity).unwrap_or_else(|| decimal_si(quantity)),
        QuantityFormat::DecimalSi => decimal_si(quantity),
        QuantityFormat::DecimalExponent => {
            let (mantissa, exponent) = engineering(quantity);
            exponent_notation(mantissa, exponent)
        }
    }
}

fn binary_si(quantity: &Quantity) -> Option<String> {
    let value = quantity.to_i128()?;
    BINARY_SUFFIXES.iter().find_map(|&(power, suffix)| {
        let unit = 1024i128.checked_pow(power)?;
        (value % unit == 0).then(|| format!("{}{suffix}", value / unit))
    })
}

fn decimal_si(quantity: &Quantity) -> String {
    let (mut mantissa, mut exponent) = engineering(quantity);

    if exponent > MAX_SI_EXPONENT {
        let folded = pow10(exponent - MAX_SI_EXPONENT).and_then(|f| mantissa.checked_mul(f));
        match folded {
            Some(folded) => {
                mantissa = folded;
                exponent = MAX_SI_EXPONENT;
            }
            None => return exponent_notation(mantissa, exponent),
        }
    }

    match si_suffix(exponent) {
        Some(suffix) => format!("{mantissa}{suffix}"),
        None => exponent_notation(mantissa, exponent),
    }
}

/// Splits the value into an integer mantissa and an exponent that is a
/// multiple of three, never larger than the stored scale.
///
/// When widening the mantissa would overflow, the raw parts are returned; the
/// exponent is then not a multiple of three but the value stays exact.
fn engineering(quantity: &Quantity) -> (i128, i32) {
    let scale = quantity.scale();
    let exponent = scale.div_euclid(3) * 3;
    pow10(scale - exponent)
        .and_then(|factor| quantity.mantissa().checked_mul(factor))
        .map(|mantissa| (mantissa, exponent))
        .unwrap_or((quantity.mantissa(), scale))
}

fn si_suffix(exponent: i32) -> Option<&'static str> {
    let suffix = match exponent {
        -9 => "n",
        -6 => "u",
        -3 => "m",
        0 => "",
        3 => "k",
        6 => "M",
        9 => "G",
        12 => "T",
        15 => "P",
        18 => "E",
        _ => return None,
    };
    Some(suffix)
}

fn exponent_notation(mantissa: i128, exponent: i32) -> String {
    if exponent == 0 {
        mantissa.to_string()
    } else {
        format!("{mantissa}e{exponent}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    fn canonical(raw: &str) -> String {
        raw.parse::<crate::Quantity>().unwrap().to_string()
    }

    #[test]
    fn decimal_quantities_use_engineering_suffixes() {
        assert_eq!(canonical("1.5"), "1500m");
        assert_eq!(canonical("0.1"), "100m");
        assert_eq!(canonical("100m"), "100m");
        assert_eq!(canonical("2000"), "2k");
        assert_eq!(canonical("2K"), "2k");
        assert_eq!(canonical("1500"), "1500");
        assert_eq!(canonical("12000"), "12k");
        assert_eq!(canonical("250000000"), "250M");
        assert_eq!(canonical("-3000"), "-3k");
        assert_eq!(canonical("0.000000005"), "5n");
    }

    #[test]
    fn binary_quantities_pick_largest_exact_suffix() {
        assert_eq!(canonical("1024Ki"), "1Mi");
        assert_eq!(canonical("1536Ki"), "1536Ki");
        assert_eq!(canonical("1.5Gi"), "1536Mi");
        assert_eq!(canonical("2Gi"), "2Gi");
        assert_eq!(canonical("-4Mi"), "-4Mi");
    }

    #[test]
    fn small_or_fractional_binary_quantities_fall_back_to_decimal() {
        assert_eq!(canonical("0.5Ki"), "512");
        assert_eq!(canonical("0.001Ki"), "1024m");
    }

    #[test]
    fn exponent_quantities_keep_exponent_notation() {
        assert_eq!(canonical("1e3"), "1e3");
        assert_eq!(canonical("1.5e3"), "1500");
        assert_eq!(canonical("12e-1"), "1200e-3");
    }

    #[test]
    fn out_of_suffix_range_quantities() {
        assert_eq!(canonical("1e-12"), "1e-12");
        assert_eq!(canonical("0.0000000000015"), "1500e-15");
        assert_eq!(canonical("1000E"), "1000E");
        assert_eq!(canonical("1000000000000000000000"), "1000E");
        assert_eq!(canonical("1e21"), "1e21");
    }

    #[test]
    fn extreme_exponents_print_and_reparse() {
        assert_eq!(canonical("1e-1000000"), "100e-1000002");
        assert_eq!(canonical("1e1000000"), "10e999999");
        assert_eq!(canonical("100e-1000002"), "100e-1000002");
        assert_eq!(canonical("0e-2147483648"), "0");
    }

    #[test]
    fn exponents_beyond_the_scale_window_are_out_of_range() {
        for raw in ["1e-2147483647", "1e2147483647", "1e1000001", "1.5e-1000000"] {
            assert!(
                matches!(
                    raw.parse::<crate::Quantity>(),
                    Err(crate::QuantityFormatError::OutOfRange { .. })
                ),
                "{raw}"
            );
        }
    }

    #[test]
    fn zero_is_always_plain() {
        assert_eq!(canonical("0Gi"), "0");
        assert_eq!(canonical("0.000m"), "0");
        assert_eq!(canonical("0e5"), "0");
    }
}
