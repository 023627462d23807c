// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

// Printing a quantity and parsing it again must preserve its value, whatever
// unit family it is printed in.
use proptest::prelude::*;
use resource_quantity::{Quantity, QuantityFormat, QuantityFormatError};

const SUFFIXES: &[&str] = &[
    "", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "n", "u", "m", "k", "K", "M", "G", "T", "P", "E", "e3",
    "e-7", "E+12", "e0",
];

fn quantity_string() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", "+", "-"]),
        "[0-9]{1,6}",
        prop::option::of("[0-9]{0,6}"),
        prop::sample::select(SUFFIXES.to_vec()),
    )
        .prop_map(|(sign, int, frac, suffix)| match frac {
            Some(frac) => format!("{sign}{int}.{frac}{suffix}"),
            None => format!("{sign}{int}{suffix}"),
        })
}

// Up to six fractional digits keep the scale inside the accepted window.
fn wide_exponent_string() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", "-"]),
        "[1-9][0-9]{0,5}",
        "[0-9]{0,6}",
        -999_990i32..=999_990,
    )
        .prop_map(|(sign, int, frac, exp)| format!("{sign}{int}.{frac}e{exp}"))
}

fn any_format() -> impl Strategy<Value = QuantityFormat> {
    prop::sample::select(vec![
        QuantityFormat::BinarySi,
        QuantityFormat::DecimalSi,
        QuantityFormat::DecimalExponent,
    ])
}

proptest! {
    #[test]
    fn proptest_format_then_parse_preserves_value(raw in quantity_string()) {
        let parsed: Quantity = raw.parse().unwrap();
        let printed = parsed.to_string();
        let reparsed: Quantity = printed.parse().unwrap();
        prop_assert_eq!(reparsed, parsed, "{} printed as {}", raw, printed);
    }

    #[test]
    fn proptest_every_format_round_trips(raw in quantity_string(), format in any_format()) {
        let parsed: Quantity = raw.parse().unwrap();
        let printed = parsed.with_format(format).to_string();
        let reparsed: Quantity = printed.parse().unwrap();
        prop_assert_eq!(reparsed, parsed, "{} printed as {}", raw, printed);
    }

    #[test]
    fn proptest_canonical_form_is_stable(raw in quantity_string()) {
        let once = raw.parse::<Quantity>().unwrap().to_string();
        let twice = once.parse::<Quantity>().unwrap().to_string();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn proptest_wide_exponents_round_trip(raw in wide_exponent_string(), format in any_format()) {
        let parsed: Quantity = raw.parse().unwrap();
        let printed = parsed.with_format(format).to_string();
        let reparsed: Quantity = printed.parse().unwrap();
        prop_assert_eq!(reparsed, parsed, "{} printed as {}", raw, printed);
    }

    #[test]
    fn proptest_any_exponent_parses_or_is_out_of_range(exp in any::<i32>()) {
        match format!("7e{exp}").parse::<Quantity>() {
            Ok(parsed) => {
                let reparsed: Quantity = parsed.to_string().parse().unwrap();
                prop_assert_eq!(reparsed, parsed);
            }
            Err(err) => prop_assert!(
                matches!(err, QuantityFormatError::OutOfRange { .. }),
                "7e{} failed with {}",
                exp,
                err
            ),
        }
    }

    #[test]
    fn proptest_wide_exponents_order_by_value(
        a in wide_exponent_string(),
        b in wide_exponent_string(),
    ) {
        let qa: Quantity = a.parse().unwrap();
        let qb: Quantity = b.parse().unwrap();
        prop_assert_eq!(qa.cmp(&qb), qb.cmp(&qa).reverse());
        prop_assert_eq!(qa.cmp(&qb) == std::cmp::Ordering::Equal, qa == qb);
    }

    #[test]
    fn proptest_ordering_matches_integer_order(
        a in -1_000_000i64..1_000_000,
        b in -1_000_000i64..1_000_000,
    ) {
        let qa = Quantity::from_milli(a.into());
        let qb = Quantity::from_milli(b.into());
        prop_assert_eq!(qa.cmp(&qb), a.cmp(&b));
    }
}
