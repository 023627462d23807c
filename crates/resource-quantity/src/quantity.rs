// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::QuantityFormatError;
use crate::{format, parse};

/// Unit family a quantity was written in.
///
/// The family only affects how the quantity is printed; two quantities with
/// the same numeric value compare equal regardless of their family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuantityFormat {
    /// Powers of 1024: `Ki`, `Mi`, `Gi`, `Ti`, `Pi`, `Ei`.
    BinarySi,
    /// Powers of 1000: `n`, `u`, `m`, `k`, `M`, `G`, `T`, `P`, `E`, or no suffix.
    #[default]
    DecimalSi,
    /// Scientific notation: `1e3`, `5E-2`.
    DecimalExponent,
}

/// Largest decimal exponent a quantity may carry, in either direction.
///
/// Keeps exponent arithmetic in formatting and comparison far from `i32`
/// overflow.
pub(crate) const MAX_SCALE: i32 = 1_000_000;

/// An exact resource amount such as `100m` cpu or `2Gi` memory.
///
/// Stored as `mantissa * 10^scale` with no trailing zeros in the mantissa, so
/// equal values always have identical parts.
#[derive(Debug, Clone, Copy)]
pub struct Quantity {
    mantissa: i128,
    scale: i32,
    format: QuantityFormat,
}

impl Quantity {
    /// The zero quantity.
    pub const ZERO: Quantity = Quantity {
        mantissa: 0,
        scale: 0,
        format: QuantityFormat::DecimalSi,
    };

    /// Quantity equal to `value` units.
    pub fn from_integer(value: i128, format: QuantityFormat) -> Self {
        Self::build(value, 0, format)
    }

    /// Quantity equal to `value` thousandths of a unit (`250` is `250m`).
    pub fn from_milli(value: i128) -> Self {
        Self::build(value, -3, QuantityFormat::DecimalSi)
    }

    // Stripping trailing zeros raises the scale by at most 38, so small
    // starting scales cannot overflow.
    fn build(mantissa: i128, scale: i32, format: QuantityFormat) -> Self {
        let (mantissa, scale) = normalize(mantissa, scale).unwrap_or((mantissa, scale));
        Self {
            mantissa,
            scale,
            format,
        }
    }

    /// `None` when the normalized scale falls outside `±MAX_SCALE`.
    pub(crate) fn from_parts(
        mantissa: i128,
        scale: i32,
        format: QuantityFormat,
    ) -> Option<Self> {
        let (mantissa, scale) = normalize(mantissa, scale)?;
        if !(-MAX_SCALE..=MAX_SCALE).contains(&scale) {
            return None;
        }
        Some(Self {
            mantissa,
            scale,
            format,
        })
    }

    pub(crate) fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub(crate) fn scale(&self) -> i32 {
        self.scale
    }

    /// Unit family used when printing this quantity.
    pub fn format(&self) -> QuantityFormat {
        self.format
    }

    /// Same value, printed in another unit family.
    pub fn with_format(self, format: QuantityFormat) -> Self {
        Self { format, ..self }
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa < 0
    }

    /// Exact integer value, or `None` when the quantity is fractional or too large.
    pub fn to_i128(&self) -> Option<i128> {
        if self.scale < 0 {
            return None;
        }
        pow10(self.scale).and_then(|factor| self.mantissa.checked_mul(factor))
    }

    /// Value in thousandths of a unit, rounded up.
    ///
    /// This is the unit cpu limits are expressed in (`0.1` cpu is `100`).
    pub fn milli_value(&self) -> Option<i128> {
        let scale = self.scale.checked_add(3)?;
        if scale >= 0 {
            return pow10(scale).and_then(|factor| self.mantissa.checked_mul(factor));
        }
        match pow10(-scale) {
            // ceil(m / d) == -floor(-m / d)
            Some(divisor) => Some(-(-self.mantissa).div_euclid(divisor)),
            // Divisor exceeds any mantissa: the fraction rounds up to 1 or down to 0.
            None => Some(if self.mantissa > 0 { 1 } else { 0 }),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.mantissa == other.mantissa && self.scale == other.scale
    }
}

impl Eq for Quantity {}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mantissa.hash(state);
        self.scale.hash(state);
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        let sign = self.mantissa.signum();
        if sign != other.mantissa.signum() {
            return sign.cmp(&other.mantissa.signum());
        }
        if sign == 0 {
            return Ordering::Equal;
        }

        // Same sign, non-zero: rescale the operand with the larger exponent.
        let by_magnitude = |larger_scaled: Option<i128>, smaller: i128, flip: bool| {
            let ord = match larger_scaled {
                Some(value) => value.cmp(&smaller),
                // Overflow means the rescaled magnitude exceeds any i128.
                None if sign > 0 => Ordering::Greater,
                None => Ordering::Less,
            };
            if flip {
                ord.reverse()
            } else {
                ord
            }
        };

        if self.scale >= other.scale {
            let shifted = self
                .scale
                .checked_sub(other.scale)
                .and_then(|by| shift(self.mantissa, by));
            by_magnitude(shifted, other.mantissa, false)
        } else {
            let shifted = other
                .scale
                .checked_sub(self.scale)
                .and_then(|by| shift(other.mantissa, by));
            by_magnitude(shifted, self.mantissa, true)
        }
    }
}

impl FromStr for Quantity {
    type Err = QuantityFormatError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse::parse_quantity(raw)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::canonical(self))
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

struct QuantityVisitor;

impl<'de> Visitor<'de> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a quantity such as \"500m\", \"2Gi\" or 4")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Quantity, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
        Ok(Quantity::from_integer(v.into(), QuantityFormat::DecimalSi))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
        Ok(Quantity::from_integer(v.into(), QuantityFormat::DecimalSi))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
        self.visit_str(&v.to_string())
    }
}

fn normalize(mut mantissa: i128, mut scale: i32) -> Option<(i128, i32)> {
    if mantissa == 0 {
        return Some((0, 0));
    }
    while mantissa % 10 == 0 {
        mantissa /= 10;
        scale = scale.checked_add(1)?;
    }
    Some((mantissa, scale))
}

pub(crate) fn pow10(exp: i32) -> Option<i128> {
    u32::try_from(exp).ok().and_then(|exp| 10i128.checked_pow(exp))
}

fn shift(mantissa: i128, by: i32) -> Option<i128> {
    pow10(by).and_then(|factor| mantissa.checked_mul(factor))
}
