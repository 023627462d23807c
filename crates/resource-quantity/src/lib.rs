// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Exact resource quantities for manifest resource fields.
//!
//! A [`Quantity`] is a number with an optional unit suffix, as written in
//! `cpu: 500m` or `memory: 2Gi`. Values are kept as scaled integers, so
//! parsing and printing never drift the way floating point would, and two
//! spellings of the same amount (`1024Ki`, `1Mi`) compare equal.
//!
//! ```
//! use resource_quantity::Quantity;
//!
//! let memory: Quantity = "1024Ki".parse().unwrap();
//! assert_eq!(memory.to_string(), "1Mi");
//! assert_eq!(memory, "1048576".parse::<Quantity>().unwrap());
//! ```

mod error;
mod format;
mod parse;
mod quantity;

pub use error::{QuantityFormatError, Result};
pub use quantity::{Quantity, QuantityFormat};
