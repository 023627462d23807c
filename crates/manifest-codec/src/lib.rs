// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Codecs for the flexible fields of a development manifest.
//!
//! Several manifest fields accept a short string as well as a full record:
//!
//! ```yaml
//! environment:
//!   - EDITOR=$EDITOR
//! sync:
//!   - /app
//!   - {source: ./cache, path: /cache, size: 2Gi}
//! forward:
//!   - 8080:80
//! resources:
//!   limits: {cpu: 500m, memory: 1Gi}
//! ```
//!
//! Each field type decodes every accepted form into one canonical value and
//! encodes it back in the most compact form. The types implement serde's
//! traits, so they work inside any serde-derived manifest struct; the
//! [`document`] helpers add the failing field path to decode errors.

pub mod dispatch;
pub mod document;
pub mod env;
mod error;
mod named_value;
mod path_binding;
mod port_pair;
mod quantity_map;

pub use document::{
    from_json_str, from_yaml_str, from_yaml_str_with_env, to_json_string, to_yaml_string,
    DocumentError, DocumentFormat,
};
pub use error::{CodecError, PortSide, Result};
pub use named_value::NamedValue;
pub use path_binding::{PathBinding, PathBindingOutput, PathBindingRecord};
pub use port_pair::PortPair;
pub use quantity_map::{QuantityMap, ResourceRequirements};
pub use resource_quantity::{Quantity, QuantityFormat, QuantityFormatError};
