// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::fmt;

use resource_quantity::QuantityFormatError;
use thiserror::Error;

/// Convenient result alias for field codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Which half of a `local:remote` port pair failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSide {
    Local,
    Remote,
}

impl fmt::Display for PortSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSide::Local => write!(f, "local"),
            PortSide::Remote => write!(f, "remote"),
        }
    }
}

/// Value-level failures while decoding a manifest field.
///
/// Shape mismatches (a mapping where a string was expected) are reported by
/// the document format itself; these errors mean the node had the right shape
/// but its content is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Port forward without exactly one `:` separator.
    #[error("wrong port-forward syntax {raw:?}, must be of the form 'localPort:remotePort'")]
    PortSyntax { raw: String },

    /// One side of a port forward is not an integer.
    #[error("cannot convert {side} port {value:?} in port-forward {raw:?}")]
    PortValue {
        side: PortSide,
        value: String,
        raw: String,
    },

    /// A path binding is neither a path string nor a valid binding record.
    #[error("invalid path binding: {reason}")]
    BindingFormat { reason: String },

    /// A quantity (resource amount or volume size) failed to parse.
    #[error("{}{}", resource_prefix(.resource), .source)]
    QuantityFormat {
        resource: Option<String>,
        #[source]
        source: QuantityFormatError,
    },
}

impl CodecError {
    pub(crate) fn binding(reason: impl Into<String>) -> Self {
        Self::BindingFormat {
            reason: reason.into(),
        }
    }

    /// The raw value that was rejected, when the error carries one.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::PortSyntax { raw } | Self::PortValue { raw, .. } => Some(raw),
            Self::BindingFormat { .. } => None,
            Self::QuantityFormat { source, .. } => Some(source.raw()),
        }
    }
}

impl From<QuantityFormatError> for CodecError {
    fn from(source: QuantityFormatError) -> Self {
        Self::QuantityFormat {
            resource: None,
            source,
        }
    }
}

fn resource_prefix(resource: &Option<String>) -> String {
    resource.as_ref().map(|name| format!("resource {name:?}: ")).unwrap_or_default()
}
