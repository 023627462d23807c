// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use resource_quantity::Quantity;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dispatch::{self, FieldCodec, ScalarText, Shape};
use crate::error::{CodecError, Result};

/// A path synchronized into the development container.
///
/// Written either as the bare path or as a record with a host-side `source`,
/// a `sendonly` flag and a volume `size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBinding {
    path: String,
    source: Option<String>,
    send_only: bool,
    size: Option<Quantity>,
    legacy_target: Option<String>,
}

/// Structured binding as read from a document. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PathBindingRecord {
    #[serde(default, rename = "sendonly")]
    pub send_only: bool,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// Deprecated; read but never written back.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub size: Option<ScalarText>,
}

/// Structured binding as written to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathBindingOutput {
    #[serde(rename = "sendonly", skip_serializing_if = "is_false")]
    pub send_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Quantity>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl PathBinding {
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(CodecError::binding("path must not be empty"));
        }
        Ok(Self {
            path,
            source: None,
            send_only: false,
            size: None,
            legacy_target: None,
        })
    }

    /// An empty `source` clears it.
    pub fn with_source(self, source: impl Into<String>) -> Self {
        Self {
            source: non_empty(Some(source.into())),
            ..self
        }
    }

    pub fn with_send_only(self, send_only: bool) -> Self {
        Self { send_only, ..self }
    }

    pub fn with_size(self, size: Quantity) -> Self {
        Self {
            size: Some(size),
            ..self
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn send_only(&self) -> bool {
        self.send_only
    }

    pub fn size(&self) -> Option<&Quantity> {
        self.size.as_ref()
    }

    /// The deprecated `target` value, if the document used one.
    pub fn legacy_target(&self) -> Option<&str> {
        self.legacy_target.as_deref()
    }

    /// Whether the binding can be written as the bare path.
    pub fn is_compact(&self) -> bool {
        !self.send_only
            && self.source.is_none()
            && self.legacy_target.is_none()
            && self.size.is_none()
    }
}

impl FieldCodec for PathBinding {
    type ReadRecord = PathBindingRecord;
    type WriteRecord = PathBindingOutput;

    fn from_scalar(raw: &str) -> Result<Self> {
        Self::new(raw)
    }

    fn from_record(record: PathBindingRecord) -> Result<Self> {
        let path = non_empty(record.path)
            .ok_or_else(|| CodecError::binding("structured binding requires a non-empty `path`"))?;
        tracing::debug!(path = %path, "decoding structured path binding");

        let legacy_target = non_empty(record.target);
        if let Some(target) = &legacy_target {
            tracing::warn!(
                path = %path,
                target = %target,
                "path binding uses deprecated `target` key"
            );
        }

        let size = non_empty(record.size.map(ScalarText::into_inner))
            .map(|raw| raw.parse::<Quantity>())
            .transpose()?;

        Ok(Self {
            path,
            source: non_empty(record.source),
            send_only: record.send_only,
            size,
            legacy_target,
        })
    }

    fn to_shape(&self) -> Shape<PathBindingOutput> {
        if self.is_compact() {
            return Shape::Scalar(self.path.clone());
        }
        Shape::Record(PathBindingOutput {
            send_only: self.send_only,
            source: self.source.clone(),
            path: self.path.clone(),
            size: self.size,
        })
    }
}

impl Serialize for PathBinding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        dispatch::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for PathBinding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // A node that is neither a path nor a readable record is a binding
        // error too, not a bare serde type error.
        let shape = Shape::<PathBindingRecord>::deserialize(deserializer)
            .map_err(|err| D::Error::custom(CodecError::binding(err.to_string())))?;
        Self::from_shape(shape).map_err(D::Error::custom)
    }
}
