// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dispatch::{self, FieldCodec, ScalarOnly, Shape};
use crate::env::{expand, CurrentEnv, EnvSource};
use crate::error::Result;

/// An environment entry written as `NAME=VALUE`.
///
/// A value starting with `$` is expanded against the environment. A bare
/// `NAME` takes its value from expanding the token itself, so `$HOME` alone
/// yields an entry named `$HOME` whose value is the home directory. Encoding
/// always writes `NAME=VALUE`; the bare shorthand is not reproduced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedValue {
    name: String,
    value: String,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Decodes `raw` against the environment in effect on this thread.
    pub fn decode(raw: &str) -> Self {
        Self::decode_with(raw, &CurrentEnv)
    }

    pub fn decode_with<E: EnvSource + ?Sized>(raw: &str, env: &E) -> Self {
        match raw.split_once('=') {
            Some((name, value)) if value.starts_with('$') => {
                tracing::trace!(name, "expanding environment reference in value");
                Self::new(name, expand(value, env))
            }
            Some((name, value)) => Self::new(name, value),
            None => {
                let expanded = expand(raw, env);
                if expanded == raw {
                    Self::new(raw, String::new())
                } else {
                    tracing::trace!(name = raw, "bare entry takes its value from the environment");
                    Self::new(raw, expanded)
                }
            }
        }
    }

    pub fn encode(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl fmt::Display for NamedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl FieldCodec for NamedValue {
    type ReadRecord = ScalarOnly;
    type WriteRecord = ScalarOnly;

    fn from_scalar(raw: &str) -> Result<Self> {
        Ok(Self::decode(raw))
    }

    fn from_record(record: ScalarOnly) -> Result<Self> {
        match record {}
    }

    fn to_shape(&self) -> Shape<ScalarOnly> {
        Shape::Scalar(self.encode())
    }
}

impl Serialize for NamedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        dispatch::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for NamedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        dispatch::deserialize(deserializer)
    }
}
