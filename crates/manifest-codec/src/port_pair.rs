// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dispatch::{self, FieldCodec, ScalarOnly, Shape};
use crate::error::{CodecError, PortSide, Result};

/// A port forward written as `local:remote`.
///
/// Only the syntax is checked; whether the numbers are usable ports is up to
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortPair {
    local: i32,
    remote: i32,
}

impl PortPair {
    pub const fn new(local: i32, remote: i32) -> Self {
        Self { local, remote }
    }

    pub const fn local(&self) -> i32 {
        self.local
    }

    pub const fn remote(&self) -> i32 {
        self.remote
    }

    pub fn decode(raw: &str) -> Result<Self> {
        let mut parts = raw.split(':');
        let (Some(local), Some(remote), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CodecError::PortSyntax {
                raw: raw.to_string(),
            });
        };

        let port = |side: PortSide, value: &str| {
            value.parse::<i32>().map_err(|_| CodecError::PortValue {
                side,
                value: value.to_string(),
                raw: raw.to_string(),
            })
        };

        Ok(Self {
            local: port(PortSide::Local, local)?,
            remote: port(PortSide::Remote, remote)?,
        })
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PortPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.local, self.remote)
    }
}

impl FromStr for PortPair {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl FieldCodec for PortPair {
    type ReadRecord = ScalarOnly;
    type WriteRecord = ScalarOnly;

    fn from_scalar(raw: &str) -> Result<Self> {
        Self::decode(raw)
    }

    fn from_record(record: ScalarOnly) -> Result<Self> {
        match record {}
    }

    fn to_shape(&self) -> Shape<ScalarOnly> {
        Shape::Scalar(self.encode())
    }
}

impl Serialize for PortPair {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        dispatch::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for PortPair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        dispatch::deserialize(deserializer)
    }
}
