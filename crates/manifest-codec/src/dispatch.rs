// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Scalar-or-record decoding shared by all flexible manifest fields.
//!
//! A field node is first classified by [`Shape`]: scalars (strings, numbers,
//! booleans) become [`Shape::Scalar`], mappings are handed to the field's
//! record type. Anything else is a shape error raised by the document format.
//! Only after the shape is known does the field's [`FieldCodec`] apply its
//! value rules, so a wrong value never triggers a fallback to another shape.

use std::fmt;
use std::marker::PhantomData;

use serde::de::value::MapAccessDeserializer;
use serde::de::{self, MapAccess, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;

/// A field node, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape<R> {
    /// Compact form; numbers and booleans are kept in their textual form.
    Scalar(String),
    /// Structured form.
    Record(R),
}

/// Record type for fields that only have a compact form.
///
/// It has no values: a mapping in such a field is a shape error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarOnly {}

/// A codec between a field's document forms and its canonical value.
pub trait FieldCodec: Sized {
    /// Structured form accepted on decode.
    type ReadRecord;
    /// Structured form produced on encode.
    ///
    /// Kept apart from [`FieldCodec::ReadRecord`] so that read-only
    /// compatibility keys cannot leak into written documents.
    type WriteRecord;

    fn from_scalar(raw: &str) -> Result<Self>;

    fn from_record(record: Self::ReadRecord) -> Result<Self>;

    /// The most compact representation of this value.
    fn to_shape(&self) -> Shape<Self::WriteRecord>;

    fn from_shape(shape: Shape<Self::ReadRecord>) -> Result<Self> {
        match shape {
            Shape::Scalar(raw) => Self::from_scalar(&raw),
            Shape::Record(record) => Self::from_record(record),
        }
    }
}

/// Serde entry point used by the `Deserialize` impls of codec types.
pub fn deserialize<'de, T, D>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: FieldCodec,
    T::ReadRecord: Deserialize<'de>,
    D: Deserializer<'de>,
{
    let shape = Shape::<T::ReadRecord>::deserialize(deserializer)?;
    T::from_shape(shape).map_err(de::Error::custom)
}

/// Serde entry point used by the `Serialize` impls of codec types.
pub fn serialize<T, S>(value: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: FieldCodec,
    T::WriteRecord: Serialize,
    S: Serializer,
{
    value.to_shape().serialize(serializer)
}

impl<R: Serialize> Serialize for Shape<R> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Shape::Scalar(raw) => serializer.serialize_str(raw),
            Shape::Record(record) => record.serialize(serializer),
        }
    }
}

impl<'de, R: Deserialize<'de>> Deserialize<'de> for Shape<R> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ShapeVisitor(PhantomData))
    }
}

struct ShapeVisitor<R>(PhantomData<R>);

impl<'de, R: Deserialize<'de>> Visitor<'de> for ShapeVisitor<R> {
    type Value = Shape<R>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or a mapping")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        Ok(Shape::Scalar(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Self::Value, E> {
        Ok(Shape::Scalar(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
        Ok(Shape::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        Ok(Shape::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        Ok(Shape::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        Ok(Shape::Scalar(v.to_string()))
    }

    fn visit_map<A>(self, map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        R::deserialize(MapAccessDeserializer::new(map)).map(Shape::Record)
    }
}

impl Serialize for ScalarOnly {
    fn serialize<S>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {}
    }
}

impl<'de> Deserialize<'de> for ScalarOnly {
    fn deserialize<D>(_deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Err(de::Error::invalid_type(Unexpected::Map, &"a string"))
    }
}

/// Any scalar node as text: `"2Gi"`, `4` and `0.5` all decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarText(String);

impl ScalarText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Shape::<ScalarOnly>::deserialize(deserializer)? {
            Shape::Scalar(raw) => Ok(ScalarText(raw)),
            Shape::Record(never) => match never {},
        }
    }
}
