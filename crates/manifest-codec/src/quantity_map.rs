// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::collections::btree_map;
use std::collections::BTreeMap;

use resource_quantity::Quantity;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::dispatch::ScalarText;
use crate::error::{CodecError, Result};

/// Resource amounts keyed by resource name (`cpu`, `memory`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantityMap(BTreeMap<String, Quantity>);

impl QuantityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every entry. The first failure aborts the whole map and names
    /// the offending resource.
    pub fn decode<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut parsed = BTreeMap::new();
        for (name, raw) in entries {
            let name = name.into();
            match raw.as_ref().parse::<Quantity>() {
                Ok(quantity) => {
                    parsed.insert(name, quantity);
                }
                Err(source) => {
                    tracing::debug!(
                        resource = %name,
                        "discarding resource list with invalid quantity"
                    );
                    return Err(CodecError::QuantityFormat {
                        resource: Some(name),
                        source,
                    });
                }
            }
        }
        Ok(Self(parsed))
    }

    /// Resource name to canonical quantity string.
    pub fn encode(&self) -> BTreeMap<String, String> {
        self.0.iter().map(|(name, quantity)| (name.clone(), quantity.to_string())).collect()
    }

    pub fn get(&self, resource: &str) -> Option<&Quantity> {
        self.0.get(resource)
    }

    pub fn contains_key(&self, resource: &str) -> bool {
        self.0.contains_key(resource)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Quantity> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Quantity> {
        self.0
    }
}

impl FromIterator<(String, Quantity)> for QuantityMap {
    fn from_iter<T: IntoIterator<Item = (String, Quantity)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a QuantityMap {
    type Item = (&'a String, &'a Quantity);
    type IntoIter = btree_map::Iter<'a, String, Quantity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for QuantityMap {
    type Item = (String, Quantity);
    type IntoIter = btree_map::IntoIter<String, Quantity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Serialize for QuantityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for QuantityMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, ScalarText>::deserialize(deserializer)?;
        let entries = raw.into_iter().map(|(name, text)| (name, text.into_inner()));
        Self::decode(entries).map_err(D::Error::custom)
    }
}

/// Resource limits and requests of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default, skip_serializing_if = "QuantityMap::is_empty")]
    limits: QuantityMap,
    #[serde(default, skip_serializing_if = "QuantityMap::is_empty")]
    requests: QuantityMap,
}

impl ResourceRequirements {
    pub fn new(limits: QuantityMap, requests: QuantityMap) -> Self {
        Self { limits, requests }
    }

    pub fn limits(&self) -> &QuantityMap {
        &self.limits
    }

    pub fn requests(&self) -> &QuantityMap {
        &self.requests
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty() && self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use resource_quantity::QuantityFormatError;

    #[test]
    fn decodes_every_entry() {
        let map =
            QuantityMap::decode([("cpu", "100m"), ("memory", "2Gi"), ("storage", "10G")]).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("cpu"), Some(&Quantity::from_milli(100)));
        assert!(map.contains_key("memory"));
        assert_eq!(
            map.encode(),
            BTreeMap::from([
                ("cpu".to_string(), "100m".to_string()),
                ("memory".to_string(), "2Gi".to_string()),
                ("storage".to_string(), "10G".to_string()),
            ])
        );
    }

    #[test]
    fn first_bad_entry_discards_the_map() {
        let err = QuantityMap::decode([("cpu", "100m"), ("memory", "bad")]).unwrap_err();
        assert_eq!(
            err,
            CodecError::QuantityFormat {
                resource: Some("memory".to_string()),
                source: QuantityFormatError::InvalidNumber {
                    raw: "bad".to_string()
                },
            }
        );
        assert!(err.to_string().starts_with(r#"resource "memory": "#), "{err}");
        assert_eq!(err.raw(), Some("bad"));
    }

    #[test]
    fn serde_accepts_numbers_and_writes_canonical_strings() {
        let map: QuantityMap =
            serde_yaml::from_str("{cpu: 0.5, memory: 1024Mi, pods: 10}").unwrap();
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"cpu":"500m","memory":"1Gi","pods":"10"}"#
        );

        let err = serde_yaml::from_str::<QuantityMap>("{cpu: 1x}").unwrap_err();
        assert!(err.to_string().contains(r#"resource "cpu""#), "{err}");
    }

    #[test]
    fn requirements_omit_empty_lists() {
        let requirements: ResourceRequirements =
            serde_yaml::from_str("limits: {cpu: '2'}").unwrap();
        assert!(requirements.requests().is_empty());
        assert_eq!(requirements.limits().get("cpu").and_then(Quantity::to_i128), Some(2));
        assert_eq!(serde_json::to_string(&requirements).unwrap(), r#"{"limits":{"cpu":"2"}}"#);

        assert_eq!(serde_json::to_string(&ResourceRequirements::default()).unwrap(), "{}");
    }

    #[test]
    fn collects_from_parsed_quantities() {
        let map: QuantityMap = [("gpu".to_string(), Quantity::from_integer(1, Default::default()))]
            .into_iter()
            .collect();
        assert_eq!(map.iter().count(), 1);
        assert_eq!(map.into_inner().keys().collect::<Vec<_>>(), vec!["gpu"]);
    }
}
