//! Canonical property model
//!
//! The unified, source-agnostic representation of one property. Every source
//! adapter produces a `CanonicalProperty`, and the consolidation engine both
//! consumes and produces them. Instances are built once per request and never
//! mutated afterwards.
//!
//! Field names serialize in camelCase to match the external JSON contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One property image. Identity for deduplication is the exact `url` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalImage {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl CanonicalImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }
}

/// Address of a property. Structured parts are not required to agree with
/// the free-text `full` string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalAddress {
    #[serde(default)]
    pub full: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// A point of interest near the property. Only `name` is guaranteed; sources
/// that carry no distance or coordinates leave the rest absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyAttraction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl NearbyAttraction {
    /// Name-only entry, for sources that list attractions without metadata
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            distance_km: None,
            latitude: None,
            longitude: None,
        }
    }
}

/// The canonical record for one property as seen by one source (or by the
/// merge of all sources).
///
/// Invariants:
/// - `facilities` is sorted and deduplicated in normalized (trim + lowercase)
///   form, see [`normalize_facilities`]
/// - `extra` carries at minimum a `"source"` provenance tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalProperty {
    /// Cross-source join key, a stable external identifier
    pub property_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Plain text; markup is stripped by the adapter where a source emits it
    #[serde(default)]
    pub description: Option<String>,
    pub address: CanonicalAddress,
    /// Source order preserved, duplicates allowed
    #[serde(default)]
    pub nearby_attractions: Vec<NearbyAttraction>,
    /// Source order preserved, no per-adapter dedup
    #[serde(default)]
    pub images: Vec<CanonicalImage>,
    /// Sorted, normalized, deduplicated facility names
    #[serde(default)]
    pub facilities: Vec<String>,
    /// Provenance metadata
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl CanonicalProperty {
    /// Empty record for the given id, tagged with the producing source
    pub fn empty(property_id: impl Into<String>, source: &str) -> Self {
        let mut extra = BTreeMap::new();
        extra.insert("source".to_string(), source.to_string());
        Self {
            property_id: property_id.into(),
            name: None,
            description: None,
            address: CanonicalAddress::default(),
            nearby_attractions: Vec::new(),
            images: Vec::new(),
            facilities: Vec::new(),
            extra,
        }
    }
}

/// Normalize a collection of facility names into the canonical set form:
/// trim + lowercase each entry, drop empties, deduplicate, sort.
pub fn normalize_facilities<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set: Vec<String> = raw
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    set.sort();
    set.dedup();
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_facilities_dedups_case_and_whitespace() {
        let normalized = normalize_facilities(["WiFi", " wifi ", "Pool", ""]);
        assert_eq!(normalized, vec!["pool".to_string(), "wifi".to_string()]);
    }

    #[test]
    fn normalize_facilities_empty_input() {
        let normalized = normalize_facilities(Vec::<String>::new());
        assert!(normalized.is_empty());
    }

    #[test]
    fn canonical_property_serializes_camel_case() {
        let record = CanonicalProperty::empty("1001", "primary");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["propertyId"], "1001");
        assert!(json["nearbyAttractions"].as_array().unwrap().is_empty());
        assert_eq!(json["extra"]["source"], "primary");
        assert!(json["address"]["postalCode"].is_null());
    }

    #[test]
    fn nearby_attraction_omits_absent_fields() {
        let json = serde_json::to_value(NearbyAttraction::named("City Hall")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "City Hall"}));
    }
}
