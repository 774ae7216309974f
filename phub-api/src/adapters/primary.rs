//! Primary-source adapter
//!
//! The primary source serves a sectioned page payload: an `atf` (above the
//! fold) block with name, address and the hero photo, a `facilitySection`
//! with grouped facility grids, and a `locationSection` with coordinates and
//! nearby points of interest. Some captures wrap the whole thing in an outer
//! `[{result: {data: ...}}]` envelope.

use phub_common::model::{
    normalize_facilities, CanonicalAddress, CanonicalImage, CanonicalProperty, NearbyAttraction,
};
use serde_json::Value;
use std::collections::BTreeMap;

use super::value_ext::{array_member, f64_member, get, is_present, str_member, NULL};
use super::SOURCE_PRIMARY;

/// Map a raw primary-source payload to the canonical record
pub fn map_primary(property_id: &str, payload: &Value) -> CanonicalProperty {
    let payload = unwrap_envelope(payload);

    let atf = get(payload, "atf").unwrap_or(&NULL);
    let location_section = get(payload, "locationSection").unwrap_or(&NULL);

    let name = str_member(atf, "name");
    let description = str_member(atf, "locationDescription");

    // Coordinates may live on the atf block or the location section
    let coord = get(atf, "coordinate")
        .filter(|v| is_present(v))
        .or_else(|| get(location_section, "coordinate").filter(|v| is_present(v)))
        .unwrap_or(&NULL);

    let address_full = str_member(atf, "address")
        .or_else(|| str_member(atf, "sharedAddress"))
        .or_else(|| str_member(location_section, "address"))
        .or_else(|| str_member(location_section, "sharedAddress"));

    let address = CanonicalAddress {
        full: address_full,
        latitude: f64_member(coord, "latitude"),
        longitude: f64_member(coord, "longitude"),
        ..CanonicalAddress::default()
    };

    // Facilities come from a nested grid of facility-group components
    let facility_section = get(payload, "facilitySection").unwrap_or(&NULL);
    let mut facilities = Vec::new();
    for body in array_member(facility_section, "body") {
        for grid in array_member(body, "gridComponents") {
            if let Some(text) = str_member(grid, "text") {
                facilities.push(text);
            }
        }
    }

    // Nearby attractions: icon-group text lists and plain-text components
    // inside the location section, name-only entries in source order
    let mut nearby = Vec::new();
    for body in array_member(location_section, "body") {
        for icon_group in array_member(body, "iconComponents") {
            for text in array_member(icon_group, "texts") {
                if let Some(name) = text.as_str().filter(|s| !s.is_empty()) {
                    nearby.push(NearbyAttraction::named(name));
                }
            }
        }
        for plain_text in array_member(body, "plainTextComponents") {
            if let Some(text) = str_member(plain_text, "text") {
                nearby.push(NearbyAttraction::named(text));
            }
        }
    }

    // At most one image: the hero photo
    let images = str_member(atf, "photo")
        .map(|url| vec![CanonicalImage::new(url)])
        .unwrap_or_default();

    let mut extra = BTreeMap::new();
    extra.insert("source".to_string(), SOURCE_PRIMARY.to_string());

    CanonicalProperty {
        property_id: property_id.to_string(),
        name,
        description,
        address,
        nearby_attractions: nearby,
        images,
        facilities: normalize_facilities(facilities),
        extra,
    }
}

/// Unwrap up to one outer envelope layer.
///
/// A wrapped capture is a list whose first object element carrying a `result`
/// object holds the real payload under `result.data`; unwrapped captures may
/// still nest the payload under a top-level `data` key.
fn unwrap_envelope(payload: &Value) -> &Value {
    let mut current = payload;
    if let Some(items) = current.as_array() {
        for item in items {
            if let Some(result) = get(item, "result").filter(|v| v.is_object()) {
                current = get(result, "data").unwrap_or(&NULL);
                break;
            }
        }
    }
    if let Some(data) = get(current, "data") {
        current = data;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "atf": {
                "name": "Seaside Inn",
                "address": "1 Harbor Road",
                "coordinate": {"latitude": 37.5, "longitude": 127.1},
                "locationDescription": "Quiet waterfront neighborhood",
                "photo": "https://img.example.com/hero.jpg"
            },
            "facilitySection": {
                "body": [
                    {"gridComponents": [{"text": "WiFi"}, {"text": "Pool"}]},
                    {"gridComponents": [{"text": " wifi "}, {"icon": "no-text"}]}
                ]
            },
            "locationSection": {
                "body": [
                    {"iconComponents": [{"texts": ["City Hall", "Harbor Market"]}]},
                    {"plainTextComponents": [{"text": "5 min to beach"}]}
                ]
            }
        })
    }

    #[test]
    fn maps_full_payload() {
        let record = map_primary("1001", &sample_payload());
        assert_eq!(record.property_id, "1001");
        assert_eq!(record.name.as_deref(), Some("Seaside Inn"));
        assert_eq!(record.address.full.as_deref(), Some("1 Harbor Road"));
        assert_eq!(record.address.latitude, Some(37.5));
        assert_eq!(record.address.longitude, Some(127.1));
        assert_eq!(
            record.description.as_deref(),
            Some("Quiet waterfront neighborhood")
        );
        assert_eq!(record.facilities, vec!["pool", "wifi"]);
        assert_eq!(
            record.nearby_attractions,
            vec![
                NearbyAttraction::named("City Hall"),
                NearbyAttraction::named("Harbor Market"),
                NearbyAttraction::named("5 min to beach"),
            ]
        );
        assert_eq!(record.images.len(), 1);
        assert_eq!(record.images[0].url, "https://img.example.com/hero.jpg");
        assert_eq!(record.extra.get("source").map(String::as_str), Some("primary"));
    }

    #[test]
    fn empty_object_degrades_to_empty_record() {
        let record = map_primary("1001", &json!({}));
        assert_eq!(record.property_id, "1001");
        assert!(record.name.is_none());
        assert!(record.description.is_none());
        assert!(record.address.full.is_none());
        assert!(record.address.latitude.is_none());
        assert!(record.facilities.is_empty());
        assert!(record.nearby_attractions.is_empty());
        assert!(record.images.is_empty());
        assert_eq!(record.extra.get("source").map(String::as_str), Some("primary"));
    }

    #[test]
    fn unwraps_list_result_data_envelope() {
        let wrapped = json!([
            {"status": "partial"},
            {"result": {"data": sample_payload()}}
        ]);
        let record = map_primary("1001", &wrapped);
        assert_eq!(record.name.as_deref(), Some("Seaside Inn"));
    }

    #[test]
    fn unwraps_plain_data_envelope() {
        let wrapped = json!({"data": sample_payload()});
        let record = map_primary("1001", &wrapped);
        assert_eq!(record.name.as_deref(), Some("Seaside Inn"));
    }

    #[test]
    fn address_and_coordinates_fall_back_to_location_section() {
        let payload = json!({
            "atf": {"name": "Seaside Inn", "coordinate": {}},
            "locationSection": {
                "sharedAddress": "2 Hillside Lane",
                "coordinate": {"latitude": 35.0, "longitude": 129.0}
            }
        });
        let record = map_primary("1001", &payload);
        assert_eq!(record.address.full.as_deref(), Some("2 Hillside Lane"));
        assert_eq!(record.address.latitude, Some(35.0));
        assert_eq!(record.address.longitude, Some(129.0));
    }

    #[test]
    fn list_payload_without_envelope_yields_empty_record() {
        let record = map_primary("1001", &json!(["no", "result", "here"]));
        assert!(record.name.is_none());
        assert!(record.images.is_empty());
    }
}
