//! Secondary-source-Y adapter
//!
//! Source Y nests everything under one `accommodationInfo` subtree: a `meta`
//! block with name, address, coordinates and the image list, a `manager`
//! block whose comment doubles as the description, and a `theme` block whose
//! items name the facilities. This source never lists nearby attractions.

use phub_common::model::{
    normalize_facilities, CanonicalAddress, CanonicalImage, CanonicalProperty,
};
use serde_json::Value;
use std::collections::BTreeMap;

use super::value_ext::{array_member, f64_member, get, get_path, str_member, NULL};
use super::SOURCE_SECONDARY_Y;

/// Hard cap on images taken from the meta image list
const MAX_META_IMAGES: usize = 10;

/// Map a raw secondary-Y payload to the canonical record
pub fn map_secondary_y(property_id: &str, payload: &Value) -> CanonicalProperty {
    let info = get(payload, "accommodationInfo").unwrap_or(&NULL);
    let meta = get(info, "meta").unwrap_or(&NULL);
    let location = get(meta, "location").unwrap_or(&NULL);

    let name = str_member(meta, "name");
    let address = CanonicalAddress {
        full: str_member(meta, "address"),
        latitude: f64_member(location, "latitude"),
        longitude: f64_member(location, "longitude"),
        ..CanonicalAddress::default()
    };

    // Manager comment verbatim; this source emits plain text, no stripping
    let description = get_path(info, &["manager", "comment"])
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let mut images = Vec::new();
    for entry in array_member(meta, "images").iter().take(MAX_META_IMAGES) {
        if let Some(url) = str_member(entry, "image") {
            images.push(CanonicalImage {
                url,
                title: str_member(entry, "title"),
            });
        }
    }

    let mut facilities = Vec::new();
    for item in array_member(get(info, "theme").unwrap_or(&NULL), "items") {
        if let Some(name) = str_member(item, "name") {
            facilities.push(name);
        }
    }

    let mut extra = BTreeMap::new();
    extra.insert("source".to_string(), SOURCE_SECONDARY_Y.to_string());

    CanonicalProperty {
        property_id: property_id.to_string(),
        name,
        description,
        address,
        // This source never lists nearby attractions
        nearby_attractions: Vec::new(),
        images,
        facilities: normalize_facilities(facilities),
        extra,
    }
}
