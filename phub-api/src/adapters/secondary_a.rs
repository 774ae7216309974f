//! Secondary-source-A adapter
//!
//! Source A's schema varies across payload vintages: the hotel name, address
//! block, gallery and facility lists each appear under several alternate
//! keys, and the overview text is HTML that must be stripped to plain text.

use phub_common::model::{
    normalize_facilities, CanonicalAddress, CanonicalImage, CanonicalProperty, NearbyAttraction,
};
use serde_json::Value;
use std::collections::BTreeMap;

use super::value_ext::{f64_member, get, get_path, is_present, str_member, NULL};
use super::SOURCE_SECONDARY_A;

/// Hard cap on gallery images taken from this source
const MAX_GALLERY_IMAGES: usize = 8;

/// Alternate keys under which nearby points of interest have been observed
const NEARBY_KEYS: [&str; 4] = ["nearbyPoi", "nearby", "landmarks", "nearbyLandmarks"];

/// Alternate keys under which facility lists have been observed
const FACILITY_KEYS: [&str; 6] = [
    "features",
    "facilities",
    "mostTalkedFacilities",
    "facilityClasses",
    "featureClasses",
    "featureGroups",
];

/// Map a raw secondary-A payload to the canonical record
pub fn map_secondary_a(property_id: &str, payload: &Value) -> CanonicalProperty {
    let hotel_info = get(payload, "hotelInfo").unwrap_or(&NULL);
    let name = str_member(hotel_info, "name");

    // First non-empty address object wins; vintages moved it around
    let address_block = [
        get(payload, "address"),
        get(hotel_info, "address"),
        get_path(payload, &["hotelDetails", "address"]),
    ]
    .into_iter()
    .flatten()
    .find(|block| block.as_object().is_some_and(|map| !map.is_empty()))
    .unwrap_or(&NULL);

    let address = CanonicalAddress {
        full: str_member(address_block, "full").or_else(|| str_member(address_block, "address")),
        city: str_member(address_block, "cityName").or_else(|| str_member(address_block, "city")),
        country: str_member(address_block, "countryName")
            .or_else(|| str_member(address_block, "country")),
        postal_code: str_member(address_block, "postalCode")
            .or_else(|| str_member(address_block, "postcode")),
        ..CanonicalAddress::default()
    };

    // Overview is HTML; strip tags, keep the text verbatim
    let description = get_path(payload, &["aboutHotel", "hotelDesc", "overview"])
        .and_then(Value::as_str)
        .map(strip_markup)
        .filter(|text| !text.is_empty());

    let mut nearby = Vec::new();
    for key in NEARBY_KEYS {
        let items = get(payload, key)
            .filter(|v| is_present(v))
            .or_else(|| get_path(payload, &["poi", key]).filter(|v| is_present(v)));
        let Some(items) = items.and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            // A candidate without a name is skipped entirely
            let Some(name) =
                str_member(item, "name").or_else(|| str_member(item, "landmarkTypeName"))
            else {
                continue;
            };
            nearby.push(NearbyAttraction {
                name,
                distance_km: f64_member(item, "distance")
                    .or_else(|| f64_member(item, "distanceKm")),
                latitude: f64_member(item, "latitude"),
                longitude: f64_member(item, "longitude"),
            });
        }
    }

    let gallery = [
        get(payload, "images"),
        get(payload, "gallery"),
        get(payload, "hotelImages"),
    ]
    .into_iter()
    .flatten()
    .filter_map(Value::as_array)
    .find(|items| !items.is_empty());
    let mut images = Vec::new();
    for entry in gallery.into_iter().flatten().take(MAX_GALLERY_IMAGES) {
        let url = str_member(entry, "url")
            .or_else(|| str_member(entry, "featureImageUrl"))
            .or_else(|| str_member(entry, "original"))
            .or_else(|| str_member(entry, "image"));
        if let Some(url) = url {
            images.push(CanonicalImage::new(url));
        }
    }

    // Facility lists are objects with a `name`; bare numeric facility-id
    // references carry no name and are ignored
    let mut facilities = Vec::new();
    for key in FACILITY_KEYS {
        let list = get(payload, key)
            .filter(|v| is_present(v))
            .or_else(|| get_path(payload, &["aboutHotel", key]));
        let Some(items) = list.and_then(Value::as_array) else {
            continue;
        };
        for item in items {
            if let Some(name) = str_member(item, "name") {
                facilities.push(name);
            }
        }
    }

    let mut extra = BTreeMap::new();
    extra.insert("source".to_string(), SOURCE_SECONDARY_A.to_string());

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

/// Remove markup tags from description text.
///
/// Narrow single-pass scan: drops `<...>` spans, keeps everything else
/// verbatim (entities included). Not a general HTML parser.
fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
