//! Consolidation engine
//!
//! Merges the three per-source canonical records into one and scores the
//! primary record against each secondary record. The merge is deterministic
//! and order-sensitive: the primary source wins name, address and provenance;
//! secondary sources only fill gaps and extend the facility and image sets.

use phub_common::model::{normalize_facilities, CanonicalProperty};
use serde::Serialize;
use std::collections::HashSet;

use crate::scoring::{self, ScoreVector};

/// Hard cap on the merged image list
const MERGED_IMAGE_CAP: usize = 20;

/// Consolidation result: the merged record, the untouched per-source records,
/// and the agreement scores of each secondary source against the primary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Consolidation {
    pub property_id: String,
    pub canonical: CanonicalProperty,
    pub sources: SourceRecords,
    pub comparison: Comparison,
}

/// The three unmodified canonical records, tagged by provenance
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecords {
    pub primary: CanonicalProperty,
    pub secondary_a: CanonicalProperty,
    pub secondary_y: CanonicalProperty,
}

/// Score vectors of the primary record against each secondary record
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    #[serde(rename = "primary_vs_secondaryA")]
    pub primary_vs_secondary_a: ScoreVector,
    #[serde(rename = "primary_vs_secondaryY")]
    pub primary_vs_secondary_y: ScoreVector,
}

/// Merge three canonical records of one property and score the secondaries
/// against the primary
pub fn consolidate(
    primary: CanonicalProperty,
    secondary_a: CanonicalProperty,
    secondary_y: CanonicalProperty,
) -> Consolidation {
    let comparison = Comparison {
        primary_vs_secondary_a: scoring::compare(&primary, &secondary_a),
        primary_vs_secondary_y: scoring::compare(&primary, &secondary_y),
    };

    let canonical = merge(&primary, &secondary_a, &secondary_y);

    Consolidation {
        property_id: primary.property_id.clone(),
        canonical,
        sources: SourceRecords {
            primary,
            secondary_a,
            secondary_y,
        },
        comparison,
    }
}

/// Merge policy: primary wins name, address and provenance; description is
/// filled from the first non-empty secondary; facilities are the normalized
/// union; images keep primary order, then secondary-A, then secondary-Y,
/// skipping already-present URLs up to the cap.
fn merge(
    primary: &CanonicalProperty,
    secondary_a: &CanonicalProperty,
    secondary_y: &CanonicalProperty,
) -> CanonicalProperty {
    let mut merged = primary.clone();

    if merged.description.as_deref().map_or(true, str::is_empty) {
        merged.description = non_empty(&secondary_a.description)
            .or_else(|| non_empty(&secondary_y.description));
    }

    merged.facilities = normalize_facilities(
        primary
            .facilities
            .iter()
            .chain(&secondary_a.facilities)
            .chain(&secondary_y.facilities),
    );

    let mut seen: HashSet<String> = merged.images.iter().map(|img| img.url.clone()).collect();
    for image in secondary_a.images.iter().chain(&secondary_y.images) {
        if merged.images.len() >= MERGED_IMAGE_CAP {
            break;
        }
        if seen.insert(image.url.clone()) {
            merged.images.push(image.clone());
        }
    }

    merged
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phub_common::model::CanonicalImage;

    fn record(source: &str) -> CanonicalProperty {
        CanonicalProperty::empty("1001", source)
    }

    fn image(n: usize, host: &str) -> CanonicalImage {
        CanonicalImage::new(format!("https://{host}/{n}.jpg"))
    }

    #[test]
    fn primary_wins_name_address_and_provenance() {
        let mut primary = record("primary");
        primary.name = Some("Seaside Inn".to_string());
        primary.address.full = Some("1 Harbor Road".to_string());
        let mut secondary_a = record("secondary-A");
        secondary_a.name = Some("Seaside INN Busan".to_string());
        secondary_a.address.full = Some("1 Harbor Rd".to_string());
        let secondary_y = record("secondary-Y");

        let result = consolidate(primary, secondary_a, secondary_y);
        assert_eq!(result.canonical.name.as_deref(), Some("Seaside Inn"));
        assert_eq!(result.canonical.address.full.as_deref(), Some("1 Harbor Road"));
        assert_eq!(
            result.canonical.extra.get("source").map(String::as_str),
            Some("primary")
        );
        assert_eq!(result.property_id, "1001");
    }

    #[test]
    fn description_falls_back_in_source_order() {
        let mut secondary_a = record("secondary-A");
        secondary_a.description = Some("From A".to_string());
        let mut secondary_y = record("secondary-Y");
        secondary_y.description = Some("From Y".to_string());

        let result = consolidate(record("primary"), secondary_a.clone(), secondary_y.clone());
        assert_eq!(result.canonical.description.as_deref(), Some("From A"));

        secondary_a.description = Some(String::new());
        let result = consolidate(record("primary"), secondary_a.clone(), secondary_y.clone());
        assert_eq!(result.canonical.description.as_deref(), Some("From Y"));

        let mut primary = record("primary");
        primary.description = Some("From primary".to_string());
        let result = consolidate(primary, secondary_a, secondary_y);
        assert_eq!(result.canonical.description.as_deref(), Some("From primary"));
    }

    #[test]
    fn facilities_merge_is_idempotent() {
        let mut primary = record("primary");
        primary.facilities = vec!["pool".to_string(), "wifi".to_string()];

        let result = consolidate(primary.clone(), primary.clone(), primary.clone());
        assert_eq!(result.canonical.facilities, vec!["pool", "wifi"]);
    }

    #[test]
    fn facilities_union_is_normalized_and_sorted() {
        let mut primary = record("primary");
        primary.facilities = vec!["pool".to_string()];
        let mut secondary_a = record("secondary-A");
        secondary_a.facilities = vec!["Gym".to_string(), " pool ".to_string()];
        let mut secondary_y = record("secondary-Y");
        secondary_y.facilities = vec!["sauna".to_string()];

        let result = consolidate(primary, secondary_a, secondary_y);
        assert_eq!(result.canonical.facilities, vec!["gym", "pool", "sauna"]);
    }

    #[test]
    fn image_merge_caps_at_twenty_and_keeps_primary_first() {
        let mut primary = record("primary");
        primary.images.push(image(0, "primary.example.com"));
        let mut secondary_a = record("secondary-A");
        secondary_a.images = (0..12).map(|n| image(n, "a.example.com")).collect();
        let mut secondary_y = record("secondary-Y");
        secondary_y.images = (0..13).map(|n| image(n, "y.example.com")).collect();

        let result = consolidate(primary, secondary_a, secondary_y);
        let images = &result.canonical.images;
        assert_eq!(images.len(), 20);
        assert_eq!(images[0].url, "https://primary.example.com/0.jpg");
        assert_eq!(images[1].url, "https://a.example.com/0.jpg");
        assert_eq!(images[13].url, "https://y.example.com/0.jpg");
    }

    #[test]
    fn image_merge_skips_duplicate_urls() {
        let mut primary = record("primary");
        primary.images.push(image(0, "shared.example.com"));
        let mut secondary_a = record("secondary-A");
        secondary_a.images = vec![image(0, "shared.example.com"), image(1, "a.example.com")];

        let result = consolidate(primary, secondary_a, record("secondary-Y"));
        let urls: Vec<&str> = result
            .canonical
            .images
            .iter()
            .map(|img| img.url.as_str())
            .collect();
        assert_eq!(
            urls,
            vec!["https://shared.example.com/0.jpg", "https://a.example.com/1.jpg"]
        );
    }

    #[test]
    fn sources_are_passed_through_unmodified() {
        let mut secondary_a = record("secondary-A");
        secondary_a.facilities = vec!["gym".to_string()];

        let result = consolidate(record("primary"), secondary_a.clone(), record("secondary-Y"));
        assert_eq!(result.sources.secondary_a, secondary_a);
        assert!(result.sources.primary.facilities.is_empty());
    }

    #[test]
    fn comparison_scores_both_secondaries() {
        let mut primary = record("primary");
        primary.name = Some("Seaside Inn".to_string());
        primary.facilities = vec!["pool".to_string(), "wifi".to_string()];
        primary.images.push(image(0, "primary.example.com"));
        let mut secondary_a = record("secondary-A");
        secondary_a.name = Some("Seaside  INN".to_string());
        secondary_a.facilities = vec!["gym".to_string(), "pool".to_string()];

        let result = consolidate(primary, secondary_a, record("secondary-Y"));
        let vs_a = result.comparison.primary_vs_secondary_a;
        assert_eq!(vs_a.name, 95.65);
        assert_eq!(vs_a.facilities, 33.33);
        assert_eq!(vs_a.images, 100.0);

        let vs_y = result.comparison.primary_vs_secondary_y;
        assert_eq!(vs_y.facilities, 0.0);
    }

    #[test]
    fn output_serializes_to_the_external_contract() {
        let result = consolidate(
            record("primary"),
            record("secondary-A"),
            record("secondary-Y"),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["propertyId"], "1001");
        assert!(json["canonical"].is_object());
        assert!(json["sources"]["primary"].is_object());
        assert!(json["sources"]["secondaryA"].is_object());
        assert!(json["sources"]["secondaryY"].is_object());
        assert!(json["comparison"]["primary_vs_secondaryA"]["overall"].is_number());
        assert!(json["comparison"]["primary_vs_secondaryY"]["overall"].is_number());
    }
}
