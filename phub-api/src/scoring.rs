//! Similarity scoring engine
//!
//! Compares two canonical records field-by-field and produces a score vector
//! of percentages. Text fields use the Ratcliff/Obershelp matching ratio over
//! normalized (trim + lowercase) strings, addresses add a hard-threshold
//! geo check, facilities use Jaccard overlap, and the overall score is a
//! fixed-weight sum — missing data scores as disagreement, the weights are
//! never renormalized.

use phub_common::model::{CanonicalAddress, CanonicalProperty};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fixed weights of the overall score (sum to 1.0)
const NAME_WEIGHT: f64 = 0.25;
const ADDRESS_WEIGHT: f64 = 0.35;
const FACILITIES_WEIGHT: f64 = 0.25;
const IMAGES_WEIGHT: f64 = 0.15;

/// Two coordinates within this great-circle distance count as the same place
const GEO_MATCH_RADIUS_M: f64 = 100.0;

/// Spherical-Earth radius used by the haversine formula
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Per-field agreement between two canonical records, percentages in [0, 100]
/// rounded to 2 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub name: f64,
    pub address: f64,
    pub facilities: f64,
    pub images: f64,
    pub overall: f64,
}

/// Compare two canonical records field-by-field
pub fn compare(base: &CanonicalProperty, other: &CanonicalProperty) -> ScoreVector {
    let name = string_similarity(base.name.as_deref(), other.name.as_deref());
    let address = address_similarity(&base.address, &other.address);
    let facilities = facility_overlap(&base.facilities, &other.facilities);
    let images = image_score(base, other);

    let overall = name * NAME_WEIGHT
        + address * ADDRESS_WEIGHT
        + facilities * FACILITIES_WEIGHT
        + images * IMAGES_WEIGHT;

    ScoreVector {
        name: to_percent(name),
        address: to_percent(address),
        facilities: to_percent(facilities),
        images: to_percent(images),
        overall: to_percent(overall),
    }
}

/// Normalized-text similarity in [0.0, 1.0]; absent strings compare as empty
pub fn string_similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    sequence_ratio(&normalize_text(a), &normalize_text(b))
}

fn normalize_text(s: Option<&str>) -> String {
    s.unwrap_or("").trim().to_lowercase()
}

/// Ratcliff/Obershelp matching ratio: `2 * M / T`, where `M` is the total
/// size of the recursively-matched longest common blocks and `T` the summed
/// length of both strings. Two empty strings rate 1.0.
fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = matching_chars(&a, &b);
    2.0 * matches as f64 / total as f64
}

/// Total matched characters: longest common block, then recurse on the
/// unmatched pieces to its left and right
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (a_start, b_start, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_chars(&a[..a_start], &b[..b_start])
        + matching_chars(&a[a_start + size..], &b[b_start + size..])
}

/// Earliest-longest common contiguous block of `a` and `b`
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        let mut row = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                row[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = row;
    }
    best
}

/// Address agreement: mean of the applicable sub-scores.
///
/// Sub-score 1 is full-string similarity, counted whenever at least one side
/// carries a full address. Sub-score 2 is a hard-threshold geo check, counted
/// only when both sides carry both coordinates. No applicable sub-score
/// rates 0.0.
pub fn address_similarity(a: &CanonicalAddress, b: &CanonicalAddress) -> f64 {
    let mut parts = Vec::new();

    let full_a = a.full.as_deref().unwrap_or("");
    let full_b = b.full.as_deref().unwrap_or("");
    if !full_a.is_empty() || !full_b.is_empty() {
        parts.push(string_similarity(Some(full_a), Some(full_b)));
    }

    if let (Some(lat_a), Some(lon_a), Some(lat_b), Some(lon_b)) =
        (a.latitude, a.longitude, b.latitude, b.longitude)
    {
        let distance = haversine_m(lat_a, lon_a, lat_b, lon_b);
        parts.push(if distance <= GEO_MATCH_RADIUS_M { 1.0 } else { 0.0 });
    }

    if parts.is_empty() {
        0.0
    } else {
        parts.iter().sum::<f64>() / parts.len() as f64
    }
}

/// Great-circle distance in meters between two points, haversine formula on
/// a spherical Earth
fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Jaccard overlap of two facility sets after normalization (trim +
/// lowercase, empty entries dropped). Two empty sets agree fully; one empty
/// set against a non-empty one does not agree at all.
pub fn facility_overlap(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let set_a = normalized_set(a);
    let set_b = normalized_set(b);
    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

fn normalized_set(items: &[String]) -> BTreeSet<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Image agreement heuristic, not a content comparison: secondary image links
/// are unreliable upstream, so the primary's image list stands in for both
/// sides. The canonical model always carries an image list, leaving a base
/// record with no images as the only 0.0 case.
fn image_score(base: &CanonicalProperty, _other: &CanonicalProperty) -> f64 {
    if base.images.is_empty() {
        0.0
    } else {
        1.0
    }
}

fn to_percent(ratio: f64) -> f64 {
    (ratio * 10_000.0).round() / 100.0
}
