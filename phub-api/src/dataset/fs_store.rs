//! Filesystem-backed property store
//!
//! Expected layout under the data root:
//!
//! ```text
//! <data_root>/<slug>_<property_id>/
//!     primary/      <date>.json ...
//!     secondary-a/  <date>.json ...
//!     secondary-y/  <date>.json ...
//! ```
//!
//! Capture file names carry dates, so the lexicographically last JSON file in
//! a source directory is the latest capture.

use async_trait::async_trait;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use phub_common::Result;

use super::{PropertyStore, SourcePayloads};

/// Source sub-directory names inside a property directory
pub const PRIMARY_DIR: &str = "primary";
pub const SECONDARY_A_DIR: &str = "secondary-a";
pub const SECONDARY_Y_DIR: &str = "secondary-y";

/// Property store reading scraped captures from a local directory tree
pub struct FsPropertyStore {
    data_root: PathBuf,
}

impl FsPropertyStore {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    /// Find the directory whose name ends with `_<property_id>`
    fn property_dir(&self, property_id: &str) -> Option<PathBuf> {
        let suffix = format!("_{}", property_id);
        let entries = fs::read_dir(&self.data_root).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && entry.file_name().to_string_lossy().ends_with(&suffix) {
                return Some(path);
            }
        }
        None
    }
}

/// Latest capture in a source directory: the lexicographically last `*.json`
fn latest_json_in(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();
    files.pop()
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[async_trait]
impl PropertyStore for FsPropertyStore {
    async fn load(&self, property_id: &str) -> Result<Option<SourcePayloads>> {
        let Some(dir) = self.property_dir(property_id) else {
            debug!(property_id = %property_id, "No property directory found");
            return Ok(None);
        };

        let primary = latest_json_in(&dir.join(PRIMARY_DIR));
        let secondary_a = latest_json_in(&dir.join(SECONDARY_A_DIR));
        let secondary_y = latest_json_in(&dir.join(SECONDARY_Y_DIR));

        let (Some(primary), Some(secondary_a), Some(secondary_y)) =
            (primary, secondary_a, secondary_y)
        else {
            debug!(
                property_id = %property_id,
                dir = %dir.display(),
                "Property directory is missing one or more source captures"
            );
            return Ok(None);
        };

        debug!(
            property_id = %property_id,
            primary = %primary.display(),
            secondary_a = %secondary_a.display(),
            secondary_y = %secondary_y.display(),
            "Resolved source captures"
        );

        Ok(Some(SourcePayloads {
            primary: read_json(&primary)?,
            secondary_a: read_json(&secondary_a)?,
            secondary_y: read_json(&secondary_y)?,
        }))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.data_root)?.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            let Some((_, id)) = dir_name.rsplit_once('_') else {
                continue;
            };
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            // Only directories carrying all three source sub-directories count
            let complete = [PRIMARY_DIR, SECONDARY_A_DIR, SECONDARY_Y_DIR]
                .iter()
                .all(|sub| path.join(sub).is_dir());
            if complete {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
