use std::collections::BTreeMap;

use serde::Deserialize;

use crate::app::{FetchError, Result};

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawSnapshot {
    flags: BTreeMap<String, serde_json::Value>,
    segments: BTreeMap<String, serde_json::Value>,
}

/// Key listing of a bulk snapshot, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub flag_keys: Vec<String>,
    pub segment_keys: Vec<String>,
}

impl SnapshotSummary {
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_slice(body)
            .map_err(|e| FetchError::SnapshotParse(e.to_string()))?;

        Ok(Self {
            flag_keys: raw.flags.into_keys().collect(),
            segment_keys: raw.segments.into_keys().collect(),
        })
    }

    pub fn flag_count(&self) -> usize {
        self.flag_keys.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segment_keys.len()
    }
}
