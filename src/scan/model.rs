//! Scan result types.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::Allergen;

/// What a classifier decided about a menu, before it is stamped as a result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub safe_items: Vec<String>,
    pub risky_items: Vec<String>,
    pub allergens_detected: BTreeSet<Allergen>,
}

/// Outcome of one completed scan. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub id: Uuid,
    pub safe_items: Vec<String>,
    pub risky_items: Vec<String>,
    pub allergens_detected: BTreeSet<Allergen>,
    pub completed_at: DateTime<Utc>,
}

impl ScanResult {
    pub fn new(classification: Classification) -> Self {
        Self {
            id: Uuid::new_v4(),
            safe_items: classification.safe_items,
            risky_items: classification.risky_items,
            allergens_detected: classification.allergens_detected,
            completed_at: Utc::now(),
        }
    }

    pub fn is_risky(&self, item: &str) -> bool {
        self.risky_items.iter().any(|i| i == item)
    }
}
