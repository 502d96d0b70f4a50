//! Emotion sequences — independent weighted draws, repeats allowed.

use super::catalog::{Catalog, EmotionRecord};
use crate::error::CatalogError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One drawn emotion with everything the display needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceItem {
    #[serde(rename = "emotion")]
    pub key: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "emoji")]
    pub icon: String,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

impl From<&EmotionRecord> for SequenceItem {
    fn from(record: &EmotionRecord) -> Self {
        Self {
            key: record.key.clone(),
            display_name: record.display_name.clone(),
            icon: record.icon.clone(),
            duration_ms: record.duration_ms,
        }
    }
}

impl fmt::Display for SequenceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}ms)", self.icon, self.display_name, self.duration_ms)
    }
}

impl Catalog {
    /// Draw `count` emotions independently. `count == 0` gives an empty list.
    pub fn generate_sequence<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<SequenceItem>, CatalogError> {
        (0..count)
            .map(|_| self.draw_record(&mut *rng).map(SequenceItem::from))
            .collect()
    }
}
