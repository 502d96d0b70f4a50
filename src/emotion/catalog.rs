//! Emotion Catalog — the fixed set of display states the robot face can show.
//!
//! Records keep their definition order. That order drives the weighted pool
//! layout, the JSON export and emotion cycling. A catalog is validated once on
//! construction and never mutated afterwards.

use super::pool::WeightedPool;
use crate::error::CatalogError;
use rand::Rng;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

// ── Emotion Record ─────────────────────────────────────────

/// A named, weighted display state.
///
/// Serialized with the field names used by the face's JSON data files. The
/// key is not a field of its own: it is the object key the record sits under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionRecord {
    #[serde(skip)]
    pub key: String,
    #[serde(rename = "name")]
    pub display_name: String,
    /// How long the face holds this emotion, in milliseconds.
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    #[serde(rename = "emoji")]
    pub icon: String,
    /// Relative likelihood of being drawn.
    pub weight: u32,
}

impl EmotionRecord {
    pub fn new(key: &str, display_name: &str, duration_ms: u64, icon: &str, weight: u32) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            duration_ms,
            icon: icon.to_string(),
            weight,
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.key.trim().is_empty() {
            return Err(CatalogError::invalid(&self.key, "key must not be empty"));
        }
        if self.display_name.trim().is_empty() {
            return Err(CatalogError::invalid(&self.key, "name must not be empty"));
        }
        if self.duration_ms == 0 {
            return Err(CatalogError::invalid(&self.key, "duration must be positive"));
        }
        if self.weight == 0 {
            return Err(CatalogError::invalid(&self.key, "weight must be positive"));
        }
        Ok(())
    }
}

/// Built-in emotions shown by the LumoFace robot (weights sum to 100).
pub fn reference_records() -> Vec<EmotionRecord> {
    vec![
        EmotionRecord::new("happy", "Happy", 3000, "😊", 15),
        EmotionRecord::new("sad", "Sad", 2500, "😢", 10),
        EmotionRecord::new("surprised", "Surprised", 1500, "😲", 12),
        EmotionRecord::new("angry", "Angry", 2000, "😠", 8),
        EmotionRecord::new("sleepy", "Sleepy", 4000, "😴", 10),
        EmotionRecord::new("excited", "Excited", 2000, "🤩", 15),
        EmotionRecord::new("confused", "Confused", 3000, "😵", 8),
        EmotionRecord::new("love", "Love", 3500, "🥰", 12),
        EmotionRecord::new("wink", "Wink", 1000, "😉", 10),
    ]
}

// ── Catalog ────────────────────────────────────────────────

/// Upper bound on the summed weights; the pool holds one slot per unit.
pub const MAX_TOTAL_WEIGHT: u64 = 1_000_000;

#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<EmotionRecord>,
    pool: WeightedPool,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::reference()
    }
}

impl Catalog {
    /// Validate `records` and build the weighted pool.
    ///
    /// Rejects an empty list, duplicate keys, and any record with an empty
    /// key or name, a zero duration or a zero weight.
    pub fn new(records: Vec<EmotionRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        let mut total_weight: u64 = 0;
        for record in &records {
            record.validate()?;
            if !seen.insert(record.key.as_str()) {
                return Err(CatalogError::invalid(&record.key, "duplicate key"));
            }
            total_weight += u64::from(record.weight);
            if total_weight > MAX_TOTAL_WEIGHT {
                return Err(CatalogError::invalid(
                    &record.key,
                    format!("total weight exceeds {}", MAX_TOTAL_WEIGHT),
                ));
            }
        }

        let pool = WeightedPool::build(records.iter().map(|r| r.weight));
        tracing::debug!(
            emotions = records.len(),
            pool_size = pool.len(),
            "Built emotion catalog"
        );

        Ok(Self { records, pool })
    }

    /// The built-in nine-emotion catalog.
    pub fn reference() -> Self {
        let records = reference_records();
        let pool = WeightedPool::build(records.iter().map(|r| r.weight));
        Self { records, pool }
    }

    // ── Queries ────────────────────────────────────────────

    pub fn records(&self) -> &[EmotionRecord] {
        &self.records
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn pool(&self) -> &WeightedPool {
        &self.pool
    }

    /// Record for `key`, or `None` when the catalog has no such emotion.
    pub fn lookup(&self, key: &str) -> Option<&EmotionRecord> {
        self.records.iter().find(|r| r.key == key)
    }

    pub fn total_weight(&self) -> u64 {
        self.records.iter().map(|r| u64::from(r.weight)).sum()
    }

    /// Expected draw frequency of `key`: `weight / total_weight`.
    pub fn probability(&self, key: &str) -> Option<f64> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }
        self.lookup(key).map(|r| f64::from(r.weight) / total as f64)
    }

    /// Key following `current` in catalog order, wrapping around.
    ///
    /// Starts from the first emotion when `current` is `None` or unknown.
    pub fn cycle_next(&self, current: Option<&str>) -> Option<&str> {
        let next = match current.and_then(|c| self.records.iter().position(|r| r.key == c)) {
            Some(idx) => (idx + 1) % self.records.len(),
            None => 0,
        };
        self.records.get(next).map(|r| r.key.as_str())
    }

    // ── Draws ──────────────────────────────────────────────

    /// Draw one emotion key with probability proportional to its weight.
    pub fn draw_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str, CatalogError> {
        self.draw_record(rng).map(|r| r.key.as_str())
    }

    /// Same as [`Catalog::draw_random`] but hands back the full record.
    pub fn draw_record<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&EmotionRecord, CatalogError> {
        let index = self.pool.sample(rng)?;
        self.records.get(index).ok_or(CatalogError::EmptyPool)
    }

    // ── JSON ───────────────────────────────────────────────

    /// Pretty JSON (2-space indent), one top-level entry per emotion key.
    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::new(document.0)
    }

    /// Write the whole catalog to `path`, replacing any existing file.
    pub fn export_to_file(&self, path: &Path) -> Result<(), CatalogError> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|e| CatalogError::io(path, e))?;
        tracing::info!(path = %path.display(), emotions = self.len(), "Exported emotion catalog");
        Ok(())
    }

    /// Load a catalog previously written by [`Catalog::export_to_file`].
    pub fn import_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let catalog = Self::from_json_str(&content)?;
        tracing::info!(path = %path.display(), emotions = catalog.len(), "Imported emotion catalog");
        Ok(catalog)
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.records.iter().map(|r| (r.key.as_str(), r)))
    }
}

/// Ordered view of a catalog JSON object; keeps entries in document order.
struct CatalogDocument(Vec<EmotionRecord>);

impl<'de> Deserialize<'de> for CatalogDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = CatalogDocument;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping emotion keys to emotion records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut records = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, mut record)) = map.next_entry::<String, EmotionRecord>()? {
                    record.key = key;
                    records.push(record);
                }
                Ok(CatalogDocument(records))
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn reference_catalog_has_nine_emotions_summing_to_100() {
        let catalog = Catalog::reference();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.total_weight(), 100);
        assert_eq!(catalog.pool().len(), 100);
    }

    #[test]
    fn reference_records_pass_validation() {
        let validated = Catalog::new(reference_records()).unwrap();
        let reference = Catalog::reference();
        assert_eq!(validated.records(), reference.records());
    }

    #[test]
    fn pool_layout_follows_catalog_order() {
        let catalog = Catalog::reference();
        let slots = catalog.pool().slots();
        // happy (15) first, wink (10) last
        assert!(slots[..15].iter().all(|&i| i == 0));
        assert!(slots[90..].iter().all(|&i| i == 8));
    }

    #[test]
    fn draws_only_return_known_keys() {
        let catalog = Catalog::reference();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let key = catalog.draw_random(&mut rng).unwrap();
            assert!(catalog.lookup(key).is_some(), "unknown key drawn: {}", key);
        }
    }

    #[test]
    fn draw_frequencies_converge_to_weights() {
        let catalog = Catalog::reference();
        let mut rng = StdRng::seed_from_u64(2024);
        let n = 100_000;
        let mut counts: HashMap<String, u32> = HashMap::new();
        for _ in 0..n {
            let key = catalog.draw_random(&mut rng).unwrap();
            *counts.entry(key.to_string()).or_default() += 1;
        }

        for record in catalog.records() {
            let observed = f64::from(counts.get(&record.key).copied().unwrap_or(0)) / n as f64;
            let expected = catalog.probability(&record.key).unwrap();
            assert!(
                (observed - expected).abs() < 0.01,
                "{}: observed {:.4}, expected {:.4}",
                record.key,
                observed,
                expected
            );
        }

        assert!((catalog.probability("happy").unwrap() - 0.15).abs() < f64::EPSILON);
        assert!((catalog.probability("angry").unwrap() - 0.08).abs() < f64::EPSILON);
    }

    #[test]
    fn lookup_unknown_key_is_none() {
        let catalog = Catalog::reference();
        assert!(catalog.lookup("grumpy").is_none());
        assert!(catalog.lookup("").is_none());
        assert!(catalog.probability("grumpy").is_none());
    }

    #[test]
    fn lookup_returns_full_record() {
        let catalog = Catalog::reference();
        let love = catalog.lookup("love").unwrap();
        assert_eq!(love.display_name, "Love");
        assert_eq!(love.duration_ms, 3500);
        assert_eq!(love.icon, "🥰");
        assert_eq!(love.weight, 12);
    }

    #[test]
    fn cycle_next_wraps_around() {
        let catalog = Catalog::reference();
        assert_eq!(catalog.cycle_next(Some("happy")), Some("sad"));
        assert_eq!(catalog.cycle_next(Some("wink")), Some("happy"));
        assert_eq!(catalog.cycle_next(None), Some("happy"));
        assert_eq!(catalog.cycle_next(Some("neutral")), Some("happy"));
    }

    #[test]
    fn new_rejects_empty_catalog() {
        assert!(matches!(Catalog::new(Vec::new()), Err(CatalogError::Empty)));
    }

    #[test]
    fn new_rejects_zero_weight() {
        let records = vec![EmotionRecord::new("meh", "Meh", 1000, "😐", 0)];
        match Catalog::new(records) {
            Err(CatalogError::InvalidRecord { key, .. }) => assert_eq!(key, "meh"),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn new_rejects_zero_duration() {
        let records = vec![EmotionRecord::new("blink", "Blink", 0, "😑", 3)];
        assert!(matches!(
            Catalog::new(records),
            Err(CatalogError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn new_rejects_duplicate_keys() {
        let records = vec![
            EmotionRecord::new("happy", "Happy", 3000, "😊", 15),
            EmotionRecord::new("happy", "Happier", 2000, "😁", 5),
        ];
        assert!(matches!(
            Catalog::new(records),
            Err(CatalogError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn json_uses_face_field_names_in_order() {
        let json = Catalog::reference().to_json_pretty().unwrap();
        let happy_at = json.find("\"happy\"").unwrap();
        let wink_at = json.find("\"wink\"").unwrap();
        assert!(happy_at < wink_at, "export must keep catalog order");
        assert!(json.contains("\n  \"happy\": {\n    \"name\": \"Happy\",\n    \"duration\": 3000,"));
        assert!(json.contains("\"emoji\": \"😊\""));
        assert!(json.contains("\"weight\": 15"));
        assert!(!json.contains("\"key\""));
    }

    #[test]
    fn from_json_str_restores_keys_and_order() {
        let json = r#"{
          "wink": {"name": "Wink", "duration": 1000, "emoji": "😉", "weight": 2},
          "happy": {"name": "Happy", "duration": 3000, "emoji": "😊", "weight": 1}
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["wink", "happy"]);
        assert_eq!(catalog.pool().slots(), &[0, 0, 1]);
    }

    #[test]
    fn from_json_str_rejects_missing_fields() {
        let json = r#"{"wink": {"name": "Wink", "duration": 1000}}"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(CatalogError::Json(_))
        ));
    }

    #[test]
    fn from_json_str_rejects_oversized_weight() {
        let json = r#"{"huge": {"name": "Huge", "duration": 1000, "emoji": "😱", "weight": 60000000}}"#;
        match Catalog::from_json_str(json) {
            Err(CatalogError::InvalidRecord { key, .. }) => assert_eq!(key, "huge"),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    #[test]
    fn new_rejects_weights_summing_past_limit() {
        let half = (MAX_TOTAL_WEIGHT / 2 + 1) as u32;
        let records = vec![
            EmotionRecord::new("a", "A", 1000, "🅰", half),
            EmotionRecord::new("b", "B", 1000, "🅱", half),
        ];
        match Catalog::new(records) {
            Err(CatalogError::InvalidRecord { key, .. }) => assert_eq!(key, "b"),
            other => panic!("expected InvalidRecord, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn new_accepts_weight_at_limit() {
        let records = vec![EmotionRecord::new("max", "Max", 1000, "🔝", MAX_TOTAL_WEIGHT as u32)];
        let catalog = Catalog::new(records).unwrap();
        assert_eq!(catalog.pool().len() as u64, MAX_TOTAL_WEIGHT);
    }

    #[test]
    fn from_json_str_rejects_non_object() {
        assert!(matches!(
            Catalog::from_json_str("[1, 2, 3]"),
            Err(CatalogError::Json(_))
        ));
    }
}
