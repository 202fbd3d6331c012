use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Product key
// ---------------------------------------------------------------------------

/// Required prefix for a retrievable product key.
pub const KEY_PREFIX: &str = "A2V";

/// Prefixed article identifier correlating a source-document row with an
/// externally retrieved record.
///
/// Case-normalized (uppercased, trimmed) at ingestion, so two keys that
/// differ only in case or surrounding whitespace compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProductKey(String);

impl ProductKey {
    /// Parse a raw cell value into a key. Values without the required
    /// prefix are not retrievable and yield `None`; callers skip them,
    /// they are never an error.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.starts_with(KEY_PREFIX) {
            Some(Self(normalized))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Retrieved record
// ---------------------------------------------------------------------------

/// One retrieved product record. Created once per unique key by the
/// retrieval orchestrator and immutable thereafter; all text fields are
/// raw as retrieved, normalization happens at comparison time.
///
/// `Default` is the empty placeholder used for rows whose key is absent
/// or ineligible; every field compares as "missing" downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductRecord {
    pub key: String,
    pub url: String,
    pub title: String,
    pub alt_id: String,
    pub weight_raw: String,
    pub dimensions_raw: String,
    pub material_raw: String,
    pub material_class_raw: String,
}

/// Per-key result of one retrieval: the record, or the reason the fetch
/// failed. Failures never abort a batch; they surface downstream as
/// unresolved comparisons.
#[derive(Debug, Clone)]
pub enum RetrievalOutcome {
    Retrieved(ProductRecord),
    Failed(String),
}

impl RetrievalOutcome {
    pub fn record(&self) -> Option<&ProductRecord> {
        match self {
            Self::Retrieved(record) => Some(record),
            Self::Failed(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dimension triple
// ---------------------------------------------------------------------------

/// Parsed dimension triple in whole millimeters.
///
/// Assignment is positional, not semantic: the first/second/third numeric
/// token of the raw text maps to length/width/height by convention. The
/// parser has no way to detect which axis a bare number represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub length_mm: Option<i64>,
    pub width_mm: Option<i64>,
    pub height_mm: Option<i64>,
}

impl Dimensions {
    pub fn is_empty(&self) -> bool {
        self.length_mm.is_none() && self.width_mm.is_none() && self.height_mm.is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_parse_normalizes_case_and_whitespace() {
        let key = ProductKey::parse("  a2v00123456  ").unwrap();
        assert_eq!(key.as_str(), "A2V00123456");
        assert_eq!(key, ProductKey::parse("A2V00123456").unwrap());
    }

    #[test]
    fn key_parse_rejects_missing_prefix() {
        assert!(ProductKey::parse("B2V00123456").is_none());
        assert!(ProductKey::parse("00123456").is_none());
        assert!(ProductKey::parse("").is_none());
    }

    #[test]
    fn placeholder_record_is_all_empty() {
        let record = ProductRecord::default();
        assert!(record.key.is_empty());
        assert!(record.title.is_empty());
        assert!(record.weight_raw.is_empty());
    }

    #[test]
    fn outcome_record_accessor() {
        let ok = RetrievalOutcome::Retrieved(ProductRecord::default());
        assert!(ok.record().is_some());
        let err = RetrievalOutcome::Failed("timeout".into());
        assert!(err.record().is_none());
    }
}
