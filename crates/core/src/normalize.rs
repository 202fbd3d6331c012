//! Canonical forms for the heterogeneous text found in product sheets
//! and retrieved records.
//!
//! Parsing here is deliberately lenient: malformed numeric, dimension,
//! or identifier text is never an error. It degrades to "absent", which
//! the comparator reports as unresolved rather than failing a run.

use regex::Regex;
use serde::Serialize;

use crate::model::Dimensions;

/// Comparison epsilon for "exact" numeric equality.
pub const EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Decimal extraction
// ---------------------------------------------------------------------------

/// Extract the first signed decimal token from `raw`.
///
/// Whitespace is stripped and a comma is treated as the decimal
/// separator. Leading/trailing non-numeric text is ignored silently:
/// "ca. 3,2 kg" parses to 3.2.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.replace(',', ".");
    let token = Regex::new(r"[-+]?\d+(?:\.\d+)?").unwrap();
    token.find(&compact).and_then(|m| m.as_str().parse().ok())
}

// ---------------------------------------------------------------------------
// Weight
// ---------------------------------------------------------------------------

/// Unit recognized in a raw weight string. `AssumedKilogram` is the
/// named default policy: no unit token found means the value is taken
/// to be kilograms already.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    Milligram,
    Gram,
    Kilogram,
    Tonne,
    AssumedKilogram,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedWeight {
    pub kilograms: f64,
    pub unit: WeightUnit,
}

/// Parse a raw weight string into kilograms plus the recognized unit.
///
/// Detection runs on the lowercased, whitespace-stripped string. The
/// gram check is a substring heuristic (a "g" not immediately preceded
/// by "k"), not tokenized unit parsing; contrived inputs mixing unit
/// letters can misclassify. Known fragility, kept as-is.
pub fn parse_weight(raw: &str) -> Option<ParsedWeight> {
    let magnitude = parse_decimal(raw)?;
    let compact: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let gram = Regex::new(r"(?:^|[^k])g").unwrap();
    let tonne = Regex::new(r"(?:^|[^a-z])t(?:$|[^a-z])").unwrap();

    let unit = if compact.contains("mg") {
        WeightUnit::Milligram
    } else if gram.is_match(&compact) {
        WeightUnit::Gram
    } else if compact.contains("kg") {
        WeightUnit::Kilogram
    } else if tonne.is_match(&compact) {
        WeightUnit::Tonne
    } else {
        WeightUnit::AssumedKilogram
    };

    let kilograms = match unit {
        WeightUnit::Milligram => magnitude / 1_000_000.0,
        WeightUnit::Gram => magnitude / 1_000.0,
        WeightUnit::Kilogram | WeightUnit::AssumedKilogram => magnitude,
        WeightUnit::Tonne => magnitude * 1_000.0,
    };

    Some(ParsedWeight { kilograms, unit })
}

/// Weight in kilograms, or `None` if no numeric token exists.
pub fn normalize_weight_kg(raw: &str) -> Option<f64> {
    parse_weight(raw).map(|w| w.kilograms)
}

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Unit recognized in a raw dimension string. `AssumedMillimeter` is
/// the named default policy: no unit token means values are taken to be
/// millimeters already.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DimUnit {
    Millimeter,
    Centimeter,
    Meter,
    AssumedMillimeter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedDimensions {
    pub triple: Dimensions,
    pub unit: DimUnit,
}

/// Parse a combined dimension string ("30x20x10 mm", "0,3 × 0,2 × 0,1 m")
/// into whole millimeters.
///
/// Separators ×/x/X are unified, whitespace stripped, comma treated as
/// decimal separator. The first three numeric tokens map positionally
/// to length/width/height; fewer tokens leave the rest absent.
pub fn parse_dimensions(raw: &str) -> ParsedDimensions {
    let compact: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let compact = compact.replace('×', "x").replace(',', ".");

    let unit = if compact.contains("cm") {
        DimUnit::Centimeter
    } else if compact.contains("mm") {
        DimUnit::Millimeter
    } else if compact.contains('m') {
        DimUnit::Meter
    } else {
        DimUnit::AssumedMillimeter
    };
    let scale = match unit {
        DimUnit::Millimeter | DimUnit::AssumedMillimeter => 1.0,
        DimUnit::Centimeter => 10.0,
        DimUnit::Meter => 1000.0,
    };

    let token = Regex::new(r"[-+]?\d+(?:\.\d+)?").unwrap();
    let mut values = token
        .find_iter(&compact)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .map(|v| (v * scale).round() as i64);

    ParsedDimensions {
        triple: Dimensions {
            length_mm: values.next(),
            width_mm: values.next(),
            height_mm: values.next(),
        },
        unit,
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Canonical identifier form for order-insensitive-format equality:
/// uppercased, with whitespace, hyphens, slashes, and underscores
/// removed.
pub fn normalize_identifier(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '/' | '_'))
        .collect()
}

// ---------------------------------------------------------------------------
// Tolerance
// ---------------------------------------------------------------------------

/// Relative-tolerance comparison. Zero (or negative) tolerance means
/// epsilon-bounded exact equality; otherwise `|a-b| <= |a| * pct/100`.
pub fn within_tolerance(a: f64, b: f64, tolerance_pct: f64) -> bool {
    if tolerance_pct <= 0.0 {
        (a - b).abs() <= EPSILON
    } else {
        (a - b).abs() <= a.abs() * tolerance_pct / 100.0
    }
}

// ---------------------------------------------------------------------------
// Material classification
// ---------------------------------------------------------------------------

/// The single canonical code emitted for a confidently classified
/// material note.
pub const CODE_NOT_RELEVANT: &str = "nicht relevant";

/// Process keywords: welding, casting, bonding, forging.
const PROCESS_KEYWORDS: [&str; 5] = ["schweiss", "schweiß", "guss", "kleb", "schmied"];

/// Keyword-based classification of a material note.
///
/// Yields [`CODE_NOT_RELEVANT`] only when the text simultaneously
/// carries the negation marker, at least one process keyword, and the
/// relevance marker. Any other combination yields the empty string:
/// no partial or best-guess mapping.
pub fn classify_material(raw: &str) -> &'static str {
    let lower = raw.to_lowercase();
    let negated = lower.contains("nicht");
    let process = PROCESS_KEYWORDS.iter().any(|k| lower.contains(k));
    let relevant = lower.contains("relevant");
    if negated && process && relevant {
        CODE_NOT_RELEVANT
    } else {
        ""
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decimal_basic() {
        assert_eq!(parse_decimal("3,2"), Some(3.2));
        assert_eq!(parse_decimal("  12.5  "), Some(12.5));
        assert_eq!(parse_decimal("-4"), Some(-4.0));
        assert_eq!(parse_decimal("ca. 7,25 kg netto"), Some(7.25));
        assert_eq!(parse_decimal("n/a"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn weight_unit_scaling() {
        assert_eq!(normalize_weight_kg("500 mg"), Some(0.0005));
        assert_eq!(normalize_weight_kg("250 g"), Some(0.25));
        assert_eq!(normalize_weight_kg("2,5 kg"), Some(2.5));
        assert_eq!(normalize_weight_kg("2.5 t"), Some(2500.0));
        // No unit: assumed kilograms.
        assert_eq!(normalize_weight_kg("3,2"), Some(3.2));
    }

    #[test]
    fn weight_unit_tags() {
        assert_eq!(parse_weight("500 mg").unwrap().unit, WeightUnit::Milligram);
        assert_eq!(parse_weight("250 g").unwrap().unit, WeightUnit::Gram);
        assert_eq!(parse_weight("2,5 kg").unwrap().unit, WeightUnit::Kilogram);
        assert_eq!(parse_weight("2.5 t").unwrap().unit, WeightUnit::Tonne);
        assert_eq!(parse_weight("3,2").unwrap().unit, WeightUnit::AssumedKilogram);
    }

    #[test]
    fn weight_gram_not_after_k() {
        // "Gewicht" carries a bare "g" - classified as grams. The
        // substring heuristic, documented and preserved.
        assert_eq!(parse_weight("Gewicht 2").unwrap().unit, WeightUnit::Gram);
        assert_eq!(parse_weight("2kg").unwrap().unit, WeightUnit::Kilogram);
    }

    #[test]
    fn weight_none_without_number() {
        assert_eq!(parse_weight("kg"), None);
    }

    #[test]
    fn dimensions_mm() {
        let d = parse_dimensions("30x20x10 mm");
        assert_eq!(d.triple.length_mm, Some(30));
        assert_eq!(d.triple.width_mm, Some(20));
        assert_eq!(d.triple.height_mm, Some(10));
        assert_eq!(d.unit, DimUnit::Millimeter);
    }

    #[test]
    fn dimensions_meters_scaled() {
        let d = parse_dimensions("0.3 x 0.2 x 0.1 m");
        assert_eq!(d.triple.length_mm, Some(300));
        assert_eq!(d.triple.width_mm, Some(200));
        assert_eq!(d.triple.height_mm, Some(100));
        assert_eq!(d.unit, DimUnit::Meter);
    }

    #[test]
    fn dimensions_cm_and_unicode_separator() {
        let d = parse_dimensions("3 × 2 × 1 cm");
        assert_eq!(d.triple.length_mm, Some(30));
        assert_eq!(d.triple.width_mm, Some(20));
        assert_eq!(d.triple.height_mm, Some(10));
        assert_eq!(d.unit, DimUnit::Centimeter);
    }

    #[test]
    fn dimensions_partial_and_empty() {
        let d = parse_dimensions("120 X 80");
        assert_eq!(d.triple.length_mm, Some(120));
        assert_eq!(d.triple.width_mm, Some(80));
        assert_eq!(d.triple.height_mm, None);
        assert_eq!(d.unit, DimUnit::AssumedMillimeter);

        assert!(parse_dimensions("").triple.is_empty());
        assert!(parse_dimensions("siehe Zeichnung").triple.is_empty());
    }

    #[test]
    fn dimensions_comma_decimals() {
        let d = parse_dimensions("1,5x2,5x3,5 cm");
        assert_eq!(d.triple.length_mm, Some(15));
        assert_eq!(d.triple.width_mm, Some(25));
        assert_eq!(d.triple.height_mm, Some(35));
    }

    #[test]
    fn identifier_insensitive_to_format() {
        assert_eq!(
            normalize_identifier("a2v-1234 56/7"),
            normalize_identifier("A2V123456 7"),
        );
        assert_eq!(normalize_identifier("ab_12/3-4"), "AB1234");
    }

    #[test]
    fn tolerance_bounds() {
        assert!(!within_tolerance(100.0, 101.0, 0.0));
        assert!(within_tolerance(100.0, 101.0, 2.0));
        assert!(within_tolerance(100.0, 98.5, 2.0));
        assert!(!within_tolerance(100.0, 90.0, 2.0));
        assert!(within_tolerance(3.2, 3.2, 0.0));
    }

    #[test]
    fn material_classification() {
        assert_eq!(classify_material("Nicht Schweiss relevant"), CODE_NOT_RELEVANT);
        assert_eq!(classify_material("nicht gussrelevant"), CODE_NOT_RELEVANT);
        assert_eq!(classify_material("Nicht Schmiede-relevant"), CODE_NOT_RELEVANT);
        // Missing negation, keyword, or relevance marker: no confident
        // signal, no classification.
        assert_eq!(classify_material("Schweiss relevant"), "");
        assert_eq!(classify_material("nicht relevant"), "");
        assert_eq!(classify_material("nicht schweissbar"), "");
        assert_eq!(classify_material(""), "");
    }

    proptest! {
        // For kilogram strings "<num>,<frac> kg" the unit scale is
        // identity: normalize_weight_kg equals parse_decimal with the
        // comma replaced by a dot.
        #[test]
        fn comma_kg_equals_parse_decimal(whole in 0u32..10_000, frac in 0u32..100) {
            let raw = format!("{whole},{frac:02} kg");
            let dotted = format!("{whole}.{frac:02}");
            let expected: f64 = dotted.parse().unwrap();
            prop_assert_eq!(normalize_weight_kg(&raw), Some(expected));
            prop_assert_eq!(parse_decimal(&raw), Some(expected));
        }
    }
}
