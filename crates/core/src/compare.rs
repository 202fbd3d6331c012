//! Field-level comparison into tri-state verdicts.
//!
//! Each comparison takes the document-side value first and the
//! retrieved (web) value second, and returns a verdict plus a
//! human-readable comment that ends up in the comparison row.

use serde::Serialize;

use crate::model::Dimensions;
use crate::normalize::{
    normalize_identifier, normalize_weight_kg, parse_decimal, parse_dimensions, within_tolerance,
    EPSILON,
};

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Tri-state outcome of comparing one attribute between two sources.
///
/// Both sides present but ambiguous is not a distinct state; it is
/// `Mismatch`. One or both sides absent is `Unresolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Match,
    Mismatch,
    Unresolved,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "MATCH"),
            Self::Mismatch => write!(f, "MISMATCH"),
            Self::Unresolved => write!(f, "UNRESOLVED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldComparison {
    pub verdict: Verdict,
    pub comment: String,
}

impl FieldComparison {
    fn new(verdict: Verdict, comment: impl Into<String>) -> Self {
        Self { verdict, comment: comment.into() }
    }
}

// ---------------------------------------------------------------------------
// Absence handling
// ---------------------------------------------------------------------------

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Shared three-way absence handling: both missing, or one side
/// missing, is unresolved naming the absent side. Present-present
/// returns `None` and the caller decides.
fn absence(doc: &str, web: &str) -> Option<FieldComparison> {
    match (is_blank(doc), is_blank(web)) {
        (true, true) => Some(FieldComparison::new(Verdict::Unresolved, "both values missing")),
        (true, false) => Some(FieldComparison::new(Verdict::Unresolved, "missing in document")),
        (false, true) => Some(FieldComparison::new(Verdict::Unresolved, "missing in web data")),
        (false, false) => None,
    }
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

/// Case-insensitive, whitespace-collapsed text equality.
pub fn compare_text(doc: &str, web: &str) -> FieldComparison {
    if let Some(unresolved) = absence(doc, web) {
        return unresolved;
    }
    if collapse_ws(doc).to_lowercase() == collapse_ws(web).to_lowercase() {
        FieldComparison::new(Verdict::Match, "ok")
    } else {
        FieldComparison::new(
            Verdict::Mismatch,
            format!("\"{}\" != \"{}\"", doc.trim(), web.trim()),
        )
    }
}

/// Identifier equality after canonicalization (case, whitespace,
/// hyphen, slash, underscore insensitive).
pub fn compare_identifier(doc: &str, web: &str) -> FieldComparison {
    if let Some(unresolved) = absence(doc, web) {
        return unresolved;
    }
    if normalize_identifier(doc) == normalize_identifier(web) {
        FieldComparison::new(Verdict::Match, "ok")
    } else {
        FieldComparison::new(
            Verdict::Mismatch,
            format!("\"{}\" != \"{}\"", doc.trim(), web.trim()),
        )
    }
}

/// Weight comparison in kilograms with a relative tolerance.
///
/// The comment always reports the percentage delta `(web-doc)/|doc|`,
/// with the denominator floored at epsilon.
pub fn compare_weight(doc: &str, web: &str, tolerance_pct: f64) -> FieldComparison {
    let doc_kg = normalize_weight_kg(doc);
    let web_kg = normalize_weight_kg(web);
    match (doc_kg, web_kg) {
        (None, None) => FieldComparison::new(Verdict::Unresolved, "both values missing"),
        (None, Some(_)) => FieldComparison::new(Verdict::Unresolved, "missing in document"),
        (Some(_), None) => FieldComparison::new(Verdict::Unresolved, "missing in web data"),
        (Some(a), Some(b)) => {
            let delta_pct = (b - a) / a.abs().max(EPSILON) * 100.0;
            let verdict = if within_tolerance(a, b, tolerance_pct) {
                Verdict::Match
            } else {
                Verdict::Mismatch
            };
            FieldComparison::new(
                verdict,
                format!("{a} kg vs {b} kg (delta {delta_pct:+.2}%)"),
            )
        }
    }
}

/// Dimension comparison: three discrete cells on the document side
/// against one combined text field on the web side.
///
/// A side is absent only when all three of its components are absent.
/// Otherwise the components are compared independently and all three
/// must match.
pub fn compare_dimensions(
    length_raw: &str,
    width_raw: &str,
    height_raw: &str,
    combined: &str,
) -> FieldComparison {
    let doc = Dimensions {
        length_mm: parse_decimal(length_raw).map(|v| v.round() as i64),
        width_mm: parse_decimal(width_raw).map(|v| v.round() as i64),
        height_mm: parse_decimal(height_raw).map(|v| v.round() as i64),
    };
    let web = parse_dimensions(combined).triple;

    match (doc.is_empty(), web.is_empty()) {
        (true, true) => return FieldComparison::new(Verdict::Unresolved, "both values missing"),
        (true, false) => return FieldComparison::new(Verdict::Unresolved, "missing in document"),
        (false, true) => return FieldComparison::new(Verdict::Unresolved, "missing in web data"),
        (false, false) => {}
    }

    let pairs = [
        (doc.length_mm, web.length_mm),
        (doc.width_mm, web.width_mm),
        (doc.height_mm, web.height_mm),
    ];
    let all_match = pairs.iter().all(|(d, w)| d == w);

    if all_match {
        FieldComparison::new(Verdict::Match, "ok")
    } else {
        FieldComparison::new(
            Verdict::Mismatch,
            format!("{} != {} mm", format_triple(&doc), format_triple(&web)),
        )
    }
}

fn format_triple(d: &Dimensions) -> String {
    let part = |v: Option<i64>| v.map_or_else(|| "?".to_string(), |n| n.to_string());
    format!(
        "{}x{}x{}",
        part(d.length_mm),
        part(d.width_mm),
        part(d.height_mm),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_absence_three_way() {
        assert_eq!(compare_text("", "").verdict, Verdict::Unresolved);
        assert_eq!(compare_text("", "").comment, "both values missing");
        assert_eq!(compare_text("", "Puffer").comment, "missing in document");
        assert_eq!(compare_text("Puffer", "  ").comment, "missing in web data");
    }

    #[test]
    fn text_case_and_whitespace_insensitive() {
        let c = compare_text("Puffer  DG58", "puffer dg58");
        assert_eq!(c.verdict, Verdict::Match);

        let c = compare_text("Puffer DG58", "Puffer DG60");
        assert_eq!(c.verdict, Verdict::Mismatch);
        assert!(c.comment.contains("Puffer DG58"));
        assert!(c.comment.contains("Puffer DG60"));
    }

    #[test]
    fn identifier_format_insensitive() {
        let c = compare_identifier("a2v-1234 56/7", "A2V123456 7");
        assert_eq!(c.verdict, Verdict::Match);

        let c = compare_identifier("A2V1234567", "A2V1234568");
        assert_eq!(c.verdict, Verdict::Mismatch);
    }

    #[test]
    fn weight_within_and_outside_tolerance() {
        assert_eq!(compare_weight("100 kg", "101 kg", 2.0).verdict, Verdict::Match);
        assert_eq!(compare_weight("100 kg", "101 kg", 0.0).verdict, Verdict::Mismatch);
        // Cross-unit: 2,5 kg vs 2500 g.
        assert_eq!(compare_weight("2,5 kg", "2500 g", 0.0).verdict, Verdict::Match);
    }

    #[test]
    fn weight_comment_reports_delta() {
        let c = compare_weight("100 kg", "101 kg", 2.0);
        assert!(c.comment.contains("+1.00%"), "comment: {}", c.comment);
        let c = compare_weight("100 kg", "98 kg", 0.0);
        assert!(c.comment.contains("-2.00%"), "comment: {}", c.comment);
    }

    #[test]
    fn weight_absence() {
        assert_eq!(compare_weight("", "", 0.0).verdict, Verdict::Unresolved);
        assert_eq!(compare_weight("n/a", "5 kg", 0.0).comment, "missing in document");
        assert_eq!(compare_weight("5 kg", "", 0.0).comment, "missing in web data");
    }

    #[test]
    fn dimensions_all_three_must_match() {
        let c = compare_dimensions("30", "20", "10", "30x20x10 mm");
        assert_eq!(c.verdict, Verdict::Match);

        let c = compare_dimensions("30", "20", "10", "30x20x11 mm");
        assert_eq!(c.verdict, Verdict::Mismatch);
        assert!(c.comment.contains("30x20x10"));
        assert!(c.comment.contains("30x20x11"));
    }

    #[test]
    fn dimensions_unit_scaling_on_web_side() {
        let c = compare_dimensions("300", "200", "100", "0.3 x 0.2 x 0.1 m");
        assert_eq!(c.verdict, Verdict::Match);
    }

    #[test]
    fn dimensions_absence_is_all_components() {
        let c = compare_dimensions("", "", "", "");
        assert_eq!(c.verdict, Verdict::Unresolved);
        // One populated component makes the side present.
        let c = compare_dimensions("30", "", "", "30x20x10");
        assert_eq!(c.verdict, Verdict::Mismatch);
    }
}
