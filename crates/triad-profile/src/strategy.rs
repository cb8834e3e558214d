//! Provenance tracking for values that may come from a fallback path.

use serde::{Deserialize, Serialize};

/// Where a value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Computed from canonical table data
    Canonical,
    /// Looked up in a precomputed matrix
    Precomputed,
    /// Derived by a heuristic over canonical data
    Heuristic,
    /// Estimated from caller-supplied context in place of missing data
    Estimated,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Canonical => "canonical",
            Provenance::Precomputed => "precomputed",
            Provenance::Heuristic => "heuristic",
            Provenance::Estimated => "estimated",
        }
    }

    /// Heuristic and estimated values are never authoritative.
    pub fn is_authoritative(&self) -> bool {
        matches!(self, Provenance::Canonical | Provenance::Precomputed)
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value together with the strategy that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolved<T> {
    pub value: T,
    /// Confidence in [0, 1]; 1.0 only for authoritative values
    pub confidence: f64,
    pub provenance: Provenance,
    /// Name of the strategy that produced the value
    pub strategy: String,
}

impl<T> Resolved<T> {
    pub fn new(
        value: T,
        confidence: f64,
        provenance: Provenance,
        strategy: impl Into<String>,
    ) -> Self {
        Self {
            value,
            confidence: crate::types::clamp01(confidence),
            provenance,
            strategy: strategy.into(),
        }
    }

    pub fn canonical(value: T, strategy: impl Into<String>) -> Self {
        Self::new(value, 1.0, Provenance::Canonical, strategy)
    }

    pub fn is_estimate(&self) -> bool {
        !self.provenance.is_authoritative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_values_are_fully_confident() {
        let r = Resolved::canonical(3u8, "canonical-trigrams");
        assert_eq!(r.confidence, 1.0);
        assert!(!r.is_estimate());
        assert_eq!(r.strategy, "canonical-trigrams");
    }

    #[test]
    fn confidence_is_clamped() {
        let r = Resolved::new((), 1.7, Provenance::Heuristic, "h");
        assert_eq!(r.confidence, 1.0);
        assert!(r.is_estimate());
    }

    #[test]
    fn provenance_serializes_snake_case() {
        let json = serde_json::to_string(&Provenance::Precomputed).unwrap();
        assert_eq!(json, "\"precomputed\"");
        assert!(Provenance::Precomputed.is_authoritative());
        assert!(!Provenance::Estimated.is_authoritative());
    }
}
