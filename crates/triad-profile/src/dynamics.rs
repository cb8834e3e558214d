//! Archetype dynamics: the ten trait scalars of an (upper, lower) pair.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::FallbackConfig;
use crate::error::{ProfileError, ProfileResult};
use crate::strategy::{Provenance, Resolved};
use crate::table::{ArchetypeTable, LOWER_WEIGHT, UPPER_WEIGHT};
use crate::types::{round1, DynamicsScore, TraitScores, TrigramId};
use crate::vector::UserVector;

/// Neutral per-property value used when a trigram has to be estimated.
pub const NEUTRAL_PROPERTY: f64 = 5.0;

const CANONICAL_STRATEGY: &str = "canonical-trigrams";
const USER_VECTOR_STRATEGY: &str = "user-vector-estimate";
const ADJUSTMENT_STRATEGY: &str = "adjustment-estimate";

/// Caller-supplied context used to estimate properties of an invalid trigram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackContext {
    /// Blend all trigrams weighted by the positive components of the vector
    UserVector(UserVector),
    /// Shift the neutral baseline by per-property adjustments
    Adjustments(TraitScores),
}

/// Blend two property sets with the fixed 0.7/0.3 weights.
///
/// Every property is rounded to one decimal and clamped to 0–10.
pub fn blend(upper: &TraitScores, lower: &TraitScores) -> DynamicsScore {
    TraitScores::from_fn(|p| {
        round1(UPPER_WEIGHT * upper.get(p) + LOWER_WEIGHT * lower.get(p))
            .clamp(TraitScores::MIN, TraitScores::MAX)
    })
}

/// Canonical dynamics of a valid trigram pair.
pub fn canonical_dynamics(
    table: &ArchetypeTable,
    upper: TrigramId,
    lower: TrigramId,
) -> DynamicsScore {
    blend(
        &table.trigram(upper).properties,
        &table.trigram(lower).properties,
    )
}

/// Dynamics for raw trigram ids.
///
/// Valid ids yield the canonical score with confidence 1.0. An invalid id is
/// an [`ProfileError::InvalidTrigramId`] unless `context` is given, in which
/// case the invalid side is estimated and the result is marked
/// [`Provenance::Estimated`].
pub fn compute_dynamics(
    table: &ArchetypeTable,
    fallback: &FallbackConfig,
    upper: u8,
    lower: u8,
    context: Option<&FallbackContext>,
) -> ProfileResult<Resolved<DynamicsScore>> {
    let upper_id = TrigramId::new(upper);
    let lower_id = TrigramId::new(lower);

    if let (Ok(u), Ok(l)) = (&upper_id, &lower_id) {
        return Ok(Resolved::canonical(
            canonical_dynamics(table, *u, *l),
            CANONICAL_STRATEGY,
        ));
    }

    let Some(context) = context else {
        let invalid = if upper_id.is_err() { upper } else { lower };
        return Err(ProfileError::InvalidTrigramId(invalid));
    };

    let estimate = estimate_properties(table, context);
    let side = |id: &ProfileResult<TrigramId>| match id {
        Ok(id) => table.trigram(*id).properties,
        Err(_) => estimate,
    };
    let value = blend(&side(&upper_id), &side(&lower_id));

    let (base_confidence, strategy) = match context {
        FallbackContext::UserVector(_) => (fallback.user_vector_confidence, USER_VECTOR_STRATEGY),
        FallbackContext::Adjustments(_) => (fallback.adjustment_confidence, ADJUSTMENT_STRATEGY),
    };
    let both_estimated = upper_id.is_err() && lower_id.is_err();
    let confidence = if both_estimated {
        base_confidence / 2.0
    } else {
        base_confidence
    };

    warn!(upper, lower, strategy, confidence, "Estimating dynamics for invalid trigram id");
    Ok(Resolved::new(value, confidence, Provenance::Estimated, strategy))
}

fn estimate_properties(table: &ArchetypeTable, context: &FallbackContext) -> TraitScores {
    match context {
        FallbackContext::UserVector(vector) => {
            let weights: Vec<f64> = vector
                .as_array()
                .iter()
                .map(|w| if w.is_finite() && *w > 0.0 { *w } else { 0.0 })
                .collect();
            let total: f64 = weights.iter().sum();
            if total <= 0.0 || !total.is_finite() {
                return TraitScores::uniform(NEUTRAL_PROPERTY);
            }
            TraitScores::from_fn(|p| {
                table
                    .trigrams()
                    .iter()
                    .zip(&weights)
                    .map(|(t, w)| t.properties.get(p) * w)
                    .sum::<f64>()
                    / total
            })
        }
        FallbackContext::Adjustments(adjustments) => TraitScores::from_fn(|p| {
            let shift = adjustments.get(p);
            let shift = if shift.is_finite() { shift } else { 0.0 };
            (NEUTRAL_PROPERTY + shift).clamp(TraitScores::MIN, TraitScores::MAX)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CanonicalTableSource;
    use crate::types::{Dimension, TraitProperty};

    fn table() -> ArchetypeTable {
        ArchetypeTable::from_source(&CanonicalTableSource::new()).unwrap()
    }

    #[test]
    fn heaven_over_earth() {
        let table = table();
        let r = compute_dynamics(&table, &FallbackConfig::default(), 1, 8, None).unwrap();
        assert_eq!(r.provenance, Provenance::Canonical);
        assert_eq!(r.confidence, 1.0);
        assert_eq!(r.value.innovation, 7.2);
        assert_eq!(r.value.stability, 7.3);
        assert_eq!(r.value.support_seeking, 3.8);
    }

    #[test]
    fn all_pairs_in_range_and_deterministic() {
        let table = table();
        let fallback = FallbackConfig::default();
        for upper in 1..=8 {
            for lower in 1..=8 {
                let a = compute_dynamics(&table, &fallback, upper, lower, None).unwrap();
                let b = compute_dynamics(&table, &fallback, upper, lower, None).unwrap();
                assert!(a.value.is_in_range());
                for p in TraitProperty::ALL {
                    assert_eq!(a.value.get(p).to_bits(), b.value.get(p).to_bits());
                }
            }
        }
    }

    #[test]
    fn invalid_id_without_context_fails() {
        let table = table();
        let err = compute_dynamics(&table, &FallbackConfig::default(), 1, 9, None).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidTrigramId(9)));
        let err = compute_dynamics(&table, &FallbackConfig::default(), 0, 3, None).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidTrigramId(0)));
    }

    #[test]
    fn user_vector_estimate() {
        let table = table();
        let mut v = UserVector::zero();
        v.add(Dimension::Exploration, 2.0);
        v.add(Dimension::Harmony, -4.0);
        let ctx = FallbackContext::UserVector(v);
        let r = compute_dynamics(&table, &FallbackConfig::default(), 1, 12, Some(&ctx)).unwrap();
        assert_eq!(r.provenance, Provenance::Estimated);
        assert_eq!(r.confidence, 0.5);
        assert_eq!(r.strategy, "user-vector-estimate");
        // lower side becomes Water: 0.7 * 9 + 0.3 * 5 innovation
        assert_eq!(r.value.innovation, 7.8);
    }

    #[test]
    fn adjustment_estimate_for_both_sides() {
        let table = table();
        let mut adjustments = TraitScores::default();
        adjustments.cooperation = 2.0;
        adjustments.independence = -7.0;
        let ctx = FallbackContext::Adjustments(adjustments);
        let r = compute_dynamics(&table, &FallbackConfig::default(), 0, 42, Some(&ctx)).unwrap();
        assert_eq!(r.provenance, Provenance::Estimated);
        assert_eq!(r.confidence, 0.15);
        assert_eq!(r.value.cooperation, 7.0);
        assert_eq!(r.value.independence, 0.0);
        assert_eq!(r.value.innovation, NEUTRAL_PROPERTY);
    }

    #[test]
    fn zero_vector_estimates_neutral() {
        let table = table();
        let ctx = FallbackContext::UserVector(UserVector::zero());
        let r = compute_dynamics(&table, &FallbackConfig::default(), 9, 9, Some(&ctx)).unwrap();
        assert_eq!(r.value, TraitScores::uniform(NEUTRAL_PROPERTY));
    }

    #[test]
    fn valid_ids_ignore_context() {
        let table = table();
        let ctx = FallbackContext::Adjustments(TraitScores::uniform(3.0));
        let r = compute_dynamics(&table, &FallbackConfig::default(), 4, 4, Some(&ctx)).unwrap();
        assert_eq!(r.provenance, Provenance::Canonical);
        assert_eq!(r.value, table.trigram(TrigramId::new(4).unwrap()).properties);
    }
}
