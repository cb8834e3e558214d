//! Pairwise compatibility between archetypes.
//!
//! A relation is resolved by an ordered list of strategies: a lookup in the
//! precomputed matrix first, then a heuristic over both archetypes'
//! dynamics. Every result carries its provenance and confidence.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{EngineConfig, HeuristicWeights};
use crate::dynamics::canonical_dynamics;
use crate::error::{ProfileError, ProfileResult};
use crate::strategy::{Provenance, Resolved};
use crate::table::{ArchetypeTable, CompatibilityMatrix};
use crate::types::{clamp01, ArchetypeId, DynamicsScore, TraitProperty, TraitScores};

/// Five-axis relation scores, each in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationScores {
    pub synergy: f64,
    pub harmony: f64,
    pub tension: f64,
    pub conflict: f64,
    pub chaos: f64,
}

impl RelationScores {
    pub fn is_in_range(&self) -> bool {
        [
            self.synergy,
            self.harmony,
            self.tension,
            self.conflict,
            self.chaos,
        ]
        .iter()
        .all(|v| (0.0..=1.0).contains(v))
    }

    /// The dominant axis. Ties resolve in the order synergy, harmony,
    /// tension, conflict, chaos.
    pub fn classify(&self) -> RelationType {
        let axes = [
            (RelationType::Synergy, self.synergy),
            (RelationType::Harmony, self.harmony),
            (RelationType::Tension, self.tension),
            (RelationType::Conflict, self.conflict),
            (RelationType::Chaos, self.chaos),
        ];
        let mut best = axes[0];
        for axis in &axes[1..] {
            if axis.1 > best.1 {
                best = *axis;
            }
        }
        best.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Synergy,
    Harmony,
    Tension,
    Conflict,
    Chaos,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Synergy => "SYNERGY",
            RelationType::Harmony => "HARMONY",
            RelationType::Tension => "TENSION",
            RelationType::Conflict => "CONFLICT",
            RelationType::Chaos => "CHAOS",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            RelationType::Synergy => {
                "These roles amplify each other. Lean on the combination when facing new challenges."
            }
            RelationType::Harmony => {
                "These roles cooperate smoothly. Use the stable footing to sustain long efforts."
            }
            RelationType::Tension => {
                "These roles pull in different directions. Treat the friction as a source of energy and keep it visible."
            }
            RelationType::Conflict => {
                "These roles work against each other. Decide deliberately which one leads in each situation."
            }
            RelationType::Chaos => {
                "This combination is unpredictable. Build routines that give it structure before relying on it."
            }
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The evaluated relation of an archetype pair.
///
/// The pair is stored in ascending order, so the relation of `(a, b)` is
/// equal to the relation of `(b, a)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityRelation {
    pub a: ArchetypeId,
    pub b: ArchetypeId,
    pub scores: RelationScores,
    pub relation_type: RelationType,
    pub advice: String,
    pub provenance: Provenance,
    pub confidence: f64,
    pub strategy: String,
}

impl CompatibilityRelation {
    fn from_resolved(a: ArchetypeId, b: ArchetypeId, resolved: Resolved<RelationScores>) -> Self {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        let relation_type = resolved.value.classify();
        Self {
            a,
            b,
            scores: resolved.value,
            relation_type,
            advice: relation_type.advice().to_string(),
            provenance: resolved.provenance,
            confidence: resolved.confidence,
            strategy: resolved.strategy,
        }
    }
}

/// One way of producing relation scores for a pair.
pub trait CompatibilityStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` when this strategy has no answer for the pair.
    fn evaluate(
        &self,
        table: &ArchetypeTable,
        a: ArchetypeId,
        b: ArchetypeId,
    ) -> Option<Resolved<RelationScores>>;
}

/// Direct lookup in the table's precomputed matrix.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrecomputedTableStrategy;

impl CompatibilityStrategy for PrecomputedTableStrategy {
    fn name(&self) -> &'static str {
        "precomputed-table"
    }

    fn evaluate(
        &self,
        table: &ArchetypeTable,
        a: ArchetypeId,
        b: ArchetypeId,
    ) -> Option<Resolved<RelationScores>> {
        let scores = table.matrix()?.get(a, b)?;
        Some(Resolved::new(*scores, 1.0, Provenance::Precomputed, self.name()))
    }
}

/// Scores derived from the two archetypes' dynamics.
#[derive(Clone, Copy, Debug)]
pub struct DynamicsHeuristicStrategy {
    weights: HeuristicWeights,
    confidence: f64,
}

impl DynamicsHeuristicStrategy {
    pub fn new(weights: HeuristicWeights, confidence: f64) -> Self {
        Self {
            weights,
            confidence,
        }
    }
}

impl CompatibilityStrategy for DynamicsHeuristicStrategy {
    fn name(&self) -> &'static str {
        "dynamics-heuristic"
    }

    fn evaluate(
        &self,
        table: &ArchetypeTable,
        a: ArchetypeId,
        b: ArchetypeId,
    ) -> Option<Resolved<RelationScores>> {
        let scores = heuristic_scores(
            &archetype_dynamics(table, a),
            &archetype_dynamics(table, b),
            &self.weights,
        );
        Some(Resolved::new(scores, self.confidence, Provenance::Heuristic, self.name()))
    }
}

fn archetype_dynamics(table: &ArchetypeTable, id: ArchetypeId) -> DynamicsScore {
    let (upper, lower) = id.trigrams();
    canonical_dynamics(table, upper, lower)
}

/// Relation scores of two dynamics profiles.
///
/// Properties are scaled to [0, 1]; `d` is the mean absolute difference and
/// `s = 1 - d`. Every term is symmetric in `x` and `y`.
pub fn heuristic_scores(x: &TraitScores, y: &TraitScores, w: &HeuristicWeights) -> RelationScores {
    let unit = |scores: &TraitScores, p: TraitProperty| scores.get(p) / TraitScores::MAX;
    let mean = |p: TraitProperty| (unit(x, p) + unit(y, p)) / 2.0;
    let gap = |p: TraitProperty| (unit(x, p) - unit(y, p)).abs();

    let d = TraitProperty::ALL.iter().map(|p| gap(*p)).sum::<f64>()
        / TraitProperty::ALL.len() as f64;
    let s = 1.0 - d;
    let spread = (d * w.distance_gain).min(1.0);

    let synergy = w.synergy_similarity * s
        + w.synergy_cooperation * mean(TraitProperty::Cooperation)
        + w.synergy_innovation * mean(TraitProperty::Innovation);
    let harmony = w.harmony_similarity * s
        + w.harmony_stability * mean(TraitProperty::Stability)
        + w.harmony_cooperation * mean(TraitProperty::Cooperation);
    let tension =
        w.tension_distance * spread + w.tension_independence * mean(TraitProperty::Independence);
    let conflict = w.conflict_distance * spread
        + w.conflict_independence_gap * gap(TraitProperty::Independence)
        + w.conflict_protection * mean(TraitProperty::Protection) * spread;
    let chaos = w.chaos_stability_gap * gap(TraitProperty::Stability)
        + w.chaos_instability * (1.0 - mean(TraitProperty::Stability))
        + w.chaos_adaptability * mean(TraitProperty::Adaptability) * spread;

    RelationScores {
        synergy: clamp01(synergy),
        harmony: clamp01(harmony),
        tension: clamp01(tension),
        conflict: clamp01(conflict),
        chaos: clamp01(chaos),
    }
}

impl CompatibilityMatrix {
    /// Materialize the full matrix from the dynamics heuristic.
    pub fn precompute(table: &ArchetypeTable, weights: &HeuristicWeights) -> Self {
        let dynamics: Vec<DynamicsScore> = ArchetypeId::all()
            .map(|id| archetype_dynamics(table, id))
            .collect();
        let mut matrix = CompatibilityMatrix::default();
        for a in ArchetypeId::all() {
            for b in ArchetypeId::all().filter(|b| *b >= a) {
                let scores = heuristic_scores(&dynamics[a.index()], &dynamics[b.index()], weights);
                matrix.insert(a, b, scores);
            }
        }
        debug!(entries = matrix.len(), "Compatibility matrix precomputed");
        matrix
    }
}

/// Resolves relations through an ordered list of strategies.
pub struct CompatibilityEvaluator {
    strategies: Vec<Box<dyn CompatibilityStrategy>>,
}

impl CompatibilityEvaluator {
    /// Matrix lookup, then the dynamics heuristic unless disabled.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut strategies: Vec<Box<dyn CompatibilityStrategy>> =
            vec![Box::new(PrecomputedTableStrategy)];
        if config.fallback.heuristic_enabled {
            strategies.push(Box::new(DynamicsHeuristicStrategy::new(
                config.heuristic,
                config.fallback.heuristic_confidence,
            )));
        }
        Self::with_strategies(strategies)
    }

    pub fn with_strategies(strategies: Vec<Box<dyn CompatibilityStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Evaluate a pair with the first strategy that yields a value.
    pub fn evaluate(
        &self,
        table: &ArchetypeTable,
        a: ArchetypeId,
        b: ArchetypeId,
    ) -> ProfileResult<CompatibilityRelation> {
        for strategy in &self.strategies {
            if let Some(resolved) = strategy.evaluate(table, a, b) {
                if resolved.is_estimate() {
                    warn!(
                        a = %a,
                        b = %b,
                        strategy = strategy.name(),
                        confidence = resolved.confidence,
                        "Compatibility derived without precomputed data"
                    );
                } else {
                    debug!(a = %a, b = %b, strategy = strategy.name(), "Compatibility resolved");
                }
                return Ok(CompatibilityRelation::from_resolved(a, b, resolved));
            }
        }
        Err(ProfileError::UnknownArchetypePair {
            a: a.get(),
            b: b.get(),
        })
    }
}

impl std::fmt::Debug for CompatibilityEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompatibilityEvaluator")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CanonicalTableSource;

    fn id(raw: u8) -> ArchetypeId {
        ArchetypeId::new(raw).unwrap()
    }

    fn table() -> ArchetypeTable {
        ArchetypeTable::from_source(&CanonicalTableSource::new()).unwrap()
    }

    fn scores(
        synergy: f64,
        harmony: f64,
        tension: f64,
        conflict: f64,
        chaos: f64,
    ) -> RelationScores {
        RelationScores {
            synergy,
            harmony,
            tension,
            conflict,
            chaos,
        }
    }

    #[test]
    fn classification_picks_the_dominant_axis() {
        assert_eq!(scores(0.1, 0.2, 0.9, 0.3, 0.1).classify(), RelationType::Tension);
        assert_eq!(scores(0.1, 0.2, 0.3, 0.3, 0.8).classify(), RelationType::Chaos);
    }

    #[test]
    fn classification_ties_follow_fixed_order() {
        assert_eq!(scores(0.5, 0.5, 0.5, 0.5, 0.5).classify(), RelationType::Synergy);
        assert_eq!(scores(0.1, 0.6, 0.6, 0.6, 0.1).classify(), RelationType::Harmony);
        assert_eq!(scores(0.0, 0.0, 0.0, 0.4, 0.4).classify(), RelationType::Conflict);
    }

    #[test]
    fn identical_archetypes_are_synergistic() {
        let table = table();
        let evaluator = CompatibilityEvaluator::from_config(&EngineConfig::default());
        let relation = evaluator.evaluate(&table, id(1), id(1)).unwrap();
        assert_eq!(relation.provenance, Provenance::Heuristic);
        assert_eq!(relation.confidence, 0.6);
        assert_eq!(relation.strategy, "dynamics-heuristic");
        assert_eq!(relation.scores.conflict, 0.0);
        assert!((relation.scores.synergy - 0.79).abs() < 1e-9);
        assert_eq!(relation.relation_type, RelationType::Synergy);
        assert_eq!(relation.advice, RelationType::Synergy.advice());
    }

    #[test]
    fn relations_are_symmetric_for_all_pairs() {
        let table = table();
        let evaluator = CompatibilityEvaluator::from_config(&EngineConfig::default());
        for a in ArchetypeId::all() {
            for b in ArchetypeId::all().filter(|b| *b > a) {
                let ab = evaluator.evaluate(&table, a, b).unwrap();
                let ba = evaluator.evaluate(&table, b, a).unwrap();
                assert_eq!(ab, ba);
                assert!(ab.scores.is_in_range());
                assert!(ab.a <= ab.b);
            }
        }
    }

    #[test]
    fn distant_archetypes_carry_more_conflict() {
        let table = table();
        let evaluator = CompatibilityEvaluator::from_config(&EngineConfig::default());
        let same = evaluator.evaluate(&table, id(4), id(4)).unwrap();
        // Thunder over Thunder against Earth over Earth
        let far = evaluator.evaluate(&table, id(4), id(64)).unwrap();
        assert!(far.scores.conflict > same.scores.conflict);
        assert!(far.scores.synergy < same.scores.synergy);
    }

    #[test]
    fn precomputed_entries_win() {
        let mut matrix = CompatibilityMatrix::default();
        matrix.insert(id(5), id(9), scores(0.1, 0.2, 0.3, 0.9, 0.1));
        let table =
            ArchetypeTable::from_source(&CanonicalTableSource::with_matrix(matrix)).unwrap();
        let evaluator = CompatibilityEvaluator::from_config(&EngineConfig::default());

        let relation = evaluator.evaluate(&table, id(9), id(5)).unwrap();
        assert_eq!(relation.provenance, Provenance::Precomputed);
        assert_eq!(relation.confidence, 1.0);
        assert_eq!(relation.relation_type, RelationType::Conflict);
        assert_eq!((relation.a.get(), relation.b.get()), (5, 9));

        let fallback = evaluator.evaluate(&table, id(5), id(10)).unwrap();
        assert_eq!(fallback.provenance, Provenance::Heuristic);
    }

    #[test]
    fn no_strategy_yields_unknown_pair() {
        let table = table();
        let mut config = EngineConfig::default();
        config.fallback.heuristic_enabled = false;
        let evaluator = CompatibilityEvaluator::from_config(&config);
        assert_eq!(evaluator.strategy_names(), vec!["precomputed-table"]);
        let err = evaluator.evaluate(&table, id(2), id(3)).unwrap_err();
        assert!(matches!(err, ProfileError::UnknownArchetypePair { a: 2, b: 3 }));
    }

    #[test]
    fn precompute_matches_heuristic() {
        let table = table();
        let weights = HeuristicWeights::default();
        let matrix = CompatibilityMatrix::precompute(&table, &weights);
        assert_eq!(matrix.len(), 64 * 65 / 2);

        let heuristic = DynamicsHeuristicStrategy::new(weights, 0.6);
        let expected = heuristic.evaluate(&table, id(17), id(3)).unwrap().value;
        assert_eq!(matrix.get(id(3), id(17)), Some(&expected));

        let round_trip = CompatibilityMatrix::from_entries(matrix.to_entries()).unwrap();
        assert_eq!(round_trip, matrix);
    }
}
