//! The profile engine: the public entry point for analysis.

use std::sync::Arc;

use tracing::{info, warn};

use crate::answers::AnswerSet;
use crate::compatibility::{CompatibilityEvaluator, CompatibilityRelation};
use crate::composer::{compose, Profile, ProfileRelations};
use crate::config::EngineConfig;
use crate::dynamics::{self, FallbackContext};
use crate::error::{ProfileError, ProfileResult};
use crate::exemplar::{ExemplarLibrary, RoleTriple};
use crate::patterns::PatternDetector;
use crate::resolver::RoleResolver;
use crate::source::{CanonicalExemplarLibrary, CanonicalTableSource};
use crate::strategy::Resolved;
use crate::table::ArchetypeTable;
use crate::types::{ArchetypeId, DynamicsScore};

/// Computes profiles against a shared, read-only archetype table.
///
/// The engine holds no mutable state; one instance can serve concurrent
/// analyses.
#[derive(Debug)]
pub struct ProfileEngine {
    table: Arc<ArchetypeTable>,
    exemplars: Arc<ExemplarLibrary>,
    config: EngineConfig,
    evaluator: CompatibilityEvaluator,
}

impl ProfileEngine {
    /// Build an engine. Fails if the configuration does not validate.
    pub fn new(
        table: Arc<ArchetypeTable>,
        exemplars: Arc<ExemplarLibrary>,
        config: EngineConfig,
    ) -> ProfileResult<Self> {
        config.validate()?;
        let evaluator = CompatibilityEvaluator::from_config(&config);
        info!(
            archetypes = table.archetypes().len(),
            exemplars = exemplars.len(),
            strategies = ?evaluator.strategy_names(),
            "Profile engine ready"
        );
        Ok(Self {
            table,
            exemplars,
            config,
            evaluator,
        })
    }

    /// Engine over the built-in table and exemplar library.
    pub fn canonical(config: EngineConfig) -> ProfileResult<Self> {
        let table = ArchetypeTable::from_source(&CanonicalTableSource::new())?;
        let exemplars = ExemplarLibrary::from_source(&CanonicalExemplarLibrary)?;
        Self::new(Arc::new(table), Arc::new(exemplars), config)
    }

    pub fn table(&self) -> &Arc<ArchetypeTable> {
        &self.table
    }

    pub fn exemplars(&self) -> &Arc<ExemplarLibrary> {
        &self.exemplars
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline over an answer set.
    ///
    /// Returns a complete profile or an error; never a partial result.
    pub fn analyze(&self, answers: &AnswerSet) -> ProfileResult<Profile> {
        let roles = RoleResolver::new(&self.table, &self.config.resolver, answers).resolve()?;

        let relations = ProfileRelations {
            engine_interface: self.relation(roles.engine.archetype, roles.interface.archetype)?,
            engine_safe_mode: self.relation(roles.engine.archetype, roles.safe_mode.archetype)?,
            interface_safe_mode: self
                .relation(roles.interface.archetype, roles.safe_mode.archetype)?,
        };

        let special_pattern = PatternDetector::new(self.config.patterns)
            .detect(&relations.as_array(), answers.context.as_ref());

        let triple = RoleTriple::new(
            roles.engine.archetype,
            roles.interface.archetype,
            roles.safe_mode.archetype,
        );
        let exemplars = self.exemplars.find_matches(&triple, &self.config.exemplars);

        let profile = compose(
            roles,
            relations,
            special_pattern,
            exemplars,
            &self.config.patterns,
        );

        if profile.low_confidence {
            warn!(
                profile_id = %profile.metadata.profile_id,
                "Profile built from insufficient answers"
            );
        }
        info!(
            profile_id = %profile.metadata.profile_id,
            engine = %profile.engine.archetype,
            interface = %profile.interface.archetype,
            safe_mode = %profile.safe_mode.archetype,
            effectiveness = profile.effectiveness,
            pattern = profile.special_pattern.as_ref().map(|p| p.name.as_str()),
            exemplars = profile.exemplars.len(),
            "Profile analyzed"
        );
        Ok(profile)
    }

    /// Dynamics of a trigram pair, estimated from `context` when an id is
    /// invalid.
    pub fn compute_dynamics(
        &self,
        upper: u8,
        lower: u8,
        context: Option<&FallbackContext>,
    ) -> ProfileResult<Resolved<DynamicsScore>> {
        dynamics::compute_dynamics(&self.table, &self.config.fallback, upper, lower, context)
    }

    /// Relation between two archetypes by raw id.
    pub fn evaluate_compatibility(&self, a: u8, b: u8) -> ProfileResult<CompatibilityRelation> {
        match (ArchetypeId::new(a), ArchetypeId::new(b)) {
            (Ok(a), Ok(b)) => self.relation(a, b),
            _ => Err(ProfileError::UnknownArchetypePair { a, b }),
        }
    }

    fn relation(&self, a: ArchetypeId, b: ArchetypeId) -> ProfileResult<CompatibilityRelation> {
        self.evaluator.evaluate(&self.table, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{Answer, AnswerCategory};
    use crate::strategy::Provenance;

    fn engine() -> ProfileEngine {
        ProfileEngine::canonical(EngineConfig::default()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected_at_build() {
        let mut config = EngineConfig::default();
        config.fallback.heuristic_confidence = 2.0;
        let err = ProfileEngine::canonical(config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn analyze_basic_answers() {
        let engine = engine();
        let answers = AnswerSet::new(vec![
            Answer::new("w1", AnswerCategory::Worldview)
                .with_tag("creativity", 5.0)
                .with_tag("receptivity", 2.0),
            Answer::new("o1", AnswerCategory::ScenarioOuter).with_tag("leadership", 1.0),
            Answer::new("i1", AnswerCategory::ScenarioInner).with_tag("caution", 1.0),
        ]);
        let profile = engine.analyze(&answers).unwrap();
        assert_eq!(profile.engine.archetype.get(), 8);
        assert_eq!(profile.interface.archetype.get(), 1);
        assert_eq!(profile.safe_mode.archetype.get(), 6);
        assert!(!profile.low_confidence);
        assert!((0.0..=1.0).contains(&profile.effectiveness));
        assert!(profile.exemplars.len() <= 3);

        let ei = &profile.relations.engine_interface;
        assert_eq!((ei.a.get(), ei.b.get()), (1, 8));
        assert_eq!(ei.provenance, Provenance::Heuristic);
    }

    #[test]
    fn empty_answers_give_low_confidence_profile() {
        let engine = engine();
        let profile = engine.analyze(&AnswerSet::default()).unwrap();
        assert!(profile.low_confidence);
        assert!(profile.user_vector.is_zero());
        assert_eq!(profile.engine.archetype.get(), 1);
        assert_eq!(profile.confidence, 0.0);
    }

    #[test]
    fn compatibility_by_raw_id() {
        let engine = engine();
        assert_eq!(
            engine.evaluate_compatibility(12, 40).unwrap(),
            engine.evaluate_compatibility(40, 12).unwrap()
        );
        let err = engine.evaluate_compatibility(0, 65).unwrap_err();
        assert!(matches!(err, ProfileError::UnknownArchetypePair { a: 0, b: 65 }));
    }

    #[test]
    fn dynamics_through_engine() {
        let engine = engine();
        let r = engine.compute_dynamics(1, 8, None).unwrap();
        assert_eq!(r.value.innovation, 7.2);
        assert!(engine.compute_dynamics(1, 9, None).is_err());
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProfileEngine>();

        let engine = Arc::new(engine());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    engine
                        .analyze(&AnswerSet::new(vec![Answer::new("w", AnswerCategory::Worldview)
                            .with_tag("water", 1.0)]))
                        .map(|p| p.engine.archetype.get())
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 46);
        }
    }
}
