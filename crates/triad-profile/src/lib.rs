//! # triad-profile
//!
//! Three-role archetype profiles computed from questionnaire answers.
//!
//! ## Roles
//!
//! Every profile binds three roles to one of 64 archetypes:
//!
//! - **Engine**: core values, matched by cosine similarity of the worldview
//!   answer vector against each archetype's reference vector
//! - **Interface**: outward behaviour, matched by keyword intersection of
//!   outer-choice scenario tags
//! - **SafeMode**: behaviour under stress, matched by keyword intersection of
//!   inner-choice scenario tags
//!
//! Interface and SafeMode never take the Engine's archetype.
//!
//! ## Archetypes
//!
//! An archetype is an ordered (upper, lower) pair of the eight trigrams, with
//! `id = (upper - 1) * 8 + lower`. Its dynamics are the ten trigram trait
//! properties blended 0.7 upper / 0.3 lower.
//!
//! ## Pipeline
//!
//! [`ProfileEngine::analyze`] runs vector building, role resolution, three
//! pairwise compatibility evaluations, special-pattern detection and exemplar
//! matching, then composes an immutable [`Profile`]. Values produced by a
//! fallback path carry a [`Provenance`] and a confidence below 1.

pub mod answers;
pub mod canonical;
pub mod compatibility;
pub mod composer;
pub mod config;
pub mod dynamics;
pub mod engine;
pub mod error;
pub mod exemplar;
pub mod matcher;
pub mod patterns;
pub mod resolver;
pub mod source;
pub mod strategy;
pub mod table;
pub mod types;
pub mod vector;

pub use answers::{Answer, AnswerCategory, AnswerSet, ContributionTag, SubjectContext};
pub use canonical::{canonical_archetypes, canonical_exemplars, canonical_trigrams};
pub use compatibility::{
    heuristic_scores, CompatibilityEvaluator, CompatibilityRelation, CompatibilityStrategy,
    DynamicsHeuristicStrategy, PrecomputedTableStrategy, RelationScores, RelationType,
};
pub use composer::{OptimizationHints, Profile, ProfileMetadata, ProfileRelations};
pub use config::{
    EngineConfig, ExemplarConfig, FallbackConfig, HeuristicWeights, PatternThresholds,
    ResolverConfig,
};
pub use dynamics::FallbackContext;
pub use engine::ProfileEngine;
pub use error::{ProfileError, ProfileResult};
pub use exemplar::{Exemplar, ExemplarLibrary, ExemplarMatch, ExemplarRecord, RoleTriple};
pub use matcher::{rank_archetypes, rank_candidates, Candidate};
pub use patterns::{PatternDetector, PatternKind, SpecialPattern};
pub use resolver::{ResolutionState, ResolvedRoles, RoleAssignment, RoleResolver};
pub use source::{
    ArchetypeTableSource, CanonicalExemplarLibrary, CanonicalTableSource, ExemplarLibrarySource,
    JsonExemplarSource, JsonTableSource, TableDocument,
};
pub use strategy::{Provenance, Resolved};
pub use table::{Archetype, ArchetypeTable, CompatibilityMatrix, MatrixEntry, Trigram};
pub use types::{
    ArchetypeId, Dimension, DynamicsScore, Role, TraitProperty, TraitScores, TrigramId,
    ARCHETYPE_COUNT, TRIGRAM_COUNT,
};
pub use vector::{build_vector, UserVector, VectorBuild};
