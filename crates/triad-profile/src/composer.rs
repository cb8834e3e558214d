//! Profile aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compatibility::CompatibilityRelation;
use crate::config::PatternThresholds;
use crate::exemplar::ExemplarMatch;
use crate::patterns::SpecialPattern;
use crate::resolver::{ResolvedRoles, RoleAssignment};
use crate::types::clamp01;
use crate::vector::UserVector;

const DEFAULT_STRENGTH: &str = "Balanced configuration with no single dominant strength";
const DEFAULT_GROWTH: &str = "No pronounced friction between roles; keep developing all three evenly";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub profile_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub engine_version: String,
}

impl ProfileMetadata {
    pub fn generate() -> Self {
        Self {
            profile_id: Uuid::new_v4(),
            created_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// The three role-pair relations of a profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileRelations {
    pub engine_interface: CompatibilityRelation,
    pub engine_safe_mode: CompatibilityRelation,
    pub interface_safe_mode: CompatibilityRelation,
}

impl ProfileRelations {
    pub fn as_array(&self) -> [&CompatibilityRelation; 3] {
        [
            &self.engine_interface,
            &self.engine_safe_mode,
            &self.interface_safe_mode,
        ]
    }
}

/// Balancing hints grouped by horizon.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationHints {
    /// Things to do right away
    pub immediate: Vec<String>,
    /// One to three months
    pub short_term: Vec<String>,
    /// Six months to a year
    pub long_term: Vec<String>,
    pub lifestyle: Vec<String>,
}

impl OptimizationHints {
    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty()
            && self.short_term.is_empty()
            && self.long_term.is_empty()
            && self.lifestyle.is_empty()
    }
}

/// A complete three-role profile. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub metadata: ProfileMetadata,
    pub engine: RoleAssignment,
    pub interface: RoleAssignment,
    pub safe_mode: RoleAssignment,
    /// Worldview vector the Engine was matched from
    pub user_vector: UserVector,
    pub relations: ProfileRelations,
    pub special_pattern: Option<SpecialPattern>,
    pub exemplars: Vec<ExemplarMatch>,
    /// Overall effectiveness in [0, 1]
    pub effectiveness: f64,
    /// Mean of the three role confidences
    pub confidence: f64,
    pub low_confidence: bool,
    pub strength_areas: Vec<String>,
    pub growth_areas: Vec<String>,
    /// What sets this configuration apart: the pattern and the nearest exemplar
    pub unique_characteristics: Vec<String>,
    pub recommendations: Vec<String>,
    pub optimization_hints: OptimizationHints,
}

/// `clamp01(mean((synergy + harmony - conflict) / 3))` over the relations.
pub fn effectiveness(relations: &ProfileRelations) -> f64 {
    let all = relations.as_array();
    let total: f64 = all
        .iter()
        .map(|r| (r.scores.synergy + r.scores.harmony - r.scores.conflict) / 3.0)
        .sum();
    clamp01(total / all.len() as f64)
}

pub fn strength_areas(relations: &ProfileRelations, thresholds: &PatternThresholds) -> Vec<String> {
    let limit = thresholds.strength_area;
    let mut areas = Vec::new();
    if relations.engine_interface.scores.synergy > limit {
        areas.push("Inner drive translates directly into outward action".to_string());
    }
    if relations.engine_safe_mode.scores.harmony > limit {
        areas.push("Stays steady under pressure; core values hold when stressed".to_string());
    }
    if relations.interface_safe_mode.scores.synergy > limit {
        areas.push("Social presence and self-protection reinforce each other".to_string());
    }
    if areas.is_empty() {
        areas.push(DEFAULT_STRENGTH.to_string());
    }
    areas
}

pub fn growth_areas(relations: &ProfileRelations, thresholds: &PatternThresholds) -> Vec<String> {
    let limit = thresholds.growth_area;
    let mut areas = Vec::new();
    if relations.engine_interface.scores.conflict > limit {
        areas.push("Align what you value inside with how you act outside".to_string());
    }
    if relations.engine_safe_mode.scores.tension > limit {
        areas.push("Ease the strain between core drive and stress reactions".to_string());
    }
    if relations.interface_safe_mode.scores.conflict > limit {
        areas.push("Reconcile your public face with your defensive habits".to_string());
    }
    if areas.is_empty() {
        areas.push(DEFAULT_GROWTH.to_string());
    }
    areas
}

/// Hints from the role relations, then the pattern's advice spread across
/// the immediate, short and long term horizons in turn.
pub fn optimization_hints(
    relations: &ProfileRelations,
    pattern: Option<&SpecialPattern>,
    thresholds: &PatternThresholds,
) -> OptimizationHints {
    let mut hints = OptimizationHints::default();
    let push = |list: &mut Vec<String>, text: &str| list.push(text.to_string());

    let ei = &relations.engine_interface.scores;
    if ei.conflict > thresholds.growth_area {
        push(
            &mut hints.immediate,
            "When values and actions feel at odds, pause and check what you actually want",
        );
        push(
            &mut hints.short_term,
            "Deliberately add actions that follow your values and drop the merely habitual ones",
        );
    }
    if ei.synergy > thresholds.strength_area {
        push(
            &mut hints.immediate,
            "Notice how aligned inner drive and outward action feel now and remember it",
        );
        push(
            &mut hints.long_term,
            "Pass this alignment on and help your team pull in one direction",
        );
    }
    if relations.engine_safe_mode.scores.tension > thresholds.growth_area {
        push(
            &mut hints.short_term,
            "Accept the gap between ideal and reality and start with small steps",
        );
        push(&mut hints.lifestyle, "Make a habit of preparing well before taking risks");
    }
    if relations.interface_safe_mode.scores.harmony > thresholds.strength_area {
        push(
            &mut hints.immediate,
            "Your public face and inner sense of safety agree; express yourself with confidence",
        );
        push(&mut hints.long_term, "Use that stability as the base for bigger challenges");
    }

    if let Some(pattern) = pattern {
        for (i, advice) in pattern.advice.iter().enumerate() {
            let list = match i % 3 {
                0 => &mut hints.immediate,
                1 => &mut hints.short_term,
                _ => &mut hints.long_term,
            };
            list.push(format!("[{}] {}", pattern.name, advice));
        }
    }
    hints
}

/// Unique characteristics and recommendations drawn from the detected
/// pattern and the closest exemplar.
pub fn assessment(
    pattern: Option<&SpecialPattern>,
    exemplars: &[ExemplarMatch],
) -> (Vec<String>, Vec<String>) {
    let mut unique = Vec::new();
    let mut recommendations = Vec::new();

    if let Some(pattern) = pattern {
        unique.push(format!("{}: {}", pattern.name, pattern.description));
        recommendations.push(format!(
            "Adopt a growth strategy that builds on the {} pattern",
            pattern.name.to_lowercase()
        ));
    }
    if let Some(top) = exemplars.first() {
        unique.push(format!(
            "Resembles {} ({}%)",
            top.name,
            (top.similarity * 100.0).round()
        ));
        if !top.modern_application.is_empty() {
            recommendations.push(top.modern_application.clone());
        }
    }
    (unique, recommendations)
}

/// Whether the roles rest on too little evidence to be trusted.
///
/// An Interface or SafeMode role without a single matched tag was picked by
/// id order alone, so it counts as missing evidence.
fn lacks_evidence(roles: &ResolvedRoles) -> bool {
    roles.worldview.applied == 0
        || roles.outer_weight <= 0.0
        || roles.inner_weight <= 0.0
        || roles.interface.score <= 0.0
        || roles.safe_mode.score <= 0.0
}

/// Assemble a profile from already computed parts.
pub fn compose(
    roles: ResolvedRoles,
    relations: ProfileRelations,
    special_pattern: Option<SpecialPattern>,
    exemplars: Vec<ExemplarMatch>,
    thresholds: &PatternThresholds,
) -> Profile {
    let confidence =
        (roles.engine.confidence + roles.interface.confidence + roles.safe_mode.confidence) / 3.0;
    let low_confidence = lacks_evidence(&roles);
    let optimization_hints = optimization_hints(&relations, special_pattern.as_ref(), thresholds);
    let (unique_characteristics, recommendations) =
        assessment(special_pattern.as_ref(), &exemplars);

    Profile {
        metadata: ProfileMetadata::generate(),
        effectiveness: effectiveness(&relations),
        strength_areas: strength_areas(&relations, thresholds),
        growth_areas: growth_areas(&relations, thresholds),
        engine: roles.engine,
        interface: roles.interface,
        safe_mode: roles.safe_mode,
        user_vector: roles.worldview.vector,
        relations,
        special_pattern,
        exemplars,
        confidence,
        low_confidence,
        unique_characteristics,
        recommendations,
        optimization_hints,
    }
}
