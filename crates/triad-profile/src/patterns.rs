use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answers::SubjectContext;
use crate::compatibility::CompatibilityRelation;
use crate::config::PatternThresholds;
use crate::types::clamp01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    ParadoxicalSynergy,
    ContextDependent,
    GrowthStage,
}

impl PatternKind {
    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::ParadoxicalSynergy => "Paradoxical synergy",
            PatternKind::ContextDependent => "Context dependent",
            PatternKind::GrowthStage => "Growth stage",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PatternKind::ParadoxicalSynergy => {
                "Elements that seem opposed produce a creative synergy."
            }
            PatternKind::ContextDependent => {
                "The relations between roles shift strongly with environment and situation."
            }
            PatternKind::GrowthStage => {
                "The role configuration keeps changing with the stage of life."
            }
        }
    }

    pub fn characteristics(&self) -> &'static [&'static str] {
        match self {
            PatternKind::ParadoxicalSynergy => &[
                "Carries creative tension inside",
                "Integrates contradictions into new value",
                "Thinks beyond conventional frames",
                "Shows true strength in complex situations",
            ],
            PatternKind::ContextDependent => &[
                "Reacts sensitively to changes in the environment",
                "Shows different sides depending on the situation",
                "Highly adaptable but struggles with consistency",
                "Reads context well",
            ],
            PatternKind::GrowthStage => &[
                "Strong drive for continuous self-transformation",
                "Learns quickly from new experiences",
                "Not bound to a fixed self-image",
                "Values long-term growth",
            ],
        }
    }

    pub fn advice(&self) -> &'static [&'static str] {
        match self {
            PatternKind::ParadoxicalSynergy => &[
                "Use inner tension as creative energy",
                "Actively look for chances to integrate opposing elements",
                "Keep a perspective free of conventional assumptions",
            ],
            PatternKind::ContextDependent => &[
                "Understand and use your sensitivity to context",
                "Adapt self-expression strategically to each environment",
                "Make the values that anchor you explicit",
            ],
            PatternKind::GrowthStage => &[
                "Accept the current stage while looking ahead",
                "Keep learning from experience",
                "Take on new challenges without fearing change",
            ],
        }
    }
}

/// A detected combinatorial pattern. Computed per request, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecialPattern {
    pub kind: PatternKind,
    pub name: String,
    pub confidence: f64,
    pub description: String,
    pub characteristics: Vec<String>,
    pub advice: Vec<String>,
}

impl SpecialPattern {
    fn new(kind: PatternKind, confidence: f64) -> Self {
        Self {
            kind,
            name: kind.name().to_string(),
            confidence: clamp01(confidence),
            description: kind.description().to_string(),
            characteristics: kind.characteristics().iter().map(|s| s.to_string()).collect(),
            advice: kind.advice().iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Detects special patterns across the three role relations.
pub struct PatternDetector {
    thresholds: PatternThresholds,
}

impl PatternDetector {
    pub fn new(thresholds: PatternThresholds) -> Self {
        Self { thresholds }
    }

    pub fn with_default_thresholds() -> Self {
        Self::new(PatternThresholds::default())
    }

    /// Check the patterns in priority order and return the first match.
    pub fn detect(
        &self,
        relations: &[&CompatibilityRelation; 3],
        context: Option<&SubjectContext>,
    ) -> Option<SpecialPattern> {
        let detected = self
            .detect_paradoxical_synergy(relations)
            .or_else(|| self.detect_context_dependent(relations))
            .or_else(|| self.detect_growth_stage(relations, context));
        match &detected {
            Some(pattern) => debug!(
                pattern = pattern.name.as_str(),
                confidence = pattern.confidence,
                "Special pattern detected"
            ),
            None => debug!("No special pattern"),
        }
        detected
    }

    /// Strong conflict somewhere and strong synergy somewhere.
    fn detect_paradoxical_synergy(
        &self,
        relations: &[&CompatibilityRelation; 3],
    ) -> Option<SpecialPattern> {
        let conflicted = relations
            .iter()
            .any(|r| r.scores.conflict > self.thresholds.paradox_conflict);
        let strongest_synergy = relations
            .iter()
            .map(|r| r.scores.synergy)
            .fold(f64::NEG_INFINITY, f64::max);

        (conflicted && strongest_synergy > self.thresholds.paradox_synergy)
            .then(|| SpecialPattern::new(PatternKind::ParadoxicalSynergy, strongest_synergy))
    }

    /// Large spread of (synergy - conflict) across the relations.
    fn detect_context_dependent(
        &self,
        relations: &[&CompatibilityRelation; 3],
    ) -> Option<SpecialPattern> {
        let balances: Vec<f64> = relations
            .iter()
            .map(|r| r.scores.synergy - r.scores.conflict)
            .collect();
        let variance = population_variance(&balances);

        (variance > self.thresholds.context_variance).then(|| {
            SpecialPattern::new(
                PatternKind::ContextDependent,
                variance / self.thresholds.context_variance_scale,
            )
        })
    }

    /// Growth-oriented subject with a harmonious yet tense relation.
    fn detect_growth_stage(
        &self,
        relations: &[&CompatibilityRelation; 3],
        context: Option<&SubjectContext>,
    ) -> Option<SpecialPattern> {
        if !context.is_some_and(SubjectContext::has_growth_mindset) {
            return None;
        }
        relations
            .iter()
            .filter(|r| {
                r.scores.harmony > self.thresholds.growth_harmony
                    && r.scores.tension > self.thresholds.growth_tension
            })
            .map(|r| r.scores.harmony)
            .reduce(f64::max)
            .map(|harmony| SpecialPattern::new(PatternKind::GrowthStage, harmony))
    }
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}
