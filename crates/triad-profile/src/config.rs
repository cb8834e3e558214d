//! Engine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProfileError, ProfileResult};

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Weights of the dynamics-based compatibility heuristic
    pub heuristic: HeuristicWeights,

    /// Pattern detection and profile area thresholds
    pub patterns: PatternThresholds,

    /// Exemplar matching
    pub exemplars: ExemplarConfig,

    /// Role resolution
    pub resolver: ResolverConfig,

    /// Confidence assigned to non-canonical values
    pub fallback: FallbackConfig,
}

/// Weights of the compatibility heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Multiplier applied to the property distance in distance-driven terms
    pub distance_gain: f64,
    pub synergy_similarity: f64,
    pub synergy_cooperation: f64,
    pub synergy_innovation: f64,
    pub harmony_similarity: f64,
    pub harmony_stability: f64,
    pub harmony_cooperation: f64,
    pub tension_distance: f64,
    pub tension_independence: f64,
    pub conflict_distance: f64,
    pub conflict_independence_gap: f64,
    pub conflict_protection: f64,
    pub chaos_stability_gap: f64,
    pub chaos_instability: f64,
    pub chaos_adaptability: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            distance_gain: 2.5,
            synergy_similarity: 0.4,
            synergy_cooperation: 0.3,
            synergy_innovation: 0.3,
            harmony_similarity: 0.5,
            harmony_stability: 0.25,
            harmony_cooperation: 0.25,
            tension_distance: 0.6,
            tension_independence: 0.4,
            conflict_distance: 0.5,
            conflict_independence_gap: 0.3,
            conflict_protection: 0.2,
            chaos_stability_gap: 0.4,
            chaos_instability: 0.3,
            chaos_adaptability: 0.3,
        }
    }
}

impl HeuristicWeights {
    fn entries(&self) -> [(&'static str, f64); 15] {
        [
            ("distance_gain", self.distance_gain),
            ("synergy_similarity", self.synergy_similarity),
            ("synergy_cooperation", self.synergy_cooperation),
            ("synergy_innovation", self.synergy_innovation),
            ("harmony_similarity", self.harmony_similarity),
            ("harmony_stability", self.harmony_stability),
            ("harmony_cooperation", self.harmony_cooperation),
            ("tension_distance", self.tension_distance),
            ("tension_independence", self.tension_independence),
            ("conflict_distance", self.conflict_distance),
            ("conflict_independence_gap", self.conflict_independence_gap),
            ("conflict_protection", self.conflict_protection),
            ("chaos_stability_gap", self.chaos_stability_gap),
            ("chaos_instability", self.chaos_instability),
            ("chaos_adaptability", self.chaos_adaptability),
        ]
    }
}

/// Thresholds for special patterns and for strength/growth areas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternThresholds {
    /// Paradoxical synergy: some relation's conflict must exceed this
    pub paradox_conflict: f64,
    /// Paradoxical synergy: some relation's synergy must exceed this
    pub paradox_synergy: f64,
    /// Context dependent: variance of (synergy - conflict) must exceed this
    pub context_variance: f64,
    /// Context dependent: variance that maps to confidence 1.0
    pub context_variance_scale: f64,
    pub growth_harmony: f64,
    pub growth_tension: f64,
    /// Synergy/harmony above this marks a strength area
    pub strength_area: f64,
    /// Conflict/tension above this marks a growth area
    pub growth_area: f64,
}

impl Default for PatternThresholds {
    fn default() -> Self {
        Self {
            paradox_conflict: 0.6,
            paradox_synergy: 0.7,
            context_variance: 0.4,
            context_variance_scale: 0.8,
            growth_harmony: 0.6,
            growth_tension: 0.3,
            strength_area: 0.7,
            growth_area: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExemplarConfig {
    /// Matches must score strictly above this
    pub min_similarity: f64,
    pub max_results: usize,
}

impl Default for ExemplarConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.6,
            max_results: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Interface and SafeMode candidates scoring below this are dropped
    pub min_candidate_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Allow the dynamics heuristic when no precomputed entry exists
    pub heuristic_enabled: bool,
    pub heuristic_confidence: f64,
    pub user_vector_confidence: f64,
    pub adjustment_confidence: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            heuristic_enabled: true,
            heuristic_confidence: 0.6,
            user_vector_confidence: 0.5,
            adjustment_confidence: 0.3,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    ///
    /// `None` or a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> ProfileResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config = Self::from_toml_str(&contents)?;
            debug!(path = %path.display(), "Loaded engine configuration");
            Ok(config)
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> ProfileResult<Self> {
        let config: EngineConfig =
            toml::from_str(contents).map_err(|e| ProfileError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-finite or negative weights and thresholds outside [0, 1].
    pub fn validate(&self) -> ProfileResult<()> {
        for (name, value) in self.heuristic.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(ProfileError::Config(format!(
                    "heuristic.{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }

        let p = &self.patterns;
        let f = &self.fallback;
        let unit = [
            ("patterns.paradox_conflict", p.paradox_conflict),
            ("patterns.paradox_synergy", p.paradox_synergy),
            ("patterns.context_variance", p.context_variance),
            ("patterns.growth_harmony", p.growth_harmony),
            ("patterns.growth_tension", p.growth_tension),
            ("patterns.strength_area", p.strength_area),
            ("patterns.growth_area", p.growth_area),
            ("exemplars.min_similarity", self.exemplars.min_similarity),
            ("fallback.heuristic_confidence", f.heuristic_confidence),
            ("fallback.user_vector_confidence", f.user_vector_confidence),
            ("fallback.adjustment_confidence", f.adjustment_confidence),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProfileError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if !p.context_variance_scale.is_finite() || p.context_variance_scale <= 0.0 {
            return Err(ProfileError::Config(format!(
                "patterns.context_variance_scale must be positive, got {}",
                p.context_variance_scale
            )));
        }
        if !self.resolver.min_candidate_score.is_finite() {
            return Err(ProfileError::Config(
                "resolver.min_candidate_score must be finite".into(),
            ));
        }
        if self.exemplars.max_results == 0 {
            return Err(ProfileError::Config(
                "exemplars.max_results must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
