//! Role resolution: Engine, then Interface, then SafeMode.
//!
//! The resolver is a strict state machine. Each step may only run from the
//! state the previous step left behind; anything else is a caller bug and is
//! reported as [`ProfileError::ResolutionOutOfOrder`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answers::{AnswerCategory, AnswerSet, ContributionTag};
use crate::config::ResolverConfig;
use crate::error::{ProfileError, ProfileResult};
use crate::matcher::rank_archetypes;
use crate::table::ArchetypeTable;
use crate::types::{clamp01, ArchetypeId, Role};
use crate::vector::{build_vector, VectorBuild};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionState {
    CollectingAnswers,
    EngineResolved,
    InterfaceResolved,
    SafeModeResolved,
    Complete,
}

/// A role bound to an archetype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role: Role,
    pub archetype: ArchetypeId,
    pub name: String,
    /// Similarity for the Engine, summed tag weight for Interface/SafeMode
    pub score: f64,
    pub confidence: f64,
}

/// Output of a completed resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRoles {
    pub engine: RoleAssignment,
    pub interface: RoleAssignment,
    pub safe_mode: RoleAssignment,
    /// Vector built from worldview answers
    pub worldview: VectorBuild,
    pub outer_weight: f64,
    pub inner_weight: f64,
}

pub struct RoleResolver<'a> {
    table: &'a ArchetypeTable,
    config: &'a ResolverConfig,
    answers: &'a AnswerSet,
    state: ResolutionState,
    worldview: Option<VectorBuild>,
    engine: Option<RoleAssignment>,
    interface: Option<(RoleAssignment, f64)>,
    safe_mode: Option<(RoleAssignment, f64)>,
}

impl<'a> RoleResolver<'a> {
    pub fn new(
        table: &'a ArchetypeTable,
        config: &'a ResolverConfig,
        answers: &'a AnswerSet,
    ) -> Self {
        Self {
            table,
            config,
            answers,
            state: ResolutionState::CollectingAnswers,
            worldview: None,
            engine: None,
            interface: None,
            safe_mode: None,
        }
    }

    pub fn state(&self) -> ResolutionState {
        self.state
    }

    /// Run all steps in order.
    pub fn resolve(mut self) -> ProfileResult<ResolvedRoles> {
        self.resolve_engine()?;
        self.resolve_interface()?;
        self.resolve_safe_mode()?;
        self.complete()
    }

    /// Engine: best cosine match of the worldview vector.
    pub fn resolve_engine(&mut self) -> ProfileResult<&RoleAssignment> {
        self.expect_state(ResolutionState::CollectingAnswers)?;

        let build = build_vector(self.answers.by_category(AnswerCategory::Worldview));
        let ranked = rank_archetypes(&build.vector, self.table)?;
        let top = ranked.first().ok_or(ProfileError::EmptyCandidateSet)?;

        let assignment = RoleAssignment {
            role: Role::Engine,
            archetype: top.id,
            name: self.table.archetype(top.id).name.clone(),
            score: top.similarity,
            confidence: clamp01(top.similarity),
        };
        debug!(
            archetype = %assignment.archetype,
            similarity = assignment.score,
            "Engine resolved"
        );

        self.worldview = Some(build);
        self.state = ResolutionState::EngineResolved;
        Ok(self.engine.insert(assignment))
    }

    /// Interface: keyword match of outer-choice tags, excluding the Engine.
    pub fn resolve_interface(&mut self) -> ProfileResult<&RoleAssignment> {
        self.expect_state(ResolutionState::EngineResolved)?;
        let resolved = self.resolve_by_tags(Role::Interface, self.answers.outer_tags())?;
        self.state = ResolutionState::InterfaceResolved;
        Ok(&self.interface.insert(resolved).0)
    }

    /// SafeMode: keyword match of inner-choice tags, excluding the Engine.
    pub fn resolve_safe_mode(&mut self) -> ProfileResult<&RoleAssignment> {
        self.expect_state(ResolutionState::InterfaceResolved)?;
        let resolved = self.resolve_by_tags(Role::SafeMode, self.answers.inner_tags())?;
        self.state = ResolutionState::SafeModeResolved;
        Ok(&self.safe_mode.insert(resolved).0)
    }

    pub fn complete(mut self) -> ProfileResult<ResolvedRoles> {
        self.expect_state(ResolutionState::SafeModeResolved)?;
        self.state = ResolutionState::Complete;

        match (self.engine, self.interface, self.safe_mode, self.worldview) {
            (
                Some(engine),
                Some((interface, outer_weight)),
                Some((safe_mode, inner_weight)),
                Some(worldview),
            ) => Ok(ResolvedRoles {
                engine,
                interface,
                safe_mode,
                worldview,
                outer_weight,
                inner_weight,
            }),
            _ => Err(ProfileError::ResolutionOutOfOrder {
                expected: ResolutionState::SafeModeResolved,
                found: ResolutionState::Complete,
            }),
        }
    }

    fn expect_state(&self, expected: ResolutionState) -> ProfileResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ProfileError::ResolutionOutOfOrder {
                expected,
                found: self.state,
            })
        }
    }

    /// Score every non-Engine archetype by the summed weight of matching
    /// tags; ties go to the lower id. Returns the assignment and the total
    /// tag weight seen.
    fn resolve_by_tags<'t>(
        &self,
        role: Role,
        tags: impl Iterator<Item = &'t ContributionTag>,
    ) -> ProfileResult<(RoleAssignment, f64)> {
        let engine = self
            .engine
            .as_ref()
            .map(|e| e.archetype)
            .ok_or(ProfileError::ResolutionOutOfOrder {
                expected: ResolutionState::EngineResolved,
                found: self.state,
            })?;

        let tags: Vec<(String, f64)> = tags
            .filter(|t| t.weight.is_finite())
            .map(|t| (t.tag.trim().to_lowercase(), t.weight))
            .collect();
        // fold from +0.0: an empty f64 sum is -0.0
        let total_weight = tags.iter().fold(0.0, |acc, (_, w)| acc + w);

        let mut best: Option<(ArchetypeId, f64)> = None;
        for archetype in self.table.archetypes() {
            if archetype.id == engine {
                continue;
            }
            let score = tags
                .iter()
                .filter(|(tag, _)| archetype.has_keyword(tag))
                .fold(0.0, |acc, (_, w)| acc + w);
            if score < self.config.min_candidate_score {
                continue;
            }
            // archetypes iterate in ascending id order, so strict > keeps the lower id on ties
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((archetype.id, score));
            }
        }

        let (id, score) = best.ok_or(ProfileError::InsufficientDiscrimination {
            role,
            excluded: engine.get(),
        })?;
        if score <= 0.0 {
            debug!(role = %role, archetype = %id, "No tag matched; picked by id order");
        }
        let confidence = if total_weight > 0.0 {
            clamp01(score / total_weight)
        } else {
            0.0
        };
        debug!(
            role = %role,
            archetype = %id,
            score,
            total_weight,
            "Role resolved from tags"
        );

        Ok((
            RoleAssignment {
                role,
                archetype: id,
                name: self.table.archetype(id).name.clone(),
                score,
                confidence,
            },
            total_weight,
        ))
    }
}
