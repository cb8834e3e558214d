//! User vector construction from tagged answers.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answers::{Answer, ContributionTag};
use crate::types::{Dimension, TRIGRAM_COUNT};

/// Per-dimension sums of tagged answer weights, in trigram order.
///
/// No normalization is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserVector([f64; TRIGRAM_COUNT]);

impl UserVector {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_array(values: [f64; TRIGRAM_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; TRIGRAM_COUNT] {
        &self.0
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        self.0[dimension.index()]
    }

    pub fn add(&mut self, dimension: Dimension, weight: f64) {
        self.0[dimension.index()] += weight;
    }

    pub fn magnitude(&self) -> f64 {
        self.0.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude() == 0.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.iter().map(move |d| (*d, self.get(*d)))
    }
}

/// Result of a vector build.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorBuild {
    pub vector: UserVector,
    /// Contributions that landed on a dimension
    pub applied: usize,
    /// Contribution tags dropped as malformed
    pub skipped: usize,
}

/// Sum the dimension contributions of `answers`.
///
/// Contribution tags must name a dimension and carry a finite weight;
/// anything else is skipped and counted. Inner and outer tag sets add to the
/// vector only where they name a dimension, other entries are keywords and
/// are left to role resolution.
pub fn build_vector<'a>(answers: impl IntoIterator<Item = &'a Answer>) -> VectorBuild {
    let mut build = VectorBuild::default();

    for answer in answers {
        for tag in &answer.contribution_tags {
            match parse_contribution(tag) {
                Some((dimension, weight)) => {
                    build.vector.add(dimension, weight);
                    build.applied += 1;
                }
                None => {
                    debug!(
                        question_id = %answer.question_id,
                        tag = %tag.tag,
                        weight = tag.weight,
                        "Skipping malformed contribution"
                    );
                    build.skipped += 1;
                }
            }
        }
        for tag in answer.inner_tags.iter().chain(&answer.outer_tags) {
            if let Some((dimension, weight)) = parse_contribution(tag) {
                build.vector.add(dimension, weight);
                build.applied += 1;
            }
        }
    }

    debug!(
        applied = build.applied,
        skipped = build.skipped,
        magnitude = build.vector.magnitude(),
        "User vector built"
    );
    build
}

fn parse_contribution(tag: &ContributionTag) -> Option<(Dimension, f64)> {
    if !tag.weight.is_finite() {
        return None;
    }
    Dimension::parse(&tag.tag).map(|d| (d, tag.weight))
}
