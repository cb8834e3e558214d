//! Cosine-similarity ranking of archetypes against a user vector.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProfileError, ProfileResult};
use crate::table::ArchetypeTable;
use crate::types::ArchetypeId;
use crate::vector::UserVector;

/// One ranked archetype.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: ArchetypeId,
    pub similarity: f64,
}

/// Cosine similarity of two equal-length vectors; 0 when either is zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 || !dot.is_finite() {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Rank the given candidates by similarity to `vector`.
///
/// Sorted by similarity descending, ties by ascending id. A zero vector
/// scores 0 against every archetype.
pub fn rank_candidates(
    vector: &UserVector,
    table: &ArchetypeTable,
    candidates: &[ArchetypeId],
) -> ProfileResult<Vec<Candidate>> {
    if candidates.is_empty() {
        return Err(ProfileError::EmptyCandidateSet);
    }

    let user = vector.as_array();
    let mut ranked: Vec<Candidate> = candidates
        .iter()
        .map(|&id| Candidate {
            id,
            similarity: cosine_similarity(user, table.reference_vector(id)),
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.id.cmp(&b.id))
    });

    if let Some(top) = ranked.first() {
        debug!(
            top = %top.id,
            similarity = top.similarity,
            candidates = ranked.len(),
            "Archetypes ranked"
        );
    }
    Ok(ranked)
}

/// Rank every archetype in the table.
pub fn rank_archetypes(
    vector: &UserVector,
    table: &ArchetypeTable,
) -> ProfileResult<Vec<Candidate>> {
    let ids: Vec<ArchetypeId> = table.archetypes().iter().map(|a| a.id).collect();
    rank_candidates(vector, table, &ids)
}
