//! The archetype table: eight trigrams, 64 archetypes and an optional
//! precomputed compatibility matrix.
//!
//! A table is built once from an [`ArchetypeTableSource`] and validated as a
//! whole. It is never mutated afterwards; share it as `Arc<ArchetypeTable>`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::compatibility::RelationScores;
use crate::error::{ProfileError, ProfileResult};
use crate::source::ArchetypeTableSource;
use crate::types::{ArchetypeId, TraitScores, TrigramId, ARCHETYPE_COUNT, TRIGRAM_COUNT};

/// Weight of the upper trigram in every derived quantity.
pub const UPPER_WEIGHT: f64 = 0.7;
/// Weight of the lower trigram in every derived quantity.
pub const LOWER_WEIGHT: f64 = 0.3;

/// A base trigram with its trait properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trigram {
    pub id: TrigramId,
    pub name: String,
    /// Base trait properties (0–10)
    pub properties: TraitScores,
    /// Static keyword tags inherited by every archetype built on this trigram
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// One of the 64 archetypes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub id: ArchetypeId,
    pub upper: TrigramId,
    pub lower: TrigramId,
    pub name: String,
    /// Lower-cased keyword set used for tag-intersection scoring
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    /// Opaque narrative hooks for presentation layers
    #[serde(default)]
    pub hooks: BTreeMap<String, String>,
}

impl Archetype {
    pub fn has_keyword(&self, tag: &str) -> bool {
        self.keywords.contains(tag)
    }
}

/// A single entry of a serialized compatibility matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatrixEntry {
    pub a: ArchetypeId,
    pub b: ArchetypeId,
    #[serde(flatten)]
    pub scores: RelationScores,
}

/// Precomputed pairwise relation scores.
///
/// Entries are keyed by the ascending id pair, so a lookup of `(a, b)` and
/// `(b, a)` always returns the same scores.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompatibilityMatrix {
    entries: HashMap<(ArchetypeId, ArchetypeId), RelationScores>,
}

fn pair_key(a: ArchetypeId, b: ArchetypeId) -> (ArchetypeId, ArchetypeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl CompatibilityMatrix {
    /// Build from serialized entries.
    ///
    /// Rejects out-of-range scores and a pair listed twice with different
    /// scores (in either order).
    pub fn from_entries(entries: impl IntoIterator<Item = MatrixEntry>) -> ProfileResult<Self> {
        let mut map = HashMap::new();
        for entry in entries {
            if !entry.scores.is_in_range() {
                return Err(ProfileError::InconsistentTable(format!(
                    "matrix entry ({}, {}) has scores outside [0, 1]",
                    entry.a, entry.b
                )));
            }
            let key = pair_key(entry.a, entry.b);
            if let Some(existing) = map.insert(key, entry.scores) {
                if existing != entry.scores {
                    return Err(ProfileError::InconsistentTable(format!(
                        "matrix entries for ({}, {}) are not symmetric",
                        key.0, key.1
                    )));
                }
            }
        }
        Ok(Self { entries: map })
    }

    pub fn insert(&mut self, a: ArchetypeId, b: ArchetypeId, scores: RelationScores) {
        self.entries.insert(pair_key(a, b), scores);
    }

    pub fn get(&self, a: ArchetypeId, b: ArchetypeId) -> Option<&RelationScores> {
        self.entries.get(&pair_key(a, b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending pair order, one per unordered pair.
    pub fn to_entries(&self) -> Vec<MatrixEntry> {
        let mut entries: Vec<MatrixEntry> = self
            .entries
            .iter()
            .map(|(&(a, b), scores)| MatrixEntry {
                a,
                b,
                scores: *scores,
            })
            .collect();
        entries.sort_by_key(|e| (e.a, e.b));
        entries
    }
}

/// Immutable reference data shared by every analysis.
#[derive(Debug)]
pub struct ArchetypeTable {
    trigrams: Vec<Trigram>,
    archetypes: Vec<Archetype>,
    matrix: Option<CompatibilityMatrix>,
    reference_vectors: OnceLock<Vec<[f64; TRIGRAM_COUNT]>>,
}

impl ArchetypeTable {
    /// Load and validate a table from a source.
    pub fn from_source(source: &dyn ArchetypeTableSource) -> ProfileResult<Self> {
        let trigrams = source.trigrams()?;
        let archetypes = source.archetypes()?;
        let matrix = source.compatibility_matrix()?;
        let table = Self::new(trigrams, archetypes, matrix)?;
        info!(
            source = source.name(),
            archetypes = table.archetypes.len(),
            matrix_entries = table.matrix.as_ref().map(|m| m.len()).unwrap_or(0),
            "Archetype table loaded"
        );
        Ok(table)
    }

    /// Validate and assemble a table.
    ///
    /// Requires exactly 8 trigrams and 64 archetypes, each id present once and
    /// every archetype id equal to `(upper - 1) * 8 + lower`.
    pub fn new(
        mut trigrams: Vec<Trigram>,
        mut archetypes: Vec<Archetype>,
        matrix: Option<CompatibilityMatrix>,
    ) -> ProfileResult<Self> {
        if trigrams.len() != TRIGRAM_COUNT {
            return Err(ProfileError::IncompleteTable {
                what: "trigrams",
                expected: TRIGRAM_COUNT,
                found: trigrams.len(),
            });
        }
        if archetypes.len() != ARCHETYPE_COUNT {
            return Err(ProfileError::IncompleteTable {
                what: "archetypes",
                expected: ARCHETYPE_COUNT,
                found: archetypes.len(),
            });
        }

        trigrams.sort_by_key(|t| t.id);
        for (expected, trigram) in TrigramId::all().zip(&trigrams) {
            if trigram.id != expected {
                return Err(ProfileError::InconsistentTable(format!(
                    "trigram {} is missing or duplicated",
                    expected
                )));
            }
            if !trigram.properties.is_in_range() {
                return Err(ProfileError::InconsistentTable(format!(
                    "trigram {} ({}) has properties outside [0, 10]",
                    trigram.id, trigram.name
                )));
            }
        }

        archetypes.sort_by_key(|a| a.id);
        for (expected, archetype) in ArchetypeId::all().zip(archetypes.iter_mut()) {
            if archetype.id != expected {
                return Err(ProfileError::InconsistentTable(format!(
                    "archetype {} is missing or duplicated",
                    expected
                )));
            }
            if ArchetypeId::from_trigrams(archetype.upper, archetype.lower) != archetype.id {
                return Err(ProfileError::InconsistentTable(format!(
                    "archetype {} does not match its trigram pair ({}, {})",
                    archetype.id, archetype.upper, archetype.lower
                )));
            }
            archetype.keywords = archetype
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
        }

        debug!(has_matrix = matrix.is_some(), "Archetype table validated");

        Ok(Self {
            trigrams,
            archetypes,
            matrix,
            reference_vectors: OnceLock::new(),
        })
    }

    pub fn trigrams(&self) -> &[Trigram] {
        &self.trigrams
    }

    pub fn trigram(&self, id: TrigramId) -> &Trigram {
        &self.trigrams[id.index()]
    }

    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    pub fn archetype(&self, id: ArchetypeId) -> &Archetype {
        &self.archetypes[id.index()]
    }

    pub fn archetype_for(&self, upper: TrigramId, lower: TrigramId) -> &Archetype {
        self.archetype(ArchetypeId::from_trigrams(upper, lower))
    }

    pub fn matrix(&self) -> Option<&CompatibilityMatrix> {
        self.matrix.as_ref()
    }

    /// Reference vector of an archetype in the 8-d trigram basis.
    ///
    /// Derived once per table on first use: `0.7 * e(upper) + 0.3 * e(lower)`.
    pub fn reference_vector(&self, id: ArchetypeId) -> &[f64; TRIGRAM_COUNT] {
        &self.reference_vectors()[id.index()]
    }

    fn reference_vectors(&self) -> &[[f64; TRIGRAM_COUNT]] {
        self.reference_vectors.get_or_init(|| {
            debug!("Deriving archetype reference vectors");
            self.archetypes
                .iter()
                .map(|a| {
                    let mut v = [0.0; TRIGRAM_COUNT];
                    v[a.upper.index()] += UPPER_WEIGHT;
                    v[a.lower.index()] += LOWER_WEIGHT;
                    v
                })
                .collect()
        })
    }
}
