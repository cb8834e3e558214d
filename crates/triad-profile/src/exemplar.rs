//! Reference exemplars and nearest-triple matching.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ExemplarConfig;
use crate::error::{ProfileError, ProfileResult};
use crate::source::ExemplarLibrarySource;
use crate::types::{ArchetypeId, ARCHETYPE_COUNT};

/// Serialized exemplar as delivered by an [`ExemplarLibrarySource`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExemplarRecord {
    pub name: String,
    /// Pattern family the exemplar illustrates
    pub family: String,
    pub engine: u8,
    pub interface: u8,
    pub safe_mode: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub traits: Vec<String>,
    /// How the combination shows up in present-day roles
    #[serde(default)]
    pub modern_application: String,
}

/// An (Engine, Interface, SafeMode) archetype triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleTriple {
    pub engine: ArchetypeId,
    pub interface: ArchetypeId,
    pub safe_mode: ArchetypeId,
}

impl RoleTriple {
    pub fn new(engine: ArchetypeId, interface: ArchetypeId, safe_mode: ArchetypeId) -> Self {
        Self {
            engine,
            interface,
            safe_mode,
        }
    }

    /// Mean per-slot ordinal closeness: `1 - |a - b| / 64`, averaged.
    pub fn similarity(&self, other: &RoleTriple) -> f64 {
        let slot = |a: ArchetypeId, b: ArchetypeId| {
            1.0 - (a.get() as f64 - b.get() as f64).abs() / ARCHETYPE_COUNT as f64
        };
        (slot(self.engine, other.engine)
            + slot(self.interface, other.interface)
            + slot(self.safe_mode, other.safe_mode))
            / 3.0
    }
}

/// A validated exemplar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exemplar {
    pub name: String,
    pub family: String,
    pub triple: RoleTriple,
    pub description: String,
    pub traits: Vec<String>,
    pub modern_application: String,
}

impl TryFrom<ExemplarRecord> for Exemplar {
    type Error = ProfileError;

    fn try_from(record: ExemplarRecord) -> Result<Self, Self::Error> {
        if record.name.trim().is_empty() {
            return Err(ProfileError::InvalidExemplar {
                name: record.name,
                reason: "name is empty".into(),
            });
        }
        let id = |raw: u8, slot: &str| {
            ArchetypeId::new(raw).map_err(|_| ProfileError::InvalidExemplar {
                name: record.name.clone(),
                reason: format!("{} archetype {} is outside 1..=64", slot, raw),
            })
        };
        let triple = RoleTriple::new(
            id(record.engine, "engine")?,
            id(record.interface, "interface")?,
            id(record.safe_mode, "safe_mode")?,
        );
        Ok(Self {
            name: record.name,
            family: record.family,
            triple,
            description: record.description,
            traits: record.traits,
            modern_application: record.modern_application,
        })
    }
}

/// A ranked exemplar hit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExemplarMatch {
    pub name: String,
    pub family: String,
    pub triple: RoleTriple,
    pub similarity: f64,
    pub traits: Vec<String>,
    pub modern_application: String,
}

/// The exemplar library, in source order.
#[derive(Clone, Debug)]
pub struct ExemplarLibrary {
    exemplars: Vec<Exemplar>,
}

impl ExemplarLibrary {
    /// Load and validate a library. An empty library is a configuration error.
    pub fn from_source(source: &dyn ExemplarLibrarySource) -> ProfileResult<Self> {
        let records = source.exemplars()?;
        let library = Self::from_records(records)?;
        debug!(
            source = source.name(),
            exemplars = library.len(),
            "Exemplar library loaded"
        );
        Ok(library)
    }

    pub fn from_records(records: Vec<ExemplarRecord>) -> ProfileResult<Self> {
        if records.is_empty() {
            return Err(ProfileError::EmptyExemplarLibrary);
        }
        let exemplars = records
            .into_iter()
            .map(Exemplar::try_from)
            .collect::<ProfileResult<Vec<_>>>()?;
        Ok(Self { exemplars })
    }

    pub fn exemplars(&self) -> &[Exemplar] {
        &self.exemplars
    }

    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exemplars.is_empty()
    }

    /// Rank exemplars by similarity to `triple`.
    ///
    /// Keeps only matches strictly above `config.min_similarity`, ordered by
    /// similarity descending (ties keep library order), truncated to
    /// `config.max_results`. An empty result is a normal outcome.
    pub fn find_matches(&self, triple: &RoleTriple, config: &ExemplarConfig) -> Vec<ExemplarMatch> {
        let mut matches: Vec<ExemplarMatch> = self
            .exemplars
            .iter()
            .filter_map(|e| {
                let similarity = triple.similarity(&e.triple);
                (similarity > config.min_similarity).then(|| ExemplarMatch {
                    name: e.name.clone(),
                    family: e.family.clone(),
                    triple: e.triple,
                    similarity,
                    traits: e.traits.clone(),
                    modern_application: e.modern_application.clone(),
                })
            })
            .collect();
        // stable sort keeps library order for ties
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(config.max_results);
        matches
    }
}
