//! Sources for reference data: archetype tables and exemplar libraries.
//!
//! The built-in sources serve the canonical data set; the JSON sources read
//! the same records from a file or string.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canonical::{
    canonical_archetypes, canonical_exemplars, canonical_trigrams, derive_archetypes,
};
use crate::error::{ProfileError, ProfileResult};
use crate::exemplar::ExemplarRecord;
use crate::table::{Archetype, CompatibilityMatrix, MatrixEntry, Trigram};

/// Supplies the records an [`ArchetypeTable`](crate::table::ArchetypeTable)
/// is built from.
pub trait ArchetypeTableSource {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    fn trigrams(&self) -> ProfileResult<Vec<Trigram>>;

    fn archetypes(&self) -> ProfileResult<Vec<Archetype>>;

    /// Optional precomputed pairwise matrix.
    fn compatibility_matrix(&self) -> ProfileResult<Option<CompatibilityMatrix>>;
}

/// Supplies exemplar records.
pub trait ExemplarLibrarySource {
    fn name(&self) -> &str;

    fn exemplars(&self) -> ProfileResult<Vec<ExemplarRecord>>;
}

/// The built-in trigram and archetype data.
#[derive(Clone, Debug, Default)]
pub struct CanonicalTableSource {
    matrix: Option<CompatibilityMatrix>,
}

impl CanonicalTableSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the canonical data together with a precomputed matrix.
    pub fn with_matrix(matrix: CompatibilityMatrix) -> Self {
        Self {
            matrix: Some(matrix),
        }
    }
}

impl ArchetypeTableSource for CanonicalTableSource {
    fn name(&self) -> &str {
        "canonical"
    }

    fn trigrams(&self) -> ProfileResult<Vec<Trigram>> {
        Ok(canonical_trigrams())
    }

    fn archetypes(&self) -> ProfileResult<Vec<Archetype>> {
        Ok(canonical_archetypes())
    }

    fn compatibility_matrix(&self) -> ProfileResult<Option<CompatibilityMatrix>> {
        Ok(self.matrix.clone())
    }
}

/// JSON document layout for [`JsonTableSource`].
///
/// When `archetypes` is omitted the 64 archetypes are derived from the
/// trigrams.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TableDocument {
    pub trigrams: Vec<Trigram>,
    #[serde(default)]
    pub archetypes: Option<Vec<Archetype>>,
    #[serde(default)]
    pub matrix: Option<Vec<MatrixEntry>>,
}

/// An archetype table read from JSON.
#[derive(Clone, Debug)]
pub struct JsonTableSource {
    origin: String,
    document: TableDocument,
}

impl JsonTableSource {
    pub fn from_json_str(json: &str) -> ProfileResult<Self> {
        Self::parse("<inline>".to_string(), json)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ProfileResult<Self> {
        let path = path.as_ref();
        let contents = read_source(path)?;
        Self::parse(path.display().to_string(), &contents)
    }

    fn parse(origin: String, json: &str) -> ProfileResult<Self> {
        let document: TableDocument = serde_json::from_str(json)
            .map_err(|e| ProfileError::Source(format!("{}: {}", origin, e)))?;
        debug!(
            origin = %origin,
            trigrams = document.trigrams.len(),
            "Parsed archetype table document"
        );
        Ok(Self { origin, document })
    }
}

impl ArchetypeTableSource for JsonTableSource {
    fn name(&self) -> &str {
        &self.origin
    }

    fn trigrams(&self) -> ProfileResult<Vec<Trigram>> {
        Ok(self.document.trigrams.clone())
    }

    fn archetypes(&self) -> ProfileResult<Vec<Archetype>> {
        Ok(match &self.document.archetypes {
            Some(archetypes) => archetypes.clone(),
            None => derive_archetypes(&self.document.trigrams),
        })
    }

    fn compatibility_matrix(&self) -> ProfileResult<Option<CompatibilityMatrix>> {
        self.document
            .matrix
            .clone()
            .map(CompatibilityMatrix::from_entries)
            .transpose()
    }
}

/// The built-in exemplar library.
#[derive(Clone, Copy, Debug, Default)]
pub struct CanonicalExemplarLibrary;

impl ExemplarLibrarySource for CanonicalExemplarLibrary {
    fn name(&self) -> &str {
        "canonical"
    }

    fn exemplars(&self) -> ProfileResult<Vec<ExemplarRecord>> {
        Ok(canonical_exemplars())
    }
}

/// Exemplar records read from a JSON array.
#[derive(Clone, Debug)]
pub struct JsonExemplarSource {
    origin: String,
    records: Vec<ExemplarRecord>,
}

impl JsonExemplarSource {
    pub fn from_json_str(json: &str) -> ProfileResult<Self> {
        Self::parse("<inline>".to_string(), json)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ProfileResult<Self> {
        let path = path.as_ref();
        let contents = read_source(path)?;
        Self::parse(path.display().to_string(), &contents)
    }

    fn parse(origin: String, json: &str) -> ProfileResult<Self> {
        let records = serde_json::from_str(json)
            .map_err(|e| ProfileError::Source(format!("{}: {}", origin, e)))?;
        Ok(Self { origin, records })
    }
}

impl ExemplarLibrarySource for JsonExemplarSource {
    fn name(&self) -> &str {
        &self.origin
    }

    fn exemplars(&self) -> ProfileResult<Vec<ExemplarRecord>> {
        Ok(self.records.clone())
    }
}

fn read_source(path: &Path) -> ProfileResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ProfileError::Source(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ArchetypeTable;
    use std::io::Write;

    fn trigrams_json() -> String {
        serde_json::to_string(&canonical_trigrams()).unwrap()
    }

    #[test]
    fn canonical_source_builds_a_table() {
        let table = ArchetypeTable::from_source(&CanonicalTableSource::new()).unwrap();
        assert_eq!(table.archetypes().len(), 64);
        assert!(table.matrix().is_none());
    }

    #[test]
    fn json_source_derives_archetypes() {
        let json = format!(r#"{{ "trigrams": {} }}"#, trigrams_json());
        let source = JsonTableSource::from_json_str(&json).unwrap();
        let table = ArchetypeTable::from_source(&source).unwrap();
        assert_eq!(table.archetypes(), canonical_archetypes().as_slice());
    }

    #[test]
    fn json_source_keeps_hooks() {
        let mut archetypes = canonical_archetypes();
        archetypes[0]
            .hooks
            .insert("summary".into(), "pure creative force".into());
        let doc = TableDocument {
            trigrams: canonical_trigrams(),
            archetypes: Some(archetypes),
            matrix: None,
        };
        let source = JsonTableSource::from_json_str(&serde_json::to_string(&doc).unwrap()).unwrap();
        let table = ArchetypeTable::from_source(&source).unwrap();
        let first = &table.archetypes()[0];
        assert_eq!(first.hooks.get("summary").map(String::as_str), Some("pure creative force"));
    }

    #[test]
    fn json_source_rejects_out_of_range_trigram_id() {
        let json = trigrams_json().replacen(r#""id":1"#, r#""id":9"#, 1);
        let err = JsonTableSource::from_json_str(&format!(r#"{{ "trigrams": {} }}"#, json))
            .unwrap_err();
        assert!(matches!(err, ProfileError::Source(_)));
    }

    #[test]
    fn json_source_rejects_asymmetric_matrix() {
        let json = format!(
            r#"{{
                "trigrams": {},
                "matrix": [
                    {{ "a": 1, "b": 2, "synergy": 0.5, "harmony": 0.5, "tension": 0.1, "conflict": 0.1, "chaos": 0.1 }},
                    {{ "a": 2, "b": 1, "synergy": 0.9, "harmony": 0.5, "tension": 0.1, "conflict": 0.1, "chaos": 0.1 }}
                ]
            }}"#,
            trigrams_json()
        );
        let source = JsonTableSource::from_json_str(&json).unwrap();
        let err = ArchetypeTable::from_source(&source).unwrap_err();
        assert!(matches!(err, ProfileError::InconsistentTable(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn json_source_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "trigrams": {} }}"#, trigrams_json()).unwrap();
        let source = JsonTableSource::from_path(file.path()).unwrap();
        assert!(source.name().ends_with(&*file.path().file_name().unwrap().to_string_lossy()));
        assert_eq!(source.trigrams().unwrap().len(), 8);
    }

    #[test]
    fn missing_file_is_a_source_error() {
        let err = JsonTableSource::from_path("/nonexistent/table.json").unwrap_err();
        assert!(matches!(err, ProfileError::Source(_)));
    }

    #[test]
    fn exemplar_sources() {
        assert_eq!(CanonicalExemplarLibrary.exemplars().unwrap().len(), 6);

        let json = r#"[{ "name": "Test", "family": "Demo", "engine": 2, "interface": 3, "safe_mode": 4 }]"#;
        let source = JsonExemplarSource::from_json_str(json).unwrap();
        let records = source.exemplars().unwrap();
        assert_eq!(records[0].safe_mode, 4);
        assert!(records[0].description.is_empty());

        assert!(JsonExemplarSource::from_json_str("{").is_err());
    }
}
