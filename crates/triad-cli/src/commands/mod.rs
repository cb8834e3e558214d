//! Command implementations

pub mod analyze;
pub mod reference;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::debug;
use triad_profile::{
    ArchetypeTable, CanonicalExemplarLibrary, CanonicalTableSource, EngineConfig,
    ExemplarLibrary, JsonExemplarSource, JsonTableSource, ProfileEngine,
};

use crate::error::CliResult;

/// Where the engine's configuration and reference data come from.
#[derive(Args, Debug, Default)]
pub struct EngineOptions {
    /// Engine configuration file (TOML)
    #[arg(short, long, global = true, env = "TRIAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Archetype table file (JSON); the built-in table when omitted
    #[arg(long, global = true)]
    pub table: Option<PathBuf>,

    /// Exemplar library file (JSON); the built-in library when omitted
    #[arg(long, global = true)]
    pub exemplars: Option<PathBuf>,
}

impl EngineOptions {
    pub fn build(&self) -> CliResult<ProfileEngine> {
        let config = EngineConfig::load(self.config.as_deref())?;

        let table = match &self.table {
            Some(path) => {
                debug!(path = %path.display(), "Loading archetype table");
                ArchetypeTable::from_source(&JsonTableSource::from_path(path)?)?
            }
            None => ArchetypeTable::from_source(&CanonicalTableSource::new())?,
        };

        let exemplars = match &self.exemplars {
            Some(path) => {
                debug!(path = %path.display(), "Loading exemplar library");
                ExemplarLibrary::from_source(&JsonExemplarSource::from_path(path)?)?
            }
            None => ExemplarLibrary::from_source(&CanonicalExemplarLibrary)?,
        };

        Ok(ProfileEngine::new(
            Arc::new(table),
            Arc::new(exemplars),
            config,
        )?)
    }
}
