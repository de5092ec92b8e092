use std::collections::HashMap;

use super::normalizers::{ColumnMapper, NetflixEndedMapper};
use super::{GenreTable, NormalizedRecord, SchemaMapper};
use crate::config::SourceConfig;
use crate::constants::{COLUMNS_MAPPER, NETFLIX_ENDED_MAPPER};
use crate::error::{DatasetError, Result};

/// Registry of schema mappers keyed by the mapper kind named in source configuration
pub struct NormalizationRegistry {
    mappers: HashMap<String, Box<dyn SchemaMapper>>,
}

impl NormalizationRegistry {
    /// Create a registry holding the built-in mappers
    pub fn new() -> Self {
        let mut mappers: HashMap<String, Box<dyn SchemaMapper>> = HashMap::new();
        mappers.insert(COLUMNS_MAPPER.to_string(), Box::new(ColumnMapper::new()));
        mappers.insert(NETFLIX_ENDED_MAPPER.to_string(), Box::new(NetflixEndedMapper::new()));
        Self { mappers }
    }

    pub fn get_mapper(&self, kind: &str) -> Option<&dyn SchemaMapper> {
        self.mappers.get(kind).map(|m| m.as_ref())
    }

    /// Map a source's genre tables with the mapper its configuration names
    pub fn map_tables(&self, source: &SourceConfig, tables: &[GenreTable]) -> Result<Vec<NormalizedRecord>> {
        let mapper = self.get_mapper(&source.mapper).ok_or_else(|| {
            DatasetError::Config(format!(
                "No mapper registered for kind '{}' (source '{}')",
                source.mapper, source.id
            ))
        })?;
        mapper.map_tables(source, tables)
    }

    pub fn list_kinds(&self) -> Vec<&str> {
        self.mappers.keys().map(|k| k.as_str()).collect()
    }
}

impl Default for NormalizationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
