pub mod normalizers;
pub mod registry;

pub use registry::NormalizationRegistry;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SourceConfig;
use crate::error::{DatasetError, Result};
use crate::parser::ExtractedPage;
use crate::types::{Column, RawTable};

/// A source row renamed onto the unified column set. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub service: String,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub premiere: Option<String>,
    pub seasons: Option<String>,
    pub status: Option<String>,
    pub language: Option<String>,
    pub runtime: Option<String>,
    /// Only populated when re-cleaning an already cleaned record
    pub episodes: Option<String>,
    pub prev_networks: Option<String>,
}

impl NormalizedRecord {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        match column {
            Column::CurService => Some(self.service.as_str()),
            Column::Title => self.title.as_deref(),
            Column::Genre => self.genre.as_deref(),
            Column::Premiere => self.premiere.as_deref(),
            Column::Seasons => self.seasons.as_deref(),
            Column::Status => self.status.as_deref(),
            Column::Language => self.language.as_deref(),
            Column::Runtime => self.runtime.as_deref(),
            Column::Episodes => self.episodes.as_deref(),
            Column::PrevNetworks => self.prev_networks.as_deref(),
        }
    }

    pub fn set(&mut self, column: Column, value: Option<String>) {
        match column {
            Column::CurService => {
                if let Some(service) = value {
                    self.service = service;
                }
            }
            Column::Title => self.title = value,
            Column::Genre => self.genre = value,
            Column::Premiere => self.premiere = value,
            Column::Seasons => self.seasons = value,
            Column::Status => self.status = value,
            Column::Language => self.language = value,
            Column::Runtime => self.runtime = value,
            Column::Episodes => self.episodes = value,
            Column::PrevNetworks => self.prev_networks = value,
        }
    }
}

/// One extracted table paired with the genre heading it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct GenreTable {
    pub genre: String,
    pub table: RawTable,
}

/// Maps one source's genre tables onto the unified column set
pub trait SchemaMapper: Send + Sync {
    fn map_tables(&self, source: &SourceConfig, tables: &[GenreTable]) -> Result<Vec<NormalizedRecord>>;

    /// Mapper kind as referenced from configuration
    fn kind(&self) -> &str;
}

/// Apply the source's end marker and exclusion rules to the page headings.
///
/// Each exclusion removes exactly one occurrence, so a heading repeated under
/// different parent sections must be listed once per occurrence.
pub fn resolve_genres(source: &SourceConfig, headings: &[String]) -> Result<Vec<String>> {
    let end = headings
        .iter()
        .position(|h| h == &source.end_heading)
        .ok_or_else(|| {
            DatasetError::mismatch(
                &source.id,
                format!("end heading '{}' not found on page", source.end_heading),
            )
        })?;

    let mut genres: Vec<String> = headings[..end].to_vec();
    for excluded in source.excluded_headings() {
        let pos = genres.iter().position(|g| g == excluded).ok_or_else(|| {
            DatasetError::mismatch(
                &source.id,
                format!("excluded heading '{}' is no longer on the page", excluded),
            )
        })?;
        genres.remove(pos);
    }

    for included in source.included_headings() {
        if !genres.iter().any(|g| g == included) {
            return Err(DatasetError::mismatch(
                &source.id,
                format!("declared heading '{}' is missing from the page", included),
            ));
        }
    }

    Ok(genres)
}

/// Pair resolved genres with the page's tables by position.
///
/// Only tables sitting before the end heading count. Their number must equal the
/// genre count and each table must sit under the genre it is paired with.
pub fn pair_tables(source: &SourceConfig, page: ExtractedPage) -> Result<Vec<GenreTable>> {
    let genres = resolve_genres(source, &page.headings)?;
    let end = page
        .headings
        .iter()
        .position(|h| h == &source.end_heading)
        .unwrap_or(page.headings.len());

    let (in_scope, trailing): (Vec<_>, Vec<_>) = page
        .tables
        .into_iter()
        .partition(|t| t.heading_index.map_or(true, |i| i < end));
    if !trailing.is_empty() {
        debug!(
            source_id = %source.id,
            "Ignoring {} tables after '{}'",
            trailing.len(),
            source.end_heading
        );
    }

    if in_scope.len() != genres.len() {
        warn!(
            source_id = %source.id,
            "Genres {:?} do not line up with {} tables",
            genres,
            in_scope.len()
        );
        return Err(DatasetError::mismatch(
            &source.id,
            format!(
                "{} genres resolved but {} tables found before '{}'",
                genres.len(),
                in_scope.len(),
                source.end_heading
            ),
        ));
    }

    genres
        .into_iter()
        .zip(in_scope)
        .enumerate()
        .map(|(i, (genre, headed))| {
            if headed.heading.as_deref() != Some(genre.as_str()) {
                return Err(DatasetError::mismatch(
                    &source.id,
                    format!(
                        "table {} sits under {:?} but would be paired with genre '{}'",
                        i, headed.heading, genre
                    ),
                ));
            }
            Ok(GenreTable {
                genre,
                table: headed.table,
            })
        })
        .collect()
}
