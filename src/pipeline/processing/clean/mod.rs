//! Turns merged records into typed output rows, one record at a time.

pub mod classify;
pub mod episodes;
pub mod premiere;
pub mod runtime;
pub mod status;
pub mod text;

pub use premiere::Premiere;
pub use runtime::RuntimeBucket;

use serde::Serialize;
use tracing::{error, info, instrument};

use super::normalize::NormalizedRecord;
use crate::constants::AWAITING_RELEASE;
use crate::error::{DatasetError, Result};
use crate::metrics::CleanerMetrics;
use classify::FieldError;

/// Final output row. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedRecord {
    #[serde(rename = "Cur. service")]
    pub service: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Premiere")]
    pub premiere: Premiere,
    #[serde(rename = "Seasons")]
    pub seasons: String,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "Language")]
    pub language: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: RuntimeBucket,
    #[serde(rename = "Episodes")]
    pub episodes: String,
    #[serde(rename = "Prev. network(s)")]
    pub prev_networks: Option<String>,
}

impl From<CleanedRecord> for NormalizedRecord {
    fn from(record: CleanedRecord) -> Self {
        NormalizedRecord {
            service: record.service,
            title: Some(record.title),
            genre: record.genre,
            premiere: Some(record.premiere.to_string()),
            seasons: Some(record.seasons),
            status: record.status,
            language: record.language,
            runtime: Some(record.runtime.label().to_string()),
            episodes: Some(record.episodes),
            prev_networks: record.prev_networks,
        }
    }
}

/// Records with no title, or with the unfilled-cell placeholder as title or
/// genre, never reach cleaning.
pub fn should_drop(record: &NormalizedRecord) -> bool {
    match record.title.as_deref() {
        None => true,
        Some(title) => title == AWAITING_RELEASE || record.genre.as_deref() == Some(AWAITING_RELEASE),
    }
}

/// Clean one record. Unknown free text fails with the record's service and title.
pub fn clean_record(record: &NormalizedRecord) -> Result<CleanedRecord> {
    let title = record.title.as_deref().unwrap_or_default();
    let unrecognized = |e: FieldError| {
        CleanerMetrics::record_unrecognized(e.field);
        DatasetError::UnrecognizedFormat {
            service: record.service.clone(),
            title: title.to_string(),
            field: e.field,
            value: e.value,
        }
    };

    if record.title.is_none() {
        return Err(unrecognized(FieldError {
            field: "Title",
            value: String::new(),
        }));
    }

    let counts = episodes::clean_counts(record.seasons.as_deref(), record.episodes.as_deref())
        .map_err(unrecognized)?;

    Ok(CleanedRecord {
        service: record.service.clone(),
        title: text::strip_citations(title),
        genre: record.genre.clone(),
        premiere: premiere::clean_premiere(record.premiere.as_deref()).map_err(unrecognized)?,
        seasons: counts.seasons,
        status: status::clean_status(record.status.as_deref()).map_err(unrecognized)?,
        language: record.language.clone(),
        runtime: runtime::bucket_runtime(record.runtime.as_deref()).map_err(unrecognized)?,
        episodes: counts.episodes,
        prev_networks: record.prev_networks.clone(),
    })
}

/// Cleaned rows plus the number of records removed by the drop rule
#[derive(Debug, Clone, Default)]
pub struct CleanOutcome {
    pub records: Vec<CleanedRecord>,
    pub dropped: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FieldCleaner;

impl FieldCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Apply the drop rule, then clean every remaining record. The first
    /// unrecognized value aborts the whole batch.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn clean(&self, records: Vec<NormalizedRecord>) -> Result<CleanOutcome> {
        let total = records.len();
        let kept: Vec<NormalizedRecord> = records.into_iter().filter(|r| !should_drop(r)).collect();
        let dropped = total - kept.len();

        let cleaned = kept
            .iter()
            .map(clean_record)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| {
                error!("❌ Cleaning aborted: {}", e);
                e
            })?;

        CleanerMetrics::record_batch(cleaned.len(), dropped);
        info!("🧹 Cleaned {} records, dropped {}", cleaned.len(), dropped);
        Ok(CleanOutcome {
            records: cleaned,
            dropped,
        })
    }
}
