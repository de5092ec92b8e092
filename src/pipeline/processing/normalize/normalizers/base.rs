use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::config::SourceConfig;
use crate::constants::COLUMNS_MAPPER;
use crate::error::Result;
use crate::pipeline::processing::normalize::{GenreTable, NormalizedRecord, SchemaMapper};
use crate::types::{Column, RawRecord};

/// Maps any listing table whose headers are canonical columns after the
/// source's renames. Most services need nothing more.
#[derive(Debug, Default)]
pub struct ColumnMapper;

impl ColumnMapper {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaMapper for ColumnMapper {
    fn map_tables(&self, source: &SourceConfig, tables: &[GenreTable]) -> Result<Vec<NormalizedRecord>> {
        let mut records = Vec::new();
        for table in tables {
            log_ignored_headers(source, table);
            records.extend(table.table.records().map(|raw| map_row(source, &table.genre, &raw)));
        }
        Ok(records)
    }

    fn kind(&self) -> &str {
        COLUMNS_MAPPER
    }
}

/// Columns a listing table may fill. Cur. service comes from configuration and
/// Episodes only exists after the Seasons split.
fn assignable(column: Column) -> bool {
    !matches!(column, Column::CurService | Column::Episodes)
}

/// Rename one raw row onto the unified columns, then apply constants and the genre fallback.
pub fn map_row(source: &SourceConfig, genre: &str, raw: &RawRecord<'_>) -> NormalizedRecord {
    let mut record = NormalizedRecord::new(source.service.clone());
    for (header, value) in raw.iter() {
        match Column::from_header(source.rename_target(header)) {
            Some(column) if assignable(column) => {
                // A renamed header and a native one may both exist; keep the first filled
                if record.get(column).is_none() {
                    record.set(column, Some(value.to_string()));
                }
            }
            _ => {}
        }
    }

    for (column, value) in source.constant_columns() {
        record.set(column, Some(value.to_string()));
    }

    if record.genre.is_none() {
        record.genre = Some(genre.to_string());
    }
    record
}

fn log_ignored_headers(source: &SourceConfig, table: &GenreTable) {
    let ignored: BTreeSet<&str> = table
        .table
        .headers
        .iter()
        .map(String::as_str)
        .filter(|h| {
            !Column::from_header(source.rename_target(h))
                .map(assignable)
                .unwrap_or(false)
        })
        .collect();
    if ignored.is_empty() {
        return;
    }
    if table.table.has_column(Column::Title.header()) {
        debug!(
            source_id = %source.id,
            genre = %table.genre,
            "Dropping columns outside the unified set: {:?}",
            ignored
        );
    } else {
        warn!(
            source_id = %source.id,
            genre = %table.genre,
            "Table has no Title column; every row will be dropped. Columns: {:?}",
            table.table.headers
        );
    }
}
