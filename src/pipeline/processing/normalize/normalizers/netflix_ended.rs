use crate::config::SourceConfig;
use crate::constants::{ENDED, NETFLIX_ENDED_MAPPER};
use crate::error::Result;
use crate::pipeline::processing::normalize::{GenreTable, NormalizedRecord, SchemaMapper};

use super::base::map_row;

const RELEASE_DATE: &str = "Release date";
const SEASONS: &str = "Seasons";
const EPISODES: &str = "Episodes";

/// Ended-programming listings report seasons and episodes in separate columns,
/// some tables use "Release date" instead of "Premiere", and every title has ended.
#[derive(Debug, Default)]
pub struct NetflixEndedMapper;

impl NetflixEndedMapper {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaMapper for NetflixEndedMapper {
    fn map_tables(&self, source: &SourceConfig, tables: &[GenreTable]) -> Result<Vec<NormalizedRecord>> {
        let mut records = Vec::new();
        for table in tables {
            for raw in table.table.records() {
                let mut record = map_row(source, &table.genre, &raw);

                if record.premiere.is_none() {
                    record.premiere = raw.get(RELEASE_DATE).map(str::to_string);
                }

                // Joined with ", " so the cleaner's split recovers both parts
                let counts: Vec<&str> = [raw.get(SEASONS), raw.get(EPISODES)]
                    .into_iter()
                    .flatten()
                    .collect();
                record.seasons = (!counts.is_empty()).then(|| counts.join(", "));

                record.status = Some(ENDED.to_string());
                records.push(record);
            }
        }
        Ok(records)
    }

    fn kind(&self) -> &str {
        NETFLIX_ENDED_MAPPER
    }
}
