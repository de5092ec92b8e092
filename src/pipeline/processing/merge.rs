use serde::Serialize;
use tracing::info;

use super::normalize::NormalizedRecord;

/// Normalized records of one source, in table row order
#[derive(Debug, Clone, Serialize)]
pub struct SourceBatch {
    pub source_id: String,
    pub service: String,
    pub records: Vec<NormalizedRecord>,
}

/// Concatenate batches in the order given. Re-listings of the same title by
/// different services stay separate rows.
pub fn merge(batches: Vec<SourceBatch>) -> Vec<NormalizedRecord> {
    let total = batches.iter().map(|b| b.records.len()).sum();
    let mut merged = Vec::with_capacity(total);
    for batch in batches {
        info!(
            source_id = %batch.source_id,
            "🔗 Merging {} {} records",
            batch.records.len(),
            batch.service
        );
        merged.extend(batch.records);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(id: &str, service: &str, titles: &[&str]) -> SourceBatch {
        SourceBatch {
            source_id: id.to_string(),
            service: service.to_string(),
            records: titles
                .iter()
                .map(|t| NormalizedRecord {
                    title: Some(t.to_string()),
                    ..NormalizedRecord::new(service)
                })
                .collect(),
        }
    }

    #[test]
    fn test_merge_preserves_source_and_row_order() {
        let merged = merge(vec![
            batch("netflix", "Netflix", &["Ozark", "Narcos"]),
            batch("hulu", "Hulu", &["Castle Rock"]),
        ]);
        let titles: Vec<_> = merged.iter().filter_map(|r| r.title.as_deref()).collect();
        assert_eq!(titles, vec!["Ozark", "Narcos", "Castle Rock"]);
    }

    #[test]
    fn test_merge_keeps_cross_service_relistings() {
        let merged = merge(vec![
            batch("hulu", "Hulu", &["The Mindy Project"]),
            batch("amazon", "Amazon Prime", &["The Mindy Project"]),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].service, "Amazon Prime");
    }
}
