// Dataset pipeline: fetch, extract, map, merge, clean, and write

pub mod processing;
pub mod storage;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

use crate::apis::snapshot::save_snapshot;
use crate::apis::PageFetcher;
use crate::config::{Config, SourceConfig};
use crate::error::{DatasetError, Result};
use crate::metrics::{FetchMetrics, MapperMetrics};
use crate::parser::WikiTableParser;
use processing::clean::{CleanedRecord, FieldCleaner};
use processing::merge::{merge, SourceBatch};
use processing::normalize::{pair_tables, NormalizationRegistry};
use storage::CsvSink;

/// What one source contributed to a run
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub id: String,
    pub service: String,
    pub genres: Vec<String>,
    pub tables_used: usize,
    pub records: usize,
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub sources: Vec<SourceReport>,
    pub merged: usize,
    pub dropped: usize,
    pub cleaned: usize,
    pub output_file: Option<String>,
}

/// Cleaned rows ready for the sink, with the counts that produced them
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<CleanedRecord>,
    pub report: PipelineReport,
}

pub struct Pipeline {
    config: Config,
    fetcher: Arc<dyn PageFetcher>,
    parser: WikiTableParser,
    registry: NormalizationRegistry,
    cleaner: FieldCleaner,
}

impl Pipeline {
    pub fn new(config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            config,
            fetcher,
            parser: WikiTableParser::new(),
            registry: NormalizationRegistry::new(),
            cleaner: FieldCleaner::new(),
        }
    }

    /// Fetch every page concurrently; pages come back in source order
    #[instrument(skip(self, sources), fields(fetcher = self.fetcher.name(), sources = sources.len()))]
    pub async fn fetch_pages(&self, sources: &[&SourceConfig]) -> Result<Vec<Vec<u8>>> {
        let mut tasks = JoinSet::new();
        for (index, source) in sources.iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let source = (*source).clone();
            tasks.spawn(async move {
                let started = Instant::now();
                let result = fetcher.fetch_page(&source).await;
                (index, source.id, result, started.elapsed().as_secs_f64())
            });
        }

        let mut pages: Vec<Option<Vec<u8>>> = vec![None; sources.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, source_id, result, secs) = joined?;
            match result {
                Ok(bytes) => {
                    FetchMetrics::record_success(bytes.len(), secs);
                    debug!(source_id = %source_id, "Fetched {} bytes in {:.2}s", bytes.len(), secs);
                    pages[index] = Some(bytes);
                }
                Err(e) => {
                    FetchMetrics::record_error();
                    error!(source_id = %source_id, "❌ Fetch failed: {}", e);
                    return Err(e);
                }
            }
        }

        pages
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| DatasetError::Config("A fetch task finished without a page".to_string()))
    }

    /// Extract one page and map its genre tables onto the unified columns
    #[instrument(skip(self, source, bytes), fields(source_id = %source.id))]
    pub fn normalize_source(&self, source: &SourceConfig, bytes: &[u8]) -> Result<(SourceBatch, SourceReport)> {
        let page = self.parser.parse(bytes);
        let tables = pair_tables(source, page).map_err(|e| {
            MapperMetrics::record_mismatch();
            error!("❌ {}", e);
            e
        })?;
        let records = self.registry.map_tables(source, &tables)?;
        MapperMetrics::record_source(tables.len(), records.len());

        let genres: Vec<String> = tables.into_iter().map(|t| t.genre).collect();
        info!(
            "📋 {} ({}): {} genres {:?}, {} records",
            source.service,
            source.id,
            genres.len(),
            genres,
            records.len()
        );

        let report = SourceReport {
            id: source.id.clone(),
            service: source.service.clone(),
            tables_used: genres.len(),
            genres,
            records: records.len(),
        };
        let batch = SourceBatch {
            source_id: source.id.clone(),
            service: source.service.clone(),
            records,
        };
        Ok((batch, report))
    }

    /// Fetch, map, merge and clean the selected sources without writing anything
    #[instrument(skip(self))]
    pub async fn build(&self, ids: Option<&[String]>) -> Result<Dataset> {
        let sources = self.config.select(ids)?;
        info!("🚀 Building dataset from {} sources", sources.len());
        counter!("streaming_originals_runs_total").increment(1);
        let started = Instant::now();

        let pages = self.fetch_pages(&sources).await?;

        // Every source must map before anything is cleaned
        let mut batches = Vec::with_capacity(sources.len());
        let mut reports = Vec::with_capacity(sources.len());
        for (source, bytes) in sources.iter().zip(&pages) {
            let (batch, report) = self.normalize_source(source, bytes)?;
            batches.push(batch);
            reports.push(report);
        }

        let merged = merge(batches);
        let merged_count = merged.len();
        let outcome = self.cleaner.clean(merged)?;

        histogram!("streaming_originals_build_duration_seconds").record(started.elapsed().as_secs_f64());
        info!(
            "✅ Dataset ready: {} merged, {} dropped, {} cleaned",
            merged_count,
            outcome.dropped,
            outcome.records.len()
        );

        let report = PipelineReport {
            sources: reports,
            merged: merged_count,
            dropped: outcome.dropped,
            cleaned: outcome.records.len(),
            output_file: None,
        };
        Ok(Dataset {
            records: outcome.records,
            report,
        })
    }

    /// Build the dataset and write it as CSV. Nothing is written when any step fails.
    pub async fn run(&self, ids: Option<&[String]>, output: &Path) -> Result<PipelineReport> {
        let dataset = self.build(ids).await?;
        let sink = CsvSink::new(output);
        sink.write(&dataset.records)?;

        let mut report = dataset.report;
        report.output_file = Some(sink.path().display().to_string());
        Ok(report)
    }

    /// Save the selected pages under `dir` for later offline runs
    #[instrument(skip(self))]
    pub async fn snapshot(&self, ids: Option<&[String]>, dir: &Path) -> Result<Vec<PathBuf>> {
        let sources = self.config.select(ids)?;
        let pages = self.fetch_pages(&sources).await?;
        let mut paths = Vec::with_capacity(pages.len());
        for (source, bytes) in sources.iter().zip(&pages) {
            let path = save_snapshot(dir, source, bytes).await?;
            info!(source_id = %source.id, "📥 Saved {}", path.display());
            paths.push(path);
        }
        Ok(paths)
    }
}

/// Write a run report as pretty JSON
pub fn write_report(report: &PipelineReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}
