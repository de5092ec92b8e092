use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use super::PageFetcher;
use crate::config::SourceConfig;
use crate::error::{DatasetError, Result};

/// Reads previously saved pages from `<dir>/<source-id>.html`
pub struct SnapshotPageFetcher {
    dir: PathBuf,
}

impl SnapshotPageFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn page_path(dir: &Path, source: &SourceConfig) -> PathBuf {
        dir.join(format!("{}.html", source.id))
    }
}

#[async_trait::async_trait]
impl PageFetcher for SnapshotPageFetcher {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    #[instrument(skip(self, source), fields(source_id = %source.id))]
    async fn fetch_page(&self, source: &SourceConfig) -> Result<Vec<u8>> {
        let path = Self::page_path(&self.dir, source);
        debug!("Reading snapshot {}", path.display());
        tokio::fs::read(&path).await.map_err(|e| DatasetError::Fetch {
            source_id: source.id.clone(),
            message: format!("cannot read snapshot '{}': {}", path.display(), e),
        })
    }
}

/// Store a fetched page where `SnapshotPageFetcher` will look for it
pub async fn save_snapshot(dir: &Path, source: &SourceConfig, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = SnapshotPageFetcher::page_path(dir, source);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
