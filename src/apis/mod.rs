pub mod snapshot;
pub mod wikipedia;

pub use snapshot::SnapshotPageFetcher;
pub use wikipedia::HttpPageFetcher;

use crate::config::SourceConfig;
use crate::error::Result;

/// Retrieves the listing page of one source
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// Fetch the raw page bytes for this source
    async fn fetch_page(&self, source: &SourceConfig) -> Result<Vec<u8>>;
}
