use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument};

use super::PageFetcher;
use crate::config::{FetchConfig, SourceConfig};
use crate::error::{DatasetError, Result};

/// Fetches listing pages over HTTP
pub struct HttpPageFetcher {
    client: Client,
    client_param: String,
}

impl HttpPageFetcher {
    pub fn new(fetch: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(fetch.user_agent.clone())
            .timeout(Duration::from_secs(fetch.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            client_param: fetch.client.clone(),
        })
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self, source), fields(source_id = %source.id))]
    async fn fetch_page(&self, source: &SourceConfig) -> Result<Vec<u8>> {
        info!("📡 Fetching {}", source.url);
        let response = self
            .client
            .get(&source.url)
            .query(&[("client", self.client_param.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DatasetError::Fetch {
                source_id: source.id.clone(),
                message: format!("request failed with status: {}", response.status()),
            });
        }

        let bytes = response.bytes().await?.to_vec();
        debug!("Fetched {} bytes", bytes.len());
        Ok(bytes)
    }
}
