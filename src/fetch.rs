use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::absolute_url;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Page retrieval capability supplied by the host.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// `reqwest`-backed page fetcher. Non-2xx responses are errors; there are
/// no retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;

        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let url = absolute_url(url);
        debug!(%url, "Downloading webpage");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| Error::Fetch {
                url: url.clone(),
                source,
            })?;

        if !resp.status().is_success() {
            return Err(Error::Status {
                url,
                status: resp.status(),
            });
        }

        resp.text().await.map_err(|source| Error::Fetch { url, source })
    }
}
