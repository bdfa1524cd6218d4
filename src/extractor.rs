// src/extractor.rs

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::sudomemo::SudomemoExtractor;
use crate::types::Metadata;

/// A site adapter: recognizes its URLs and turns a page into a record.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn suitable(&self, url: &str) -> bool;
    async fn extract(&self, url: &str, fetcher: &dyn Fetch) -> Result<Metadata>;
}

/// Dispatches a URL to the first extractor that accepts it.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self {
            extractors: vec![Box::new(SudomemoExtractor)],
        }
    }
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    pub fn find(&self, url: &str) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|extractor| extractor.suitable(url))
            .map(|extractor| extractor.as_ref())
    }

    pub async fn extract(&self, url: &str, fetcher: &dyn Fetch) -> Result<Metadata> {
        let extractor = self.find(url).ok_or_else(|| Error::NoMatch {
            url: url.to_string(),
        })?;

        debug!(extractor = extractor.name(), %url, "Dispatching URL");
        extractor.extract(url, fetcher).await
    }
}
