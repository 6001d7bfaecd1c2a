//! Producers: the operations a fetch-through cache falls back to on a miss.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::store::StoreValue;

// == Producer ==
/// Computes the value for an input when the cache cannot serve it.
#[async_trait]
pub trait Producer: Send + Sync {
    /// Value type cached in the store.
    type Output: StoreValue + Send + Sync;

    /// Produces the value for `input`.
    async fn produce(&self, input: &str) -> Result<Self::Output>;
}

#[async_trait]
impl<P: Producer + ?Sized> Producer for Arc<P> {
    type Output = P::Output;

    async fn produce(&self, input: &str) -> Result<Self::Output> {
        (**self).produce(input).await
    }
}

// == HTTP Fetcher ==
/// Fetches the body of a URL over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Producer for HttpFetcher {
    type Output = String;

    async fn produce(&self, url: &str) -> Result<String> {
        debug!(url, "fetching remote resource");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
