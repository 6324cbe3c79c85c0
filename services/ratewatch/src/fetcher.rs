//! Rate endpoint fetcher

use std::sync::Arc;

use async_trait::async_trait;

use crate::io::HttpClient;

/// Fetches the raw rate payload from an endpoint.
///
/// Implementations do not retry; the monitor loop owns the retry policy.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait RateFetcher: Send + Sync + std::fmt::Debug {
    /// Return the raw response body. Transport failures, non-200 responses and
    /// empty bodies all surface as `RateWatchError::Fetch`.
    async fn fetch(&self, url: &str) -> crate::Result<String>;
}

/// Fetcher backed by an [`HttpClient`]
pub struct HttpRateFetcher {
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for HttpRateFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRateFetcher").finish_non_exhaustive()
    }
}

impl HttpRateFetcher {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RateFetcher for HttpRateFetcher {
    async fn fetch(&self, url: &str) -> crate::Result<String> {
        let response = self
            .http
            .get(url)
            .await
            .map_err(|e| crate::RateWatchError::Fetch(e.to_string()))?;

        if response.status != 200 {
            return Err(crate::RateWatchError::Fetch(format!(
                "{} returned status {}",
                url, response.status
            )));
        }

        if response.body.trim().is_empty() {
            return Err(crate::RateWatchError::Fetch(format!(
                "{} returned an empty body",
                url
            )));
        }

        Ok(response.body)
    }
}
