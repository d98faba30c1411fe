use std::sync::Arc;

use reqwest::header::{HeaderMap, ETAG, IF_NONE_MATCH};
use reqwest::StatusCode;

use crate::app::{FetchError, Result};
use crate::config::Config;
use crate::domain::{DataKind, FetchOutcome, ALL_DATA_PATH};
use crate::fetcher::{CacheEntry, RequestBuilder, ResponseCache, Transport};

/// Single-shot conditional fetcher.
///
/// Remembers the `ETag` and body of every 200 response (up to the cache
/// capacity) and sends the tag back as `If-None-Match`, so an unchanged
/// resource costs a 304 instead of a full payload. Never retries; callers
/// own scheduling. Fetches are expected to be issued one at a time.
pub struct Requestor {
    builder: RequestBuilder,
    transport: Arc<dyn Transport + Send + Sync>,
    cache: ResponseCache,
}

impl Requestor {
    pub fn new(
        builder: RequestBuilder,
        transport: Arc<dyn Transport + Send + Sync>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            builder,
            transport,
            cache: ResponseCache::new(cache_capacity),
        }
    }

    pub fn from_config(
        config: &Config,
        headers: HeaderMap,
        transport: Arc<dyn Transport + Send + Sync>,
    ) -> Self {
        Self::new(
            RequestBuilder::new(config, headers),
            transport,
            config.cache_capacity,
        )
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetch a single flag or segment.
    pub async fn request_object(&self, kind: DataKind, key: &str) -> Result<FetchOutcome> {
        self.fetch(&kind.path_for(key)).await
    }

    /// Fetch the full snapshot of flags and segments.
    pub async fn request_all_data(&self) -> Result<FetchOutcome> {
        self.fetch(ALL_DATA_PATH).await
    }

    pub async fn fetch(&self, resource_path: &str) -> Result<FetchOutcome> {
        let mut request = self.builder.build(resource_path);
        let url = request.url.clone();

        // Keep the entry we validated against; the 304 refers to this body
        // even if the cache evicts it while the request is in flight.
        let cached = self.cache.get(&url);
        if let Some(entry) = &cached {
            request.headers.insert(IF_NONE_MATCH, entry.etag.clone());
        }

        tracing::debug!(
            "GET {} ({})",
            url,
            if cached.is_some() {
                "conditional"
            } else {
                "unconditional"
            }
        );

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", url, e);
            e
        })?;

        match response.status {
            StatusCode::OK => {
                // Stored as raw bytes; entity tags may hold non-ASCII octets.
                match response.headers.get(ETAG).cloned() {
                    Some(etag) => {
                        self.cache
                            .put(url.clone(), CacheEntry::new(etag, response.body.clone()));
                    }
                    // Without a validator the old entry would describe a stale body.
                    None => self.cache.remove(&url),
                }

                tracing::debug!("{} returned {} bytes", url, response.body.len());
                Ok(FetchOutcome::Fresh(response.body))
            }
            StatusCode::NOT_MODIFIED => match cached {
                Some(entry) => {
                    tracing::debug!("{} not modified, serving cached body", url);
                    Ok(FetchOutcome::Cached(entry.body))
                }
                None => {
                    tracing::warn!("{} answered 304 to an unconditional request", url);
                    Err(FetchError::UnexpectedStatus { status: 304 })
                }
            },
            status => {
                tracing::warn!("{} returned unexpected status {}", url, status);
                Err(FetchError::UnexpectedStatus {
                    status: status.as_u16(),
                })
            }
        }
    }
}
