pub mod cache;
pub mod headers;
pub mod http_transport;
pub mod poller;
pub mod request;
pub mod requestor;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::app::Result;

pub use cache::{CacheEntry, ResponseCache};
pub use request::{RequestBuilder, RequestDescriptor};
pub use requestor::Requestor;

/// What came back over the wire, before any interpretation of the status.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Sends a fully built request. Network, TLS and timeout failures are
/// reported as errors; every HTTP status, including 4xx/5xx, is a response.
#[async_trait]
pub trait Transport {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse>;
}
