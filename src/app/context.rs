use std::sync::Arc;

use crate::app::error::{FetchError, Result};
use crate::config::Config;
use crate::fetcher::headers::default_headers;
use crate::fetcher::http_transport::HttpTransport;
use crate::fetcher::poller::{Poller, PollerConfig};
use crate::fetcher::{Requestor, Transport};

/// Wires configuration, default headers, transport and requestor together.
pub struct AppContext {
    pub config: Config,
    pub requestor: Arc<Requestor>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(
        config: Config,
        transport: Arc<dyn Transport + Send + Sync>,
    ) -> Result<Self> {
        if config.sdk_key.trim().is_empty() {
            return Err(FetchError::Config("sdk_key is not set".into()));
        }
        config
            .validate()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        let headers = default_headers(&config.sdk_key, config.user_agent.as_deref())?;
        let requestor = Arc::new(Requestor::from_config(&config, headers, transport));

        Ok(Self { config, requestor })
    }

    /// Poller over the shared requestor, so polls reuse the response cache.
    pub fn poller(&self, max_polls: Option<u64>) -> Result<Poller> {
        let interval =
            PollerConfig::parse_interval(&self.config.poll_interval).map_err(FetchError::Config)?;

        Ok(Poller::new(
            self.requestor.clone(),
            PollerConfig {
                interval,
                max_polls,
            },
        ))
    }
}
