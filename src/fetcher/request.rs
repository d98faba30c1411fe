use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Method;

use crate::config::{Config, ProxySettings, TlsSettings};

/// A single outbound request, built fresh for every fetch.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub timeout: Duration,
    pub tls: TlsSettings,
    pub proxy: Option<ProxySettings>,
}

impl RequestDescriptor {
    /// The `If-None-Match` validator attached to this request, if any.
    #[cfg(test)]
    pub fn validator(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
    }
}

/// Turns resource paths into requests that all share the same base URL,
/// default headers, timeout, TLS and proxy settings.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_uri: String,
    headers: HeaderMap,
    timeout: Duration,
    tls: TlsSettings,
    proxy: Option<ProxySettings>,
}

impl RequestBuilder {
    pub fn new(config: &Config, headers: HeaderMap) -> Self {
        Self {
            base_uri: config.base_uri.trim_end_matches('/').to_string(),
            headers,
            timeout: config.timeout(),
            tls: config.tls.clone(),
            proxy: config.proxy.clone(),
        }
    }

    /// The path is appended verbatim; a malformed result is left for the
    /// transport to reject.
    pub fn build(&self, resource_path: &str) -> RequestDescriptor {
        RequestDescriptor {
            method: Method::GET,
            url: format!("{}{}", self.base_uri, resource_path),
            headers: self.headers.clone(),
            timeout: self.timeout,
            tls: self.tls.clone(),
            proxy: self.proxy.clone(),
        }
    }
}
