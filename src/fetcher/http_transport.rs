use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Certificate, Client, Proxy};

use crate::app::Result;
use crate::config::{ProxySettings, TlsSettings};
use crate::fetcher::{RequestDescriptor, Transport, TransportResponse};

/// TLS and proxy settings are fixed per client in reqwest, so requests that
/// share them share a client (and its connection pool).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ConnectionProfile {
    tls: TlsSettings,
    proxy: Option<ProxySettings>,
}

pub struct HttpTransport {
    clients: Mutex<HashMap<ConnectionProfile, Client>>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    async fn client_for(&self, request: &RequestDescriptor) -> Result<Client> {
        let profile = ConnectionProfile {
            tls: request.tls.clone(),
            proxy: request.proxy.clone(),
        };

        let existing = self.clients.lock().get(&profile).cloned();
        if let Some(client) = existing {
            return Ok(client);
        }

        // Built without holding the lock; the CA bundle read is async.
        let client = build_client(&profile).await?;
        Ok(self.clients.lock().entry(profile).or_insert(client).clone())
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

async fn build_client(profile: &ConnectionProfile) -> Result<Client> {
    let mut builder = Client::builder().gzip(true).brotli(true);

    if let Some(path) = &profile.tls.ca_cert_path {
        let pem = tokio::fs::read(path).await?;
        builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
    }

    if profile.tls.insecure_skip_verify {
        tracing::warn!("TLS certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }

    match &profile.proxy {
        Some(settings) => {
            let url = url::Url::parse(&settings.url)?;
            tracing::debug!(
                "Routing requests through proxy {}",
                url.host_str().unwrap_or_default()
            );

            let mut proxy = Proxy::all(url)?;
            if let Some(username) = &settings.username {
                proxy = proxy.basic_auth(username, settings.password.as_deref().unwrap_or_default());
            }
            builder = builder.proxy(proxy);
        }
        // Only the configured proxy applies; ignore HTTP_PROXY and friends.
        None => builder = builder.no_proxy(),
    }

    Ok(builder.build()?)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse> {
        let client = self.client_for(&request).await?;

        let response = client
            .request(request.method, request.url.as_str())
            .headers(request.headers)
            .timeout(request.timeout)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use reqwest::header::HeaderMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    use super::*;
    use crate::app::FetchError;
    use crate::config::Config;
    use crate::domain::FetchOutcome;
    use crate::fetcher::headers::default_headers;
    use crate::fetcher::{RequestBuilder, Requestor};

    fn http_response(status_line: &str, extra_headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            extra_headers,
            body.len(),
            body
        )
    }

    /// Serves one canned response per connection and reports each request head.
    async fn serve(responses: Vec<String>) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut head = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&chunk[..n]);
                    if head.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                tx.send(String::from_utf8_lossy(&head).to_ascii_lowercase())
                    .unwrap();
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), rx)
    }

    fn requestor_for(base_uri: String, timeout_secs: u64) -> Requestor {
        let config = Config {
            sdk_key: "sdk-test".into(),
            base_uri,
            timeout_secs,
            ..Config::default()
        };
        let headers = default_headers(&config.sdk_key, None).unwrap();
        Requestor::new(
            RequestBuilder::new(&config, headers),
            Arc::new(HttpTransport::new()),
            config.cache_capacity,
        )
    }

    #[tokio::test]
    async fn test_conditional_round_trip_over_http() {
        let body = r#"{"flags":{"a":{}},"segments":{}}"#;
        let (base, mut heads) = serve(vec![
            http_response("200 OK", "ETag: \"v1\"\r\n", body),
            http_response("304 Not Modified", "ETag: \"v1\"\r\n", ""),
        ])
        .await;
        let requestor = requestor_for(base, 5);

        let first = requestor.request_all_data().await.unwrap();
        assert_eq!(first, FetchOutcome::Fresh(body.as_bytes().to_vec()));

        let head = heads.recv().await.unwrap();
        assert!(head.starts_with("get /sdk/latest-all http/1.1"));
        assert!(head.contains("authorization: sdk-test"));
        assert!(!head.contains("if-none-match"));

        let second = requestor.request_all_data().await.unwrap();
        assert_eq!(second, FetchOutcome::Cached(body.as_bytes().to_vec()));

        let head = heads.recv().await.unwrap();
        assert!(head.contains("if-none-match: \"v1\""));
    }

    #[tokio::test]
    async fn test_error_status_over_http() {
        let (base, _heads) = serve(vec![http_response("503 Service Unavailable", "", "")]).await;
        let requestor = requestor_for(base, 5);

        let err = requestor.request_all_data().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        let requestor = requestor_for(format!("http://{}", addr), 1);

        let err = requestor.request_all_data().await.unwrap_err();
        match err {
            FetchError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_ca_bundle_fails_request() {
        let transport = HttpTransport::new();
        let config = Config {
            tls: TlsSettings {
                ca_cert_path: Some("/nonexistent/ca.pem".into()),
                insecure_skip_verify: false,
            },
            ..Config::default()
        };
        let request = RequestBuilder::new(&config, HeaderMap::new()).build("/sdk/latest-all");

        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }

    #[tokio::test]
    async fn test_invalid_proxy_url_fails_request() {
        let transport = HttpTransport::new();
        let config = Config {
            proxy: Some(ProxySettings {
                url: "not a proxy".into(),
                username: None,
                password: None,
            }),
            ..Config::default()
        };
        let request = RequestBuilder::new(&config, HeaderMap::new()).build("/sdk/latest-all");

        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_clients_shared_per_profile() {
        let transport = HttpTransport::new();
        let builder = RequestBuilder::new(&Config::default(), HeaderMap::new());

        transport.client_for(&builder.build("/a")).await.unwrap();
        transport.client_for(&builder.build("/b")).await.unwrap();
        assert_eq!(transport.clients.lock().len(), 1);

        let insecure = Config {
            tls: TlsSettings {
                ca_cert_path: None,
                insecure_skip_verify: true,
            },
            ..Config::default()
        };
        let other = RequestBuilder::new(&insecure, HeaderMap::new());
        transport.client_for(&other.build("/a")).await.unwrap();
        assert_eq!(transport.clients.lock().len(), 2);
    }
}
