//! # flagfetch
//!
//! Conditional-request fetcher for feature flag and segment data.
//!
//! ## Architecture
//!
//! ```text
//! Config → RequestBuilder → Requestor (response cache) → Transport
//!                                ↑
//!                              Poller
//! ```
//!
//! Every 200 response is remembered together with its `ETag`. The next
//! request for the same URL carries `If-None-Match`, and a 304 answer is
//! served from the remembered body. The cache is bounded and evicts the
//! least recently used URL.
//!
//! ## Quick Start
//!
//! ```bash
//! # Fetch the full snapshot
//! flagfetch --sdk-key sdk-xxx all
//!
//! # Fetch one flag
//! flagfetch flag new-checkout
//!
//! # Poll every second
//! flagfetch poll --interval 1s
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together configuration,
/// default headers, the HTTP transport and the requestor.
pub mod app;

/// Command-line interface using clap.
///
/// - `all` - Fetch the bulk snapshot
/// - `flag <key>` / `segment <key>` - Fetch one object
/// - `poll` - Poll the bulk snapshot on an interval
pub mod cli;

/// Configuration loaded from `~/.config/flagfetch/config.toml`.
pub mod config;

/// Data kinds, resource paths and fetch outcomes.
pub mod domain;

/// HTTP fetching with conditional requests.
///
/// - [`RequestBuilder`](fetcher::RequestBuilder): Builds requests from config
/// - [`Requestor`](fetcher::Requestor): Conditional fetcher with LRU response cache
/// - [`Transport`](fetcher::Transport): Async trait for sending requests
/// - [`HttpTransport`](fetcher::http_transport::HttpTransport): reqwest-based implementation
/// - [`Poller`](fetcher::poller::Poller): Fixed-interval polling
pub mod fetcher;
