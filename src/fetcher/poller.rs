//! Fixed-interval polling of the bulk snapshot.
//!
//! One fetch per tick, no backoff: a recoverable failure just waits for the
//! next tick. Errors that will not go away on their own (bad SDK key,
//! missing resource) stop the loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};

use crate::app::Result;
use crate::domain::FetchOutcome;
use crate::fetcher::Requestor;

/// Poller configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between fetches (default: 1s)
    pub interval: Duration,
    /// Stop after this many fetches (None = until stopped)
    pub max_polls: Option<u64>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_polls: None,
        }
    }
}

impl PollerConfig {
    /// Parse interval string like "500ms", "1s", "30m", "1h", "1d"
    pub fn parse_interval(s: &str) -> std::result::Result<Duration, String> {
        let s = s.trim().to_lowercase();

        let (value, unit_secs, unit) = if let Some(ms) = s.strip_suffix("ms") {
            let ms = ms
                .parse::<u64>()
                .map_err(|_| format!("Invalid milliseconds: {}", ms))?;
            return Self::non_zero(Duration::from_millis(ms));
        } else if let Some(secs) = s.strip_suffix('s') {
            (secs, 1, "seconds")
        } else if let Some(minutes) = s.strip_suffix('m') {
            (minutes, 60, "minutes")
        } else if let Some(hours) = s.strip_suffix('h') {
            (hours, 3600, "hours")
        } else if let Some(days) = s.strip_suffix('d') {
            (days, 86400, "days")
        } else {
            let secs = s.parse::<u64>().map_err(|_| {
                format!("Invalid interval: {}. Use format like '1s', '500ms', '5m'", s)
            })?;
            return Self::non_zero(Duration::from_secs(secs));
        };

        let secs = value
            .parse::<u64>()
            .map_err(|_| format!("Invalid {}: {}", unit, value))?
            .checked_mul(unit_secs)
            .ok_or_else(|| format!("Interval too large: {}", s))?;

        Self::non_zero(Duration::from_secs(secs))
    }

    fn non_zero(interval: Duration) -> std::result::Result<Duration, String> {
        if interval.is_zero() {
            return Err("Interval must be greater than zero".to_string());
        }
        Ok(interval)
    }

    /// Format interval for display
    pub fn format_interval(interval: Duration) -> String {
        let secs = interval.as_secs();
        if interval.subsec_millis() != 0 || secs == 0 {
            format!("{}ms", interval.as_millis())
        } else if secs >= 86400 && secs % 86400 == 0 {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs % 3600 == 0 {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

pub struct Poller {
    requestor: Arc<Requestor>,
    config: PollerConfig,
    running: Arc<AtomicBool>,
}

impl Poller {
    pub fn new(requestor: Arc<Requestor>, config: PollerConfig) -> Self {
        Self {
            requestor,
            config,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Poll until stopped, `max_polls` is reached, or an unrecoverable
    /// error occurs. Every successful fetch is passed to `on_outcome`.
    /// Returns the number of fetches attempted.
    pub async fn run<F>(&self, mut on_outcome: F) -> Result<u64>
    where
        F: FnMut(FetchOutcome),
    {
        tracing::info!(
            "Polling every {}",
            PollerConfig::format_interval(self.config.interval)
        );

        let mut timer = interval(self.config.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls = 0;

        while self.running.load(Ordering::SeqCst) {
            if self.config.max_polls.is_some_and(|max| polls >= max) {
                break;
            }

            // First tick completes immediately.
            timer.tick().await;

            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            polls += 1;
            let start = Utc::now();

            match self.requestor.request_all_data().await {
                Ok(outcome) => {
                    let elapsed = Utc::now().signed_duration_since(start);
                    tracing::info!(
                        "Poll {}: {} ({} bytes, {}ms)",
                        polls,
                        if outcome.is_cached() { "not modified" } else { "updated" },
                        outcome.body().len(),
                        elapsed.num_milliseconds()
                    );
                    on_outcome(outcome);
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("Poll {} failed, retrying next interval: {}", polls, e);
                }
                Err(e) => {
                    tracing::error!("Poll {} failed with unrecoverable error, stopping: {}", polls, e);
                    self.stop();
                    return Err(e);
                }
            }
        }

        tracing::info!("Poller stopped after {} polls", polls);
        self.stop();
        Ok(polls)
    }

    /// Stop the poller; takes effect before the next fetch.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
