use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use parking_lot::RwLock;
use serde::Deserialize;

use crate::{config::Config, scheduled_task::PeriodicTask};

/// Response shape of the remote time service.
#[derive(Debug, Deserialize)]
struct TimeResponse {
    datetime: DateTime<Utc>,
}

/// A best-effort source of the current time.
///
/// Readings prefer the remote time service. Until a fetch has succeeded, and
/// whenever a fetch fails, the local device clock is used instead; the
/// failure is logged and never surfaced to callers. Successive readings may
/// jump when a refresh lands, so consumers must not assume causality between
/// them beyond monotonic-ish real time.
pub struct ClockSource {
    client: reqwest::Client,
    url: String,
    reading: RwLock<Option<RemoteReading>>,
}

/// A successful remote reading, plus the instant we took it so that `now`
/// can account for time elapsed since.
struct RemoteReading {
    reported: DateTime<Utc>,
    taken_at: Instant,
}

impl ClockSource {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.time_fetch_timeout())
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            url: config.time_api_url().to_string(),
            reading: RwLock::new(None),
        }
    }

    /// The current best-effort time.
    pub fn now(&self) -> DateTime<Utc> {
        match &*self.reading.read() {
            Some(reading) => {
                let elapsed = Duration::from_std(reading.taken_at.elapsed())
                    .unwrap_or_else(|_| Duration::zero());
                reading.reported + elapsed
            }
            None => Utc::now(),
        }
    }

    /// Fetch the authoritative time once.
    /// A failed fetch leaves the previous reading (or local fallback) in place.
    pub async fn refresh(&self) {
        match self.fetch().await {
            Ok(reported) => {
                debug!("Remote time reading: {reported}");
                *self.reading.write() = Some(RemoteReading {
                    reported,
                    taken_at: Instant::now(),
                });
            }
            Err(err) => {
                warn!("Time service unavailable, using local clock: {err}");
            }
        }
    }

    async fn fetch(&self) -> Result<DateTime<Utc>, reqwest::Error> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let body: TimeResponse = response.json().await?;
        Ok(body.datetime)
    }

    /// Keep the reading fresh on the given cadence until the task is cancelled.
    pub fn spawn_refresh(self: Arc<Self>, period: std::time::Duration) -> PeriodicTask {
        PeriodicTask::spawn(period, move || {
            let clock = Arc::clone(&self);
            async move { clock.refresh().await }
        })
    }
}
