use std::path::Path;
use std::time::Duration as StdDuration;

use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Application configuration, derived from `CampusVote.toml` and
/// `CAMPUS_VOTE_*` environment variables on top of built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    voting_duration_hours: u32,
    time_api_url: String,
    time_refresh_secs: u32,
    time_fetch_timeout_secs: u32,
    store_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            voting_duration_hours: 3,
            time_api_url: "http://worldtimeapi.org/api/timezone/Asia/Kolkata".to_string(),
            time_refresh_secs: 60,
            time_fetch_timeout_secs: 5,
            store_path: "campus-vote-store.json".to_string(),
        }
    }
}

impl Config {
    /// Load the config from file and environment, falling back to defaults.
    pub fn load() -> Result<Self> {
        let config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("CampusVote.toml"))
            .merge(Env::prefixed("CAMPUS_VOTE_"))
            .extract()?;
        Ok(config)
    }

    /// Length of the voting window whenever voting is (re)started.
    /// Configured via `voting_duration_hours`.
    pub fn voting_duration(&self) -> Duration {
        Duration::hours(self.voting_duration_hours.into())
    }

    /// Remote time service endpoint.
    /// Expected to answer `GET` with `{ "datetime": "<ISO 8601>" }`.
    pub fn time_api_url(&self) -> &str {
        &self.time_api_url
    }

    /// Cadence of remote time refreshes.
    pub fn time_refresh_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.time_refresh_secs.into())
    }

    /// How long a single time fetch may take before falling back.
    pub fn time_fetch_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.time_fetch_timeout_secs.into())
    }

    /// Location of the on-disk store file.
    pub fn store_path(&self) -> &Path {
        Path::new(&self.store_path)
    }
}
