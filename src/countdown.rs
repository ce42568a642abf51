use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The voting window. Voting is open strictly before `end`; only the admin
/// controls ever move `end`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionWindow {
    pub end: DateTime<Utc>,
}

impl ElectionWindow {
    pub fn new(end: DateTime<Utc>) -> Self {
        Self { end }
    }

    /// Whether voting is open at the given instant.
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        now < self.end
    }

    /// Countdown snapshot at the given instant.
    pub fn status(&self, now: DateTime<Utc>) -> CountdownStatus {
        CountdownStatus::evaluate(now, self.end)
    }
}

/// Snapshot of the remaining voting time, for display on a one-second tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownStatus {
    /// Milliseconds until the window closes, floored at zero.
    pub remaining_ms: i64,
    /// True from the instant `now` reaches the end time, until an admin
    /// moves the end time into the future again.
    pub is_expired: bool,
    /// `HH:MM:SS` rendering of the remaining time.
    pub formatted: String,
}

impl CountdownStatus {
    pub fn evaluate(now: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let remaining_ms = (end - now).num_milliseconds().max(0);
        Self {
            remaining_ms,
            is_expired: now >= end,
            formatted: format_hms(remaining_ms),
        }
    }
}

fn format_hms(ms: i64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
