//! Date range for event lookups.

use chrono::{DateTime, Duration, Utc};

use crate::constants::DEFAULT_WINDOW_DAYS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Default for DateRange {
    /// The last DEFAULT_WINDOW_DAYS up to now.
    fn default() -> Self {
        DateRange::recent(DEFAULT_WINDOW_DAYS)
    }
}

impl DateRange {
    /// From `days` ago until now.
    pub fn recent(days: i64) -> Self {
        DateRange::ending_at(Utc::now(), days)
    }

    pub fn ending_at(to: DateTime<Utc>, days: i64) -> Self {
        DateRange {
            from: to - Duration::days(days.max(0)),
            to,
        }
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }
}
