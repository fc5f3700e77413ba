//! Provider-neutral event types.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// An event as reported by a calendar provider. Only what naming needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: EventTime,
}

impl CandidateEvent {
    pub fn new(title: impl Into<String>, description: Option<String>, start: EventTime) -> Self {
        CandidateEvent {
            title: title.into(),
            description,
            start,
        }
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Start of an event: a timed start in the calendar's offset, or an all-day date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTime {
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
}

impl EventTime {
    /// Wall-clock start as the calendar shows it. All-day events start at midnight.
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            EventTime::DateTime(dt) => dt.naive_local(),
            EventTime::Date(date) => date.and_time(NaiveTime::MIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_provider_json() {
        let timed: CandidateEvent = serde_json::from_str(
            r#"{"title":"Meetup","description":"at the park","start":{"date_time":"2025-05-29T23:30:00+09:00"}}"#,
        )
        .unwrap();
        // Keeps the calendar's local date rather than converting to UTC.
        assert_eq!(timed.start.naive_local().date(), NaiveDate::from_ymd_opt(2025, 5, 29).unwrap());
        assert_eq!(timed.description(), "at the park");

        let all_day: CandidateEvent =
            serde_json::from_str(r#"{"title":"Con","start":{"date":"2025-06-01"}}"#).unwrap();
        assert_eq!(all_day.description(), "");
        assert_eq!(
            all_day.start.naive_local(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
    }
}
