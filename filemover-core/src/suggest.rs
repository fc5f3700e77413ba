//! Suggest folder names from recent calendar events.
//!
//! Events are fetched from an [`EventSource`], kept when they hit a keyword,
//! and rendered with the configured [`EventFormat`].

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::calendar::{CandidateEvent, DateRange, EventSource};
use crate::constants::{DEFAULT_MAX_RESULTS, DEFAULT_WINDOW_DAYS, FETCH_TIMEOUT};
use crate::error::{FileMoverError, FileMoverResult};
use crate::keywords::KeywordSet;
use crate::name_format::EventFormat;

/// A formatted folder name and the event it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub name: String,
    pub event: CandidateEvent,
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub window_days: i64,
    pub max_results: usize,
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            window_days: DEFAULT_WINDOW_DAYS,
            max_results: DEFAULT_MAX_RESULTS,
            timeout: FETCH_TIMEOUT,
        }
    }
}

/// Keep the events that hit a keyword and render their folder names, oldest first.
pub fn suggestions(
    events: &[CandidateEvent],
    keywords: &KeywordSet,
    format: &EventFormat,
) -> FileMoverResult<Vec<Suggestion>> {
    let mut hits: Vec<&CandidateEvent> = events
        .iter()
        .filter(|event| keywords.matches(&event.title, event.description()))
        .collect();
    hits.sort_by_key(|event| event.start.naive_local());

    hits.into_iter()
        .map(|event| {
            Ok(Suggestion {
                name: format.render(&event.title, &event.start.naive_local())?,
                event: event.clone(),
            })
        })
        .collect()
}

/// Fetch recent events and turn the matching ones into suggestions.
///
/// The fetch is abandoned when `cancel` fires or after `options.timeout`; a
/// timeout also cancels `cancel` so other holders of the token stop waiting.
pub async fn fetch_suggestions<S: EventSource>(
    source: &S,
    keywords: &KeywordSet,
    format: &EventFormat,
    options: &FetchOptions,
    cancel: &CancellationToken,
) -> FileMoverResult<Vec<Suggestion>> {
    let range = DateRange::recent(options.window_days);
    let fetch = tokio::time::timeout(options.timeout, source.list_events(&range, options.max_results));

    let events = tokio::select! {
        _ = cancel.cancelled() => return Err(FileMoverError::Cancelled),
        result = fetch => match result {
            Ok(events) => events?,
            Err(_) => {
                cancel.cancel();
                tracing::warn!(timeout_secs = options.timeout.as_secs(), "calendar fetch timed out");
                return Err(FileMoverError::ProviderTimeout(options.timeout.as_secs()));
            }
        },
    };

    tracing::debug!(fetched = events.len(), "fetched calendar events");
    suggestions(&events, keywords, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::EventTime;
    use chrono::NaiveDate;

    struct StaticSource(Vec<CandidateEvent>);

    impl EventSource for StaticSource {
        async fn list_events(
            &self,
            _range: &DateRange,
            max_results: usize,
        ) -> FileMoverResult<Vec<CandidateEvent>> {
            Ok(self.0.iter().take(max_results).cloned().collect())
        }
    }

    struct SlowSource;

    impl EventSource for SlowSource {
        async fn list_events(
            &self,
            _range: &DateRange,
            _max_results: usize,
        ) -> FileMoverResult<Vec<CandidateEvent>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }
    }

    fn event(title: &str, description: Option<&str>, day: u32) -> CandidateEvent {
        CandidateEvent::new(
            title,
            description.map(str::to_string),
            EventTime::Date(NaiveDate::from_ymd_opt(2025, 5, day).unwrap()),
        )
    }

    fn keywords() -> KeywordSet {
        KeywordSet::new(vec!["kemo".into(), "撮影".into()])
    }

    #[test]
    fn test_suggestions_filter_and_format() {
        let events = vec![
            event("Kemono Meetup", None, 29),
            event("Birthday", None, 10),
            event("Park", Some("撮影会"), 3),
        ];
        let format = EventFormat::parse("{date:%Y-%m-%d}_{event}").unwrap();

        let names: Vec<String> = suggestions(&events, &keywords(), &format)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();

        assert_eq!(names, vec!["2025-05-03_Park", "2025-05-29_Kemono Meetup"]);
    }

    #[tokio::test]
    async fn test_fetch_suggestions_from_source() {
        let source = StaticSource(vec![event("Kemono Meetup", None, 29), event("Dentist", None, 1)]);
        let suggestions = fetch_suggestions(
            &source,
            &keywords(),
            &EventFormat::default(),
            &FetchOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].name, "20250529_Kemono Meetup");
    }

    #[tokio::test]
    async fn test_timeout_cancels_token() {
        let cancel = CancellationToken::new();
        let options = FetchOptions {
            timeout: Duration::from_millis(50),
            ..FetchOptions::default()
        };

        let err = fetch_suggestions(&SlowSource, &keywords(), &EventFormat::default(), &options, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, FileMoverError::ProviderTimeout(_)));
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_before_fetch_completes() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = fetch_suggestions(
            &SlowSource,
            &keywords(),
            &EventFormat::default(),
            &FetchOptions::default(),
            &cancel,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, FileMoverError::Cancelled));
    }
}
