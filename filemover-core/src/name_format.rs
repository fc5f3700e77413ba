//! Folder-name templates.
//!
//! A template mixes literal text with two placeholders:
//!
//! - `{event}`: the event title, inserted verbatim
//! - `{date}` or `{date:<strftime>}`: the event date, `%Y%m%d` when no pattern is given
//!
//! For example `"{date:%Y-%m-%d}_{event}"` renders to `"2025-05-29_Show"`.
//! Validation accepts `{{` and `}}` as escaped braces, but rendering leaves
//! them as written.

use std::fmt::{self, Write};
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DATE_PATTERN, DEFAULT_EVENT_FORMAT, ILLEGAL_PATH_CHARS};
use crate::error::{FileMoverError, FileMoverResult};

static DATE_WITH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{date:([^{}]+)\}").expect("static regex"));

static FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?::[^{}]*)?$").expect("static regex"));

/// Render `template` for an event named `event` starting at `when`.
///
/// Only the first `{date:<pattern>}` form is honoured; every copy of that exact
/// token is replaced. Without one, bare `{date}` tokens get `YYYYMMDD`.
pub fn format(template: &str, event: &str, when: &NaiveDateTime) -> FileMoverResult<String> {
    let rendered = match DATE_WITH_PATTERN.captures(template) {
        Some(caps) => {
            let date = render_date(when, &caps[1])?;
            template.replace(&caps[0], &date)
        }
        None => template.replace("{date}", &render_date(when, DEFAULT_DATE_PATTERN)?),
    };
    Ok(rendered.replace("{event}", event))
}

/// Returns true if `template` may be saved as the event format.
pub fn validate(template: &str) -> bool {
    check(template).is_ok()
}

/// Like [`validate`], but says which rule was broken.
pub fn check(template: &str) -> FileMoverResult<()> {
    let segments = parse_template(template).map_err(FileMoverError::Validation)?;

    let mut events = 0;
    let mut dates = 0;

    for segment in &segments {
        match segment {
            Segment::Literal(text) => reject_illegal_chars(text)?,
            Segment::Field(body) => {
                if !FIELD.is_match(body) {
                    return Err(FileMoverError::Validation(format!(
                        "'{{{body}}}' is not a valid placeholder"
                    )));
                }
                let (name, pattern) = match body.split_once(':') {
                    Some((name, pattern)) => (name, Some(pattern)),
                    None => (*body, None),
                };
                if let Some(pattern) = pattern {
                    reject_illegal_chars(pattern)?;
                }
                match name {
                    "event" => events += 1,
                    "date" => {
                        dates += 1;
                        if let Some(pattern) = pattern {
                            check_date_pattern(pattern)?;
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    if events == 0 && dates == 0 {
        return Err(FileMoverError::Validation(
            "the format must contain {event} or {date}".into(),
        ));
    }
    if events > 1 || dates > 1 {
        return Err(FileMoverError::Validation(
            "{event} and {date} may each appear only once".into(),
        ));
    }

    Ok(())
}

/// A validated folder-name template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventFormat(String);

impl EventFormat {
    pub fn parse(template: impl Into<String>) -> FileMoverResult<Self> {
        let template = template.into();
        check(&template)?;
        Ok(EventFormat(template))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, event: &str, when: &NaiveDateTime) -> FileMoverResult<String> {
        format(&self.0, event, when)
    }
}

impl Default for EventFormat {
    fn default() -> Self {
        EventFormat(DEFAULT_EVENT_FORMAT.to_string())
    }
}

impl TryFrom<String> for EventFormat {
    type Error = FileMoverError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EventFormat::parse(value)
    }
}

impl From<EventFormat> for String {
    fn from(format: EventFormat) -> Self {
        format.0
    }
}

impl fmt::Display for EventFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    /// Text between `{` and `}`, e.g. `date:%Y`.
    Field(&'a str),
}

/// Split a template into literal text and placeholder fields.
fn parse_template(template: &str) -> Result<Vec<Segment<'_>>, String> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut chars = template.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '{' | '}' if chars.peek().map(|&(_, next)| next) == Some(c) => {
                // Escaped brace: keep one, drop the other.
                segments.push(Segment::Literal(&template[literal_start..=i]));
                chars.next();
                literal_start = i + 2;
            }
            '{' => {
                segments.push(Segment::Literal(&template[literal_start..i]));
                let body_start = i + 1;
                let body_end = loop {
                    match chars.next() {
                        Some((j, '}')) => break j,
                        Some((_, '{')) => return Err("nested placeholders are not supported".into()),
                        Some(_) => {}
                        None => return Err("unclosed '{' in format".into()),
                    }
                };
                segments.push(Segment::Field(&template[body_start..body_end]));
                literal_start = body_end + 1;
            }
            '}' => return Err("single '}' encountered in format".into()),
            _ => {}
        }
    }
    segments.push(Segment::Literal(&template[literal_start..]));
    segments.retain(|s| *s != Segment::Literal(""));

    Ok(segments)
}

fn reject_illegal_chars(text: &str) -> FileMoverResult<()> {
    match text.chars().find(|c| ILLEGAL_PATH_CHARS.contains(c)) {
        Some(c) => Err(FileMoverError::Validation(format!(
            "'{c}' cannot be used in a folder name"
        ))),
        None => Ok(()),
    }
}

fn date_items(pattern: &str) -> FileMoverResult<Vec<Item<'_>>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(FileMoverError::Validation(format!(
            "'{pattern}' is not a valid date pattern"
        )));
    }
    Ok(items)
}

/// Parse `pattern` and render it once against a fixed date.
fn check_date_pattern(pattern: &str) -> FileMoverResult<()> {
    render_date(&NaiveDateTime::default(), pattern).map(|_| ())
}

fn render_date(when: &NaiveDateTime, pattern: &str) -> FileMoverResult<String> {
    let items = date_items(pattern)?;
    let mut out = String::new();
    // Fails for patterns that need data a naive date lacks, like `%z`.
    write!(out, "{}", when.format_with_items(items.iter())).map_err(|_| {
        FileMoverError::Validation(format!("'{pattern}' cannot be rendered for this date"))
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn may_29() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 29)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_format_with_date_pattern() {
        let name = format("{date:%Y-%m-%d}_{event}", "Show", &may_29()).unwrap();
        assert_eq!(name, "2025-05-29_Show");
    }

    #[test]
    fn test_format_with_bare_date() {
        let name = format("{date}_{event}", "Show", &may_29()).unwrap();
        assert_eq!(name, "20250529_Show");
    }

    #[test]
    fn test_format_event_only() {
        assert_eq!(format("{event}", "撮影会", &may_29()).unwrap(), "撮影会");
    }

    #[test]
    fn test_format_event_text_is_literal() {
        let name = format("{date}_{event}", "{date}", &may_29()).unwrap();
        assert_eq!(name, "20250529_{date}");
    }

    #[test]
    fn test_format_only_first_pattern_form() {
        let name = format("{date:%Y}-{date:%m}", "x", &may_29()).unwrap();
        assert_eq!(name, "2025-{date:%m}");
    }

    #[test]
    fn test_format_rejects_bad_pattern() {
        assert!(format("{date:%Q}_{event}", "x", &may_29()).is_err());
    }

    #[test]
    fn test_validate_requires_placeholder() {
        assert!(!validate("photos"));
        assert!(!validate("{name}_photos"));
        assert!(!validate(""));
        assert!(validate("{event}"));
        assert!(validate("{date}"));
        assert!(validate("{date:%Y-%m-%d}"));
        assert!(validate("{date:%Y-%m-%d}_{event}"));
    }

    #[test]
    fn test_validate_rejects_illegal_chars() {
        for c in ILLEGAL_PATH_CHARS {
            assert!(!validate(&std::format!("{{date}}_{{event}}{c}")), "{c} accepted");
        }
        assert!(!validate("{date:%H:%M}_{event}"));
        assert!(!validate("{date:%Y/%m}_{event}"));
    }

    #[test]
    fn test_validate_rejects_syntax_errors() {
        assert!(!validate("{event"));
        assert!(!validate("event}"));
        assert!(!validate("{}_{event}"));
        assert!(!validate("{ev ent}_{date}"));
        assert!(!validate("{9x}_{event}"));
        assert!(!validate("{date:{x}}_{event}"));
    }

    #[test]
    fn test_validate_rejects_patterns_needing_an_offset() {
        assert!(!validate("{date:%z}_{event}"));
        assert!(!validate("{date:%Y%m%d%Z}_{event}"));
        assert!(check("{date:%Y%m%d%z}_{event}").is_err());
        assert!(EventFormat::parse("{date:%Y%m%d%z}_{event}").is_err());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        assert!(!validate("{event}_{event}"));
        assert!(!validate("{date}_{date:%Y}"));
    }

    #[test]
    fn test_validate_allows_escaped_braces() {
        assert!(validate("{{{event}}}"));
        assert_eq!(
            parse_template("{{{event}}}").unwrap(),
            vec![
                Segment::Literal("{"),
                Segment::Field("event"),
                Segment::Literal("}"),
            ]
        );
    }

    #[test]
    fn test_format_leaves_escaped_braces_as_written() {
        assert_eq!(format("{{{event}}}", "Show", &may_29()).unwrap(), "{{Show}}");
    }

    #[test]
    fn test_event_format_serde_validates() {
        let ok: EventFormat = serde_json::from_str("\"{date}_{event}\"").unwrap();
        assert_eq!(ok.as_str(), "{date}_{event}");
        assert!(serde_json::from_str::<EventFormat>("\"no placeholders\"").is_err());
    }
}
