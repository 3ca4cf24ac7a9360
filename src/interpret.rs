//! Interpretation of World Bank API responses.
//!
//! The API wraps results in a two-element array, `[meta, data]`, but also answers with
//! `[{"message": [...]}]` for errors and "no data", with `[meta, null]` for zero matches, and
//! with HTML pages for malformed requests. Everything here turns those shapes into a
//! [`FetchOutcome`] and never panics.

use crate::error::{ErrorKind, FetchError};
use crate::models::{FetchOutcome, IndicatorRecord, Meta, ObservedValue};
use reqwest::StatusCode;
use serde_json::Value;

const EXCERPT_CHARS: usize = 200;

/// Interpret a raw response body.
///
/// Checks run in order: content type, HTTP status, JSON syntax, response shape. A non-JSON
/// content type is reported as such even when the body would parse.
///
/// ### Example
/// ```
/// use gini_rs::{FetchOutcome, interpret};
///
/// let body = r#"[{"page":1,"total":0},null]"#;
/// assert_eq!(interpret::parse(body, "application/json", 200), FetchOutcome::Empty);
/// ```
pub fn parse(body: &str, content_type: &str, status: u16) -> FetchOutcome {
    if !is_json_content_type(content_type) {
        return FetchOutcome::Failure(FetchError::new(
            ErrorKind::NonJsonResponse,
            non_json_detail(body, content_type),
        ));
    }

    if status >= 400 {
        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown status");
        return FetchOutcome::Failure(FetchError::new(
            ErrorKind::HttpError(status),
            format!("HTTP {} {}", status, reason),
        ));
    }

    let v: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("invalid JSON body: {}", excerpt(body));
            return FetchOutcome::Failure(FetchError::new(
                ErrorKind::MalformedJson,
                format!("could not decode the server's response: {}", e),
            ));
        }
    };

    interpret_value(&v)
}

fn interpret_value(v: &Value) -> FetchOutcome {
    let arr = match v.as_array() {
        Some(arr) => arr,
        None => {
            return match v.get("message") {
                Some(message) => classify_message(message),
                None => unexpected("top-level value is not an array"),
            };
        }
    };

    let Some(first) = arr.first() else {
        return unexpected("top-level array is empty");
    };

    // If first element has "message", it is either "no data" or an API error.
    if let Some(message) = first.get("message") {
        return classify_message(message);
    }

    match arr.as_slice() {
        [_, Value::Null] => FetchOutcome::Empty,
        [meta, Value::Array(rows)] => {
            if let Ok(meta) = serde_json::from_value::<Meta>(meta.clone()) {
                if meta.pages > 1 {
                    log::warn!(
                        "response has {} pages, only page {} was requested",
                        meta.pages,
                        meta.page
                    );
                }
            }
            if rows.is_empty() {
                FetchOutcome::Empty
            } else {
                FetchOutcome::Success(rows.iter().map(IndicatorRecord::from).collect())
            }
        }
        [_, other] => unexpected(format!(
            "data element is {} instead of an array",
            json_type_name(other)
        )),
        [meta] if reports_zero_total(meta) => FetchOutcome::Empty,
        _ => {
            log::warn!(
                "unrecognized response structure (length {}), assuming no data",
                arr.len()
            );
            FetchOutcome::Empty
        }
    }
}

fn reports_zero_total(meta: &Value) -> bool {
    meta.get("total").is_some()
        && serde_json::from_value::<Meta>(meta.clone())
            .map(|m| m.total == 0)
            .unwrap_or(false)
}

/// `message` is usually `[{"id": "120", "key": "Invalid value", "value": "..."}]`.
fn classify_message(message: &Value) -> FetchOutcome {
    let texts: Vec<String> = match message {
        Value::Array(items) => items.iter().map(message_text).collect(),
        other => vec![message_text(other)],
    };
    let no_data = texts.iter().any(|t| {
        let t = t.to_ascii_lowercase();
        t.contains("no data") || t.contains("no matches")
    });
    if no_data {
        log::debug!("API reported no data: {}", texts.join("; "));
        return FetchOutcome::Empty;
    }
    FetchOutcome::Failure(FetchError::new(ErrorKind::ApiError, texts.join("\n")))
}

fn message_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        _ => item
            .get("value")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

fn unexpected(detail: impl Into<String>) -> FetchOutcome {
    FetchOutcome::Failure(FetchError::new(ErrorKind::UnexpectedShape, detail))
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `application/json`, `text/json` and `application/*+json`, ignoring parameters and case.
pub fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime == "text/json" || mime.ends_with("+json")
}

fn non_json_detail(body: &str, content_type: &str) -> String {
    if body.contains("Invalid format") {
        "invalid format requested or resource not found".to_string()
    } else if body.contains("Invalid value") {
        "invalid country code?".to_string()
    } else {
        let shown = if content_type.trim().is_empty() {
            "<none>"
        } else {
            content_type
        };
        format!(
            "received non-JSON response (Content-Type: {}): {}",
            shown,
            excerpt(body)
        )
    }
}

fn excerpt(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Pick the most recent record with a finite value and an integer year.
///
/// On equal years the record encountered last wins. The returned copy has `country_name`
/// filled from the nested country object, falling back to the country code.
pub fn select_latest(records: &[IndicatorRecord]) -> Option<IndicatorRecord> {
    let mut latest: Option<(i32, &IndicatorRecord)> = None;
    for record in records {
        let (Some(year), Some(_)) = (record.year(), record.numeric_value()) else {
            if record.value.is_some() || record.period.is_some() {
                log::warn!("skipping record with invalid year/value: {:?}", record);
            }
            continue;
        };
        if latest.is_none_or(|(best, _)| year >= best) {
            latest = Some((year, record));
        }
    }
    latest.map(|(_, record)| {
        let mut out = record.clone();
        out.country_name = record.display_name();
        out
    })
}

/// History lines, oldest first, for records that carry both a period and a value.
///
/// Values that are present but not numeric are shown verbatim with an `(invalid?)` marker.
pub fn format_history(records: &[IndicatorRecord]) -> Vec<String> {
    let mut rows: Vec<(&str, &ObservedValue)> = records
        .iter()
        .filter_map(|r| {
            let period = r.period.as_deref().filter(|p| !p.trim().is_empty())?;
            Some((period, r.value.as_ref()?))
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    rows.into_iter()
        .map(|(period, value)| match value.as_f64() {
            Some(x) => format!("Year: {}, Index: {:.2}", period, x),
            None => format!("Year: {}, Index: {} (invalid?)", period, value),
        })
        .collect()
}

/// Every record as-is, sorted by period (records without one first).
///
/// Used when no record qualifies for [`select_latest`] and the caller still wants to show
/// what came back.
pub fn format_raw_history(records: &[IndicatorRecord]) -> Vec<String> {
    let mut rows: Vec<&IndicatorRecord> = records.iter().collect();
    rows.sort_by(|a, b| a.period.as_deref().cmp(&b.period.as_deref()));
    rows.into_iter()
        .map(|r| {
            let value = r
                .value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "N/A".into());
            format!(
                "Year: {}, Index: {}",
                r.period.as_deref().unwrap_or("N/A"),
                value
            )
        })
        .collect()
}
