use crate::error::FetchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How to specify dates in API queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSpec {
    /// Single year like 2018
    Year(i32),
    /// Inclusive range like 2011..=2020
    Range { start: i32, end: i32 },
}

impl DateSpec {
    pub fn to_query_param(&self) -> String {
        match *self {
            DateSpec::Year(y) => y.to_string(),
            DateSpec::Range { start, end } => format!("{}:{}", start, end),
        }
    }

    /// Parse `YYYY` or `YYYY:YYYY`.
    pub fn parse(s: &str) -> Option<DateSpec> {
        let s = s.trim();
        if let Some((a, b)) = s.split_once(':') {
            let start = a.trim().parse::<i32>().ok()?;
            let end = b.trim().parse::<i32>().ok()?;
            Some(DateSpec::Range { start, end })
        } else {
            s.parse::<i32>().ok().map(DateSpec::Year)
        }
    }
}

impl Default for DateSpec {
    fn default() -> Self {
        DateSpec::Range {
            start: 2011,
            end: 2020,
        }
    }
}

impl fmt::Display for DateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_param())
    }
}

/// Metadata section returned by the API (position 0).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub page: u32,
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub pages: u32,
    /// Some responses encode `per_page` as a string, others as a number.
    /// Accept both and normalize to `u32`.
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub per_page: u32,
    #[serde(default, deserialize_with = "de_u32_from_string_or_number")]
    pub total: u32,
}

/// Serde helper: parse `u32` from either a JSON number, a string or `null` (as 0).
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a non-negative number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(|_| E::custom("value out of range for u32"))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<u32>().map_err(E::custom)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(0)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

/// Nested `{ "id": ..., "value": ... }` object the API uses for country and indicator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeName {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// An observation value as the API sent it.
///
/// The API normally sends numbers, but strings (`"40.7"`) and other JSON types have been
/// seen in the wild. Non-numeric text is kept verbatim so it can still be shown in a history
/// listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservedValue {
    Number(f64),
    Text(String),
}

impl ObservedValue {
    /// `None` for JSON `null`, otherwise the value (non-string, non-number JSON is kept as text).
    pub fn from_json(v: &Value) -> Option<Self> {
        match v {
            Value::Null => None,
            Value::Number(n) => Some(match n.as_f64() {
                Some(x) => ObservedValue::Number(x),
                None => ObservedValue::Text(n.to_string()),
            }),
            Value::String(s) => Some(ObservedValue::Text(s.clone())),
            other => Some(ObservedValue::Text(other.to_string())),
        }
    }

    /// Numeric interpretation; only finite numbers count.
    pub fn as_f64(&self) -> Option<f64> {
        let x = match self {
            ObservedValue::Number(x) => Some(*x),
            ObservedValue::Text(s) => s.trim().parse::<f64>().ok(),
        };
        x.filter(|x| x.is_finite())
    }
}

impl fmt::Display for ObservedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservedValue::Number(x) => write!(f, "{}", x),
            ObservedValue::Text(s) => f.write_str(s),
        }
    }
}

/// One observation of the indicator (one row of the API's data array).
///
/// Every field is optional: the API is loosely typed and a record with missing pieces is kept
/// (and reported as invalid) rather than dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    /// ISO alpha-3 code (`countryiso3code`); sometimes empty for aggregates.
    pub country_code: Option<String>,
    /// Nested country metadata as sent by the API.
    pub country: Option<CodeName>,
    /// Display name, filled in by [`crate::interpret::select_latest`].
    pub country_name: Option<String>,
    /// The year as sent (`date`), e.g. `"2018"`.
    pub period: Option<String>,
    pub value: Option<ObservedValue>,
}

impl IndicatorRecord {
    /// Integer year, when `period` holds one.
    pub fn year(&self) -> Option<i32> {
        self.period.as_deref()?.trim().parse::<i32>().ok()
    }

    /// Finite numeric value, when `value` holds one.
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.as_ref()?.as_f64()
    }

    /// Name from the nested country object if non-empty, else the record's country code.
    pub fn display_name(&self) -> Option<String> {
        self.country
            .as_ref()
            .and_then(|c| c.value.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.country_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
            .map(str::to_owned)
    }
}

impl From<&Value> for IndicatorRecord {
    fn from(v: &Value) -> Self {
        let text = |key: &str| match v.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self {
            country_code: text("countryiso3code"),
            country: v
                .get("country")
                .and_then(|c| serde_json::from_value::<CodeName>(c.clone()).ok()),
            country_name: None,
            period: text("date"),
            value: v.get("value").and_then(ObservedValue::from_json),
        }
    }
}

/// Result of interpreting one API response.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Records in the order the API returned them.
    Success(Vec<IndicatorRecord>),
    /// The API confirmed there is no data; not an error.
    Empty,
    Failure(FetchError),
}

/// Raw HTTP response handed from the fetcher to the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Value of the `Content-Type` header, empty when absent.
    pub content_type: String,
    pub body: String,
}
