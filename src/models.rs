//! Data models for probe results and the analyzed report state.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// One probe attempt as written by the connectivity checker.
///
/// Every field is optional. A value of the wrong JSON type is read as absent
/// rather than rejected, and so is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawResult {
    #[serde(default, deserialize_with = "lenient")]
    pub success: Option<bool>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub host: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub target_ip: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub ip_version: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub protocol: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status_code: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub latency_ms: Option<Number>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub server_header: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub error_msg: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub timestamp: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = lenient(deserializer)?;
    Ok(opt.filter(|s| !s.is_empty()))
}

pub const UNKNOWN: &str = "Unknown";
pub const NO_PROTOCOL: &str = "none";
pub const NO_SERVER_HEADER: &str = "N/A";
pub const NO_ERROR_MESSAGE: &str = "No error message";

/// A failed probe with every optional field filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    /// 1-based position of the source record in the input.
    pub index: usize,
    pub host: String,
    pub target_ip: String,
    pub ip_version: String,
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
    pub latency_ms: Number,
    pub server_header: String,
    pub error_msg: String,
    pub timestamp: String,
    #[serde(skip)]
    pub has_error_msg: bool,
}

impl FailureRecord {
    /// Applies the default for every absent field of `raw`.
    ///
    /// `now` stands in for a missing timestamp.
    pub fn from_raw(index: usize, raw: &RawResult, now: DateTime<Utc>) -> Self {
        let or_default =
            |field: &Option<String>, default: &str| field.clone().unwrap_or_else(|| default.into());

        Self {
            index,
            host: or_default(&raw.host, UNKNOWN),
            target_ip: or_default(&raw.target_ip, UNKNOWN),
            ip_version: or_default(&raw.ip_version, UNKNOWN),
            protocol: or_default(&raw.protocol, NO_PROTOCOL),
            status_code: raw.status_code,
            latency_ms: raw.latency_ms.clone().unwrap_or_else(|| Number::from(0)),
            server_header: or_default(&raw.server_header, NO_SERVER_HEADER),
            error_msg: or_default(&raw.error_msg, NO_ERROR_MESSAGE),
            timestamp: raw
                .timestamp
                .clone()
                .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            has_error_msg: raw.error_msg.is_some(),
        }
    }

    /// The error text as supplied, `None` when the probe reported none.
    pub fn error_text(&self) -> Option<&str> {
        self.has_error_msg.then_some(self.error_msg.as_str())
    }
}

/// Run-level counts.
///
/// `success + failed` may be less than `total`: records without a usable
/// `success` flag are counted in `total` only.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Statistics {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// Percentage of failed records, two decimals. Zero for an empty run.
    pub failure_rate: f64,
}

impl Statistics {
    pub fn new(total: usize, success: usize, failed: usize) -> Self {
        let failure_rate = if total == 0 {
            0.0
        } else {
            (failed as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
        };
        Self {
            total,
            success,
            failed,
            failure_rate,
        }
    }

    /// Failure rate with exactly two decimals, e.g. `75.00`.
    pub fn failure_rate_display(&self) -> String {
        format!("{:.2}", self.failure_rate)
    }
}

/// Where and when a report was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunInfo {
    pub generated_at: DateTime<Utc>,
    /// File name of the input, without its directory.
    pub source_file: String,
}

/// Counts keyed by first occurrence.
///
/// Serializes as a JSON object whose keys keep insertion order. Keys with a
/// zero count are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K> {
    entries: Vec<(K, usize)>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        self.add_count(key, 1);
    }

    pub fn add_count(&mut self, key: K, count: usize) {
        if count == 0 {
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += count,
            None => self.entries.push((key, count)),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> usize
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map_or(0, |(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.entries.iter().map(|(k, n)| (k, *n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }
}

impl<K: PartialEq> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}

impl<K: Serialize> Serialize for Tally<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}
