use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Sentinel the device reports when a sensor cannot produce a value
pub const PLACEHOLDER: &str = "--";

/// A single metric as reported by the device: a number, a placeholder
/// string, nothing at all, or any other JSON the device chose to send
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
    Other(Value),
}

impl MetricValue {
    pub fn placeholder() -> Self {
        MetricValue::Text(PLACEHOLDER.to_string())
    }

    /// Numeric interpretation used for aggregation. Strings holding a
    /// decimal number count; placeholders and non-finite values do not.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            MetricValue::Number(n) => *n,
            MetricValue::Text(s) => s.trim().parse::<f64>().ok()?,
            MetricValue::Missing | MetricValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
            MetricValue::Missing => Ok(()),
            MetricValue::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Device status classification. Unknown device states are kept verbatim;
/// a non-string status is kept as its JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum Status {
    Safe,
    Danger,
    Offline,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Safe => "SAFE",
            Status::Danger => "DANGER",
            Status::Offline => "OFFLINE",
            Status::Other(s) => s,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Other("UNKNOWN".to_string())
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match value.as_str() {
            "SAFE" => Status::Safe,
            "DANGER" => Status::Danger,
            "OFFLINE" => Status::Offline,
            _ => Status::Other(value),
        }
    }
}

impl From<Value> for Status {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Status::from(s),
            Value::Null => Status::default(),
            other => Status::Other(other.to_string()),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body returned by the device's `GET /data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePayload {
    #[serde(default)]
    pub temp: MetricValue,
    #[serde(default)]
    pub hum: MetricValue,
    #[serde(default)]
    pub soil: MetricValue,
    #[serde(default)]
    pub status: Status,
}

/// A device payload stamped with the time the service received it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temp: MetricValue,
    pub hum: MetricValue,
    pub soil: MetricValue,
    pub status: Status,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn stamp(payload: DevicePayload, at: DateTime<Utc>) -> Self {
        Self {
            temp: payload.temp,
            hum: payload.hum,
            soil: payload.soil,
            status: payload.status,
            timestamp: at,
        }
    }
}

/// Placeholder handed back when the device could not be read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineReading {
    pub error: String,
    pub message: String,
    pub temp: MetricValue,
    pub hum: MetricValue,
    pub soil: MetricValue,
    pub status: Status,
}

impl OfflineReading {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: "device not reachable".to_string(),
            message: message.into(),
            temp: MetricValue::placeholder(),
            hum: MetricValue::placeholder(),
            soil: MetricValue::placeholder(),
            status: Status::Offline,
        }
    }
}

/// RFC 3339 timestamps in UTC with millisecond precision
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
