//! RSVP records as written by the submission path and read back from the store
//!
//! Writes use the strict [`NewRsvp`] shape. Reads go through [`RsvpRecord`],
//! which tolerates the looser shapes older or hand-edited objects may have.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Prefix shared by every RSVP object key; the prefix scan is the only index
pub const KEY_PREFIX: &str = "rsvp-";

/// Length of the random part of a key
const KEY_SUFFIX_LEN: usize = 12;

/// Message returned when a submission lacks a name or a response
pub const VALIDATION_MESSAGE: &str = "name and response required";

/// Generate a store key of the form `rsvp-<millis>-<suffix>`
pub fn generate_key(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!("{}{}-{}", KEY_PREFIX, now.timestamp_millis(), suffix)
}

/// Incoming RSVP payload, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RsvpSubmission {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub response: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
}

impl RsvpSubmission {
    pub fn new(name: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            response: Some(response.into()),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Validate the payload and turn it into a record with a fresh key.
    ///
    /// A missing or blank timestamp is replaced with `now`.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<NewRsvp> {
        let name = trimmed(self.name);
        let response = trimmed(self.response);

        let (Some(name), Some(response)) = (name, response) else {
            return Err(Error::Validation(VALIDATION_MESSAGE.to_string()));
        };

        let timestamp = trimmed(self.timestamp)
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));

        Ok(NewRsvp {
            id: generate_key(now),
            name,
            response,
            timestamp,
        })
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A validated record, exactly as it is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRsvp {
    pub name: String,
    pub response: String,
    pub timestamp: String,
    pub id: String,
}

/// A record read back from the store.
///
/// The typed fields drive classification and display. Serializing a record
/// always emits the stored object untouched, unknown fields included.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RsvpRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub response: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,

    /// Only honoured when stored as a real boolean
    #[serde(default, deserialize_with = "strict_bool")]
    pub attending: Option<bool>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub fullname: Option<String>,

    #[serde(
        rename = "firstName",
        default,
        deserialize_with = "lenient_string"
    )]
    pub first_name: Option<String>,

    /// The object exactly as stored; filled in by [`RsvpRecord::from_slice`]
    #[serde(skip)]
    pub raw: Map<String, Value>,
}

impl RsvpRecord {
    /// Parse a stored object. Anything other than a JSON object is rejected.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        let raw = match value {
            Value::Object(raw) => raw,
            other => {
                return Err(Error::Other(anyhow::anyhow!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut record: RsvpRecord = serde_json::from_value(Value::Object(raw.clone()))?;
        record.raw = raw;
        Ok(record)
    }

    /// The record's timestamp, if it parses
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(|ts| parse_timestamp(ts.trim()))
    }

    /// First non-empty name-like field
    pub fn display_name(&self) -> Option<&str> {
        [&self.name, &self.fullname, &self.first_name]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|name| !name.is_empty())
    }
}

impl Serialize for RsvpRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

/// RFC 3339 first, then ISO-8601 without an offset (read as UTC), then a bare date
fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(ts) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = ts
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            ts.parse::<NaiveDate>()
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Some(Utc.from_utc_datetime(&naive))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Accept strings, numbers and booleans as text; anything else reads as absent
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn strict_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-09-20T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_key_format() {
        let key = generate_key(now());
        let rest = key.strip_prefix(KEY_PREFIX).expect("missing prefix");
        let (millis, suffix) = rest.split_once('-').expect("missing suffix");

        assert_eq!(millis, now().timestamp_millis().to_string());
        assert_eq!(suffix.len(), KEY_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_keys_unique_within_same_millisecond() {
        let keys: HashSet<String> = (0..10_000).map(|_| generate_key(now())).collect();
        assert_eq!(keys.len(), 10_000);
    }

    #[test]
    fn test_submission_into_record() {
        let rsvp = RsvpSubmission::new("  Anna ", " Ja ")
            .with_timestamp("2025-09-20T12:00:00Z")
            .into_record(now())
            .unwrap();

        assert_eq!(rsvp.name, "Anna");
        assert_eq!(rsvp.response, "Ja");
        assert_eq!(rsvp.timestamp, "2025-09-20T12:00:00Z");
        assert!(rsvp.id.starts_with("rsvp-"));
    }

    #[test]
    fn test_submission_fills_missing_timestamp() {
        let rsvp = RsvpSubmission::new("Anna", "Ja")
            .with_timestamp("   ")
            .into_record(now())
            .unwrap();

        assert_eq!(rsvp.timestamp, "2025-09-20T12:00:00.000Z");
    }

    #[test]
    fn test_submission_requires_name_and_response() {
        let cases = [
            RsvpSubmission::new("", "Ja"),
            RsvpSubmission::new("   ", "Ja"),
            RsvpSubmission::new("Anna", ""),
            RsvpSubmission::default(),
        ];

        for submission in cases {
            let err = submission.into_record(now()).unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
            assert_eq!(err.to_string(), "name and response required");
        }
    }

    #[test]
    fn test_new_rsvp_serializes_core_fields() {
        let rsvp = RsvpSubmission::new("Anna", "Ja").into_record(now()).unwrap();
        let json: Value = serde_json::to_value(&rsvp).unwrap();

        assert_eq!(json["name"], "Anna");
        assert_eq!(json["response"], "Ja");
        assert_eq!(json["id"], rsvp.id.as_str());
        assert_eq!(json.as_object().unwrap().len(), 4);

        let read_back = RsvpRecord::from_slice(&serde_json::to_vec(&rsvp).unwrap()).unwrap();
        assert_eq!(read_back.id.as_deref(), Some(rsvp.id.as_str()));
        assert_eq!(read_back.name.as_deref(), Some("Anna"));
        assert_eq!(serde_json::to_value(&read_back).unwrap(), json);
    }

    #[test]
    fn test_record_tolerates_loose_shapes() {
        let record = RsvpRecord::from_slice(
            br#"{"name": "Bob", "response": 1, "attending": "yes", "extra": [1, 2]}"#,
        )
        .unwrap();

        assert_eq!(record.response.as_deref(), Some("1"));
        assert_eq!(record.attending, None);
        assert_eq!(record.id, None);
    }

    #[test]
    fn test_record_serializes_stored_object_unchanged() {
        let stored = br#"{"guest": "Dirk", "response": 1, "attending": "yes", "plusOnes": 2}"#;
        let record = RsvpRecord::from_slice(stored).unwrap();

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::from_slice::<Value>(stored).unwrap()
        );
    }

    #[test]
    fn test_record_rejects_non_objects() {
        assert!(RsvpRecord::from_slice(b"not json").is_err());
        assert!(RsvpRecord::from_slice(b"[1, 2, 3]").is_err());
        assert!(RsvpRecord::from_slice(b"\"rsvp\"").is_err());
        assert!(RsvpRecord::from_slice(b"null").is_err());
    }

    #[test]
    fn test_parsed_timestamp() {
        let mut record = RsvpRecord {
            timestamp: Some("2025-09-20T14:00:00+02:00".to_string()),
            ..Default::default()
        };
        assert_eq!(record.parsed_timestamp(), Some(now()));

        record.timestamp = Some("yesterday".to_string());
        assert_eq!(record.parsed_timestamp(), None);
    }

    #[test]
    fn test_parsed_timestamp_without_offset_is_utc() {
        let parse = |ts: &str| {
            RsvpRecord {
                timestamp: Some(ts.to_string()),
                ..Default::default()
            }
            .parsed_timestamp()
        };

        assert_eq!(parse("2025-09-20T12:00:00.000"), Some(now()));
        assert_eq!(parse("2025-09-20T12:00:00"), Some(now()));
        assert_eq!(parse("2025-09-20T12:00"), Some(now()));
        assert_eq!(
            parse("2025-09-20"),
            Some(Utc.with_ymd_and_hms(2025, 9, 20, 0, 0, 0).unwrap())
        );
        assert_eq!(parse("2025-13-40"), None);
    }

    #[test]
    fn test_display_name_fallbacks() {
        let record = RsvpRecord::from_slice(br#"{"name": "", "firstName": "Carla"}"#).unwrap();
        assert_eq!(record.display_name(), Some("Carla"));

        assert_eq!(RsvpRecord::default().display_name(), None);
    }
}
