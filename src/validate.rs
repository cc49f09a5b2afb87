//! Record validation at the stream boundary.
//!
//! Turns one raw text record into a [`StreamInput`]. A record is valid when
//! it is a JSON object carrying `created_time`, `actor` and `target`, and
//! every value conforms to the schema:
//!
//! | Field | Rule |
//! |-------|------|
//! | `created_time` | string in `%Y-%m-%dT%H:%M:%SZ`, UTC, strictly between floor and upper bound |
//! | `actor`, `target` | string of 5-25 characters, starts with a letter, only letters, digits, `-`, `_` |
//!
//! `actor == target` is accepted.

use chrono::{NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use crate::types::{InteractionEvent, NodeKey, StreamInput};
use crate::{TIMESTAMP_FORMAT, WINDOW_FLOOR};

/// Minimum key length in characters.
pub const MIN_KEY_LEN: usize = 5;
/// Maximum key length in characters.
pub const MAX_KEY_LEN: usize = 25;

/// Why a record was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Record is not valid JSON.
    #[error("Malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Record is JSON but not an object.
    #[error("Record is not a JSON object")]
    NotAnObject,
    /// A required field is missing.
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    /// A field has the wrong JSON type.
    #[error("Field {field} must be a string")]
    NotAString {
        /// Field name.
        field: &'static str,
    },
    /// Timestamp does not match the expected format.
    #[error("Unparsable created_time {value:?}: {source}")]
    BadTimestamp {
        /// Raw value.
        value: String,
        /// Parser error.
        source: chrono::ParseError,
    },
    /// Timestamp outside the accepted open interval.
    #[error("created_time {timestamp} outside ({floor}, {upper:?})")]
    TimestampOutOfRange {
        /// Parsed timestamp.
        timestamp: i64,
        /// Exclusive lower bound.
        floor: i64,
        /// Exclusive upper bound, if enforced.
        upper: Option<i64>,
    },
    /// Entity key does not conform to the key rules.
    #[error("Field {field} has invalid key {value:?}")]
    BadKey {
        /// Field name.
        field: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Validator for raw event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventValidator {
    floor: i64,
    upper: Option<i64>,
}

impl EventValidator {
    /// Create a validator accepting timestamps in `(floor, upper)`.
    ///
    /// `upper = None` disables the upper bound, for live streams.
    pub fn new(floor: i64, upper: Option<i64>) -> Self {
        Self { floor, upper }
    }

    /// Validator bounded above by the current wall-clock time.
    pub fn bounded_by_now(floor: i64) -> Self {
        Self::new(floor, Some(Utc::now().timestamp()))
    }

    /// Exclusive upper bound, if any.
    pub fn upper(&self) -> Option<i64> {
        self.upper
    }

    /// Classify one record. Never fails: rejections become `Invalid`.
    pub fn classify(&self, record: &str) -> StreamInput {
        if record.trim().is_empty() {
            return StreamInput::Blank;
        }

        match self.validate(record) {
            Ok(event) => StreamInput::Event(event),
            Err(e) => {
                warn!(error = %e, "rejected record");
                StreamInput::Invalid
            }
        }
    }

    /// Parse and validate one non-blank record.
    pub fn validate(&self, record: &str) -> Result<InteractionEvent, ValidationError> {
        let value: Value = serde_json::from_str(record)?;
        let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

        let created_time = required(object, "created_time")?;
        let actor = required(object, "actor")?;
        let target = required(object, "target")?;

        let timestamp = self.check_timestamp(as_str(created_time, "created_time")?)?;
        let actor = check_key(as_str(actor, "actor")?, "actor")?;
        let target = check_key(as_str(target, "target")?, "target")?;

        Ok(InteractionEvent {
            created_time: timestamp,
            actor,
            target,
        })
    }

    fn check_timestamp(&self, raw: &str) -> Result<i64, ValidationError> {
        let timestamp = parse_timestamp(raw)?;

        let above_floor = timestamp > self.floor;
        let below_upper = self.upper.map_or(true, |upper| timestamp < upper);

        if above_floor && below_upper {
            Ok(timestamp)
        } else {
            Err(ValidationError::TimestampOutOfRange {
                timestamp,
                floor: self.floor,
                upper: self.upper,
            })
        }
    }
}

impl Default for EventValidator {
    fn default() -> Self {
        Self::bounded_by_now(WINDOW_FLOOR)
    }
}

/// Parse a `%Y-%m-%dT%H:%M:%SZ` timestamp into Unix seconds (UTC).
pub fn parse_timestamp(raw: &str) -> Result<i64, ValidationError> {
    let naive = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|source| {
        ValidationError::BadTimestamp {
            value: raw.to_string(),
            source,
        }
    })?;
    Ok(Utc.from_utc_datetime(&naive).timestamp())
}

/// Whether `key` satisfies the entity key rules.
pub fn is_valid_key(key: &str) -> bool {
    let len = key.chars().count();
    if !(MIN_KEY_LEN..=MAX_KEY_LEN).contains(&len) {
        return false;
    }

    let mut chars = key.chars();
    let starts_with_letter = chars.next().map_or(false, char::is_alphabetic);

    starts_with_letter && chars.all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn required<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ValidationError> {
    object.get(field).ok_or(ValidationError::MissingField(field))
}

fn as_str<'a>(value: &'a Value, field: &'static str) -> Result<&'a str, ValidationError> {
    value.as_str().ok_or(ValidationError::NotAString { field })
}

fn check_key(raw: &str, field: &'static str) -> Result<NodeKey, ValidationError> {
    if is_valid_key(raw) {
        Ok(NodeKey::from(raw))
    } else {
        Err(ValidationError::BadKey {
            field,
            value: raw.to_string(),
        })
    }
}
