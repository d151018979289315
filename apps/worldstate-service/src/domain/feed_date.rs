//! Feed date normalization.
//!
//! The upstream feed encodes instants as a nested document carrying a
//! string-encoded millisecond count:
//!
//! ```json
//! { "$date": { "$numberLong": "1760879282779" } }
//! ```
//!
//! [`normalize`] turns that shape into an absolute UTC instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Outer key of a feed date document.
const DATE_KEY: &str = "$date";

/// Inner key holding the millisecond count.
const NUMBER_LONG_KEY: &str = "$numberLong";

/// Marker prefix placed on serde errors raised by [`FeedInstant`] so the
/// decoder can tell timestamp faults from ordinary type mismatches.
pub const MALFORMED_TIMESTAMP_MARKER: &str = "malformed timestamp";

/// Reasons a feed date cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedDateError {
    /// The value is not a `{"$date": ...}` document.
    #[error("missing `$date` document")]
    MissingDate,

    /// The `$date` document has no `$numberLong` leaf.
    #[error("missing `$numberLong` leaf")]
    MissingNumberLong,

    /// The leaf is not an integer.
    #[error("`$numberLong` leaf {0:?} is not an integer")]
    NotAnInteger(String),

    /// The integer does not map to a representable instant.
    #[error("{0} ms is outside the representable range")]
    OutOfRange(i64),
}

/// Normalize a feed date document into a UTC instant.
///
/// # Errors
///
/// Returns [`FeedDateError`] when the nested structure is missing the
/// numeric leaf, the leaf is not an integer, or the value is out of range.
pub fn normalize(value: &Value) -> Result<DateTime<Utc>, FeedDateError> {
    let date = value.get(DATE_KEY).ok_or(FeedDateError::MissingDate)?;
    let leaf = date
        .get(NUMBER_LONG_KEY)
        .ok_or(FeedDateError::MissingNumberLong)?;

    let millis = match leaf {
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| FeedDateError::NotAnInteger(s.clone()))?,
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| FeedDateError::NotAnInteger(n.to_string()))?,
        other => return Err(FeedDateError::NotAnInteger(other.to_string())),
    };

    from_millis(millis)
}

/// Convert a Unix millisecond count into a UTC instant.
///
/// # Errors
///
/// Returns [`FeedDateError::OutOfRange`] if chrono cannot represent it.
pub fn from_millis(millis: i64) -> Result<DateTime<Utc>, FeedDateError> {
    DateTime::from_timestamp_millis(millis).ok_or(FeedDateError::OutOfRange(millis))
}

/// A feed instant decoded straight from its nested document form.
///
/// Used as a field type in raw records so that timestamp faults surface
/// while decoding the record that owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeedInstant(DateTime<Utc>);

impl FeedInstant {
    /// The normalized UTC instant.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<FeedInstant> for DateTime<Utc> {
    fn from(instant: FeedInstant) -> Self {
        instant.0
    }
}

impl<'de> Deserialize<'de> for FeedInstant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        normalize(&value).map(Self).map_err(|e| {
            serde::de::Error::custom(format!("{MALFORMED_TIMESTAMP_MARKER}: {e}"))
        })
    }
}
