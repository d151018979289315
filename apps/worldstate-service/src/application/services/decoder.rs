//! Schema decoder.
//!
//! Maps a raw feed document onto [`DecodedWorldState`], one category at a
//! time. Categories are isolated from each other: a malformed record fails
//! its own category, which then surfaces as empty, and every other category
//! decodes normally. Within a category decoding is fail-fast.
//!
//! Decoding is pure. Reporting of category failures is left to the caller.

use serde_json::{Map, Value};

use crate::domain::feed_date::{self, MALFORMED_TIMESTAMP_MARKER};
use crate::domain::worldstate::raw::RawRecord;
use crate::domain::worldstate::{Category, DecodedWorldState, SnapshotHeader};

const VERSION_KEY: &str = "Version";
const BUILD_LABEL_KEY: &str = "BuildLabel";
const MOBILE_VERSION_KEY: &str = "MobileVersion";
const TIME_KEY: &str = "Time";

// =============================================================================
// Errors
// =============================================================================

/// Why a record, or a whole category, could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeCause {
    /// A field the record cannot exist without is absent.
    #[error("missing required field `{field}`")]
    MissingRequiredField {
        /// Field name as it appears in the feed.
        field: String,
    },

    /// A value has the wrong JSON shape.
    #[error("type mismatch: {detail}")]
    TypeMismatch {
        /// Parser message.
        detail: String,
    },

    /// A date document could not be normalized, or activation is after
    /// expiry.
    #[error("malformed timestamp: {detail}")]
    MalformedTimestamp {
        /// What was wrong.
        detail: String,
    },
}

impl DecodeCause {
    /// Short label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingRequiredField { .. } => "missing_required_field",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::MalformedTimestamp { .. } => "malformed_timestamp",
        }
    }

    fn from_serde(err: &serde_json::Error) -> Self {
        let message = err.to_string();

        // Only a leading marker counts; type errors may quote feed strings.
        if let Some(rest) = message.strip_prefix(MALFORMED_TIMESTAMP_MARKER) {
            let detail = rest.trim_start_matches(':').trim().to_string();
            return Self::MalformedTimestamp { detail };
        }

        if let Some(field) = message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split('`').next())
        {
            return Self::MissingRequiredField {
                field: field.to_string(),
            };
        }

        Self::TypeMismatch { detail: message }
    }
}

/// A category-scoped decode failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{category}{}: {cause}", .index.map(|i| format!("[{i}]")).unwrap_or_default())]
pub struct DecodeError {
    /// Category that was dropped.
    pub category: Category,
    /// Offending element, `None` when the collection itself is malformed.
    pub index: Option<usize>,
    /// What went wrong.
    pub cause: DecodeCause,
}

/// The document as a whole cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// Root is not a JSON object.
    #[error("feed document root is not a JSON object")]
    NotAnObject,

    /// A required header field is absent.
    #[error("feed document is missing `{field}`")]
    MissingHeaderField {
        /// Feed key.
        field: &'static str,
    },

    /// A header field has the wrong shape.
    #[error("feed document field `{field}` is invalid: {detail}")]
    InvalidHeaderField {
        /// Feed key.
        field: &'static str,
        /// What was wrong.
        detail: String,
    },
}

// =============================================================================
// Decoding
// =============================================================================

/// Output of one decode: the typed state plus every dropped category.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeReport {
    /// Decoded state. Dropped categories are empty.
    pub state: DecodedWorldState,
    /// One entry per dropped category.
    pub errors: Vec<DecodeError>,
}

impl DecodeReport {
    /// Whether every category decoded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether categories were dropped and nothing else produced a record.
    ///
    /// A document that simply carries no categories is not a failure.
    #[must_use]
    pub fn is_total_failure(&self) -> bool {
        !self.is_clean() && self.state.total_records() == 0
    }
}

/// Decode a raw feed document.
///
/// # Errors
///
/// Returns [`DocumentError`] only when the document header is unusable.
/// Category-level failures are collected into [`DecodeReport::errors`].
pub fn decode(document: &Value) -> Result<DecodeReport, DocumentError> {
    let root = document.as_object().ok_or(DocumentError::NotAnObject)?;
    let header = decode_header(root)?;

    let mut errors = Vec::new();
    let mut state = DecodedWorldState::empty(header);

    state.alerts = collect(root, Category::Alerts, &mut errors);
    state.fissures = collect(root, Category::Fissures, &mut errors);
    state.void_traders = collect(root, Category::VoidTraders, &mut errors);
    state.daily_deals = collect(root, Category::DailyDeals, &mut errors);
    state.nightwave = collect(root, Category::Nightwave, &mut errors);
    state.archon_hunts = collect(root, Category::ArchonHunts, &mut errors);
    state.sorties = collect(root, Category::Sorties, &mut errors);
    state.invasions = collect(root, Category::Invasions, &mut errors);
    state.events = collect(root, Category::Events, &mut errors);
    state.goals = collect(root, Category::Goals, &mut errors);
    state.void_storms = collect(root, Category::VoidStorms, &mut errors);
    state.conquests = collect(root, Category::Conquests, &mut errors);
    state.prime_vault_traders = collect(root, Category::PrimeVaultTraders, &mut errors);
    state.circuit = collect(root, Category::Circuit, &mut errors);

    Ok(DecodeReport { state, errors })
}

fn collect<T: RawRecord>(
    root: &Map<String, Value>,
    category: Category,
    errors: &mut Vec<DecodeError>,
) -> Vec<T> {
    decode_category(root, category).unwrap_or_else(|err| {
        errors.push(err);
        Vec::new()
    })
}

/// Decode one category. An absent or `null` key yields an empty sequence.
///
/// # Errors
///
/// Returns the first failing element's [`DecodeError`].
pub fn decode_category<T: RawRecord>(
    root: &Map<String, Value>,
    category: Category,
) -> Result<Vec<T>, DecodeError> {
    let collection_error = |detail: String| DecodeError {
        category,
        index: None,
        cause: DecodeCause::TypeMismatch { detail },
    };

    let elements: Vec<&Value> = match root.get(category.feed_key()) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(value @ Value::Object(obj)) if category.is_singular() => {
            if obj.is_empty() {
                return Ok(Vec::new());
            }
            vec![value]
        }
        Some(Value::Array(items)) if !category.is_singular() => items.iter().collect(),
        Some(other) => {
            let expected = if category.is_singular() { "an object" } else { "an array" };
            return Err(collection_error(format!(
                "`{}` should be {expected}, found {}",
                category.feed_key(),
                json_type_name(other)
            )));
        }
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| decode_element(element).map_err(|cause| DecodeError {
            category,
            index: Some(index),
            cause,
        }))
        .collect()
}

fn decode_element<T: RawRecord>(element: &Value) -> Result<T, DecodeCause> {
    let record = T::deserialize(element).map_err(|e| DecodeCause::from_serde(&e))?;

    if let Some(window) = record.windows().into_iter().find(|w| !w.is_ordered()) {
        return Err(DecodeCause::MalformedTimestamp {
            detail: format!(
                "activation {} is after expiry {}",
                window.activation.map(|t| t.to_rfc3339()).unwrap_or_default(),
                window.expiry.map(|t| t.to_rfc3339()).unwrap_or_default(),
            ),
        });
    }

    Ok(record)
}

fn decode_header(root: &Map<String, Value>) -> Result<SnapshotHeader, DocumentError> {
    let version = match root.get(VERSION_KEY) {
        None | Some(Value::Null) => {
            return Err(DocumentError::MissingHeaderField { field: VERSION_KEY });
        }
        Some(value) => value.as_u64().ok_or_else(|| DocumentError::InvalidHeaderField {
            field: VERSION_KEY,
            detail: format!("expected a non-negative integer, found {value}"),
        })?,
    };

    let build_label = match root.get(BUILD_LABEL_KEY) {
        None | Some(Value::Null) => {
            return Err(DocumentError::MissingHeaderField {
                field: BUILD_LABEL_KEY,
            });
        }
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(DocumentError::InvalidHeaderField {
                field: BUILD_LABEL_KEY,
                detail: format!("expected a string, found {}", json_type_name(other)),
            });
        }
    };

    let mobile_version = root
        .get(MOBILE_VERSION_KEY)
        .and_then(Value::as_str)
        .map(str::to_string);

    let server_time = match root.get(TIME_KEY) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let secs = value.as_i64().ok_or_else(|| DocumentError::InvalidHeaderField {
                field: TIME_KEY,
                detail: format!("expected epoch seconds, found {value}"),
            })?;
            let instant = secs
                .checked_mul(1000)
                .ok_or(feed_date::FeedDateError::OutOfRange(secs))
                .and_then(feed_date::from_millis)
                .map_err(|e| DocumentError::InvalidHeaderField {
                    field: TIME_KEY,
                    detail: e.to_string(),
                })?;
            Some(instant)
        }
    };

    Ok(SnapshotHeader {
        version,
        build_label,
        mobile_version,
        server_time,
    })
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
