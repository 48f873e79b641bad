//! Issue model.
//!
//! An issue is a tracked item inside a project. Its JSON shape is the wire
//! format of the HTTP API, so field names (`_id`, `issue_title`, ...) and the
//! timestamp format are fixed.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::validate::{self, Fields};

/// Fields a client may change after creation.
pub const UPDATABLE_FIELDS: [&str; 6] = [
    "issue_title",
    "issue_text",
    "created_by",
    "assigned_to",
    "status_text",
    "open",
];

/// A tracked issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Opaque identifier, unique within the project. Never changes.
    #[serde(rename = "_id")]
    pub id: String,

    pub issue_title: String,

    pub issue_text: String,

    pub created_by: String,

    /// Empty when unassigned
    pub assigned_to: String,

    pub status_text: String,

    /// Set once at creation
    #[serde(with = "wire_timestamp")]
    pub created_on: DateTime<Utc>,

    /// Reset on every successful update
    #[serde(with = "wire_timestamp")]
    pub updated_on: DateTime<Utc>,

    pub open: bool,
}

impl Issue {
    /// Build a freshly created, open issue. Both timestamps are `now`.
    #[must_use]
    pub fn new(id: String, input: NewIssue, now: DateTime<Utc>) -> Self {
        Self {
            id,
            issue_title: input.issue_title,
            issue_text: input.issue_text,
            created_by: input.created_by,
            assigned_to: input.assigned_to,
            status_text: input.status_text,
            created_on: now,
            updated_on: now,
            open: true,
        }
    }
}

/// Validated input for creating an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
}

impl NewIssue {
    /// Decode a create request body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequiredFieldsMissing`] if `issue_title`, `issue_text`
    /// or `created_by` is absent or falsy.
    pub fn from_body(body: &Fields) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            let value = body.get(key);
            if validate::is_truthy(value) {
                Ok(value.map(validate::field_text).unwrap_or_default())
            } else {
                Err(Error::RequiredFieldsMissing)
            }
        };
        let optional =
            |key: &str| -> String { body.get(key).map(validate::field_text).unwrap_or_default() };

        Ok(Self {
            issue_title: required("issue_title")?,
            issue_text: required("issue_text")?,
            created_by: required("created_by")?,
            assigned_to: optional("assigned_to"),
            status_text: optional("status_text"),
        })
    }
}

/// A set of field changes for an existing issue.
///
/// `None` leaves the field untouched; `Some("")` blanks it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

/// A decoded update request: the target `_id` as sent, plus the changes.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub id: Value,
    pub patch: IssuePatch,
}

impl IssuePatch {
    /// Decode an update request body.
    ///
    /// The checks short-circuit in order: a falsy `_id` is
    /// [`Error::MissingId`]; a body where every updatable field is absent or
    /// `""` is [`Error::NoUpdateFields`]. Once at least one field qualifies,
    /// every present field is applied, empty strings included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingId`] or [`Error::NoUpdateFields`].
    pub fn from_body(body: &Fields) -> Result<UpdateRequest> {
        let id = match body.get("_id") {
            Some(id) if validate::is_truthy(Some(id)) => id.clone(),
            _ => return Err(Error::MissingId),
        };

        let has_updates = UPDATABLE_FIELDS
            .iter()
            .any(|key| validate::is_update_value(body.get(*key)));
        if !has_updates {
            return Err(Error::NoUpdateFields { id });
        }

        let text = |key: &str| body.get(key).map(validate::field_text);
        let patch = Self {
            issue_title: text("issue_title"),
            issue_text: text("issue_text"),
            created_by: text("created_by"),
            assigned_to: text("assigned_to"),
            status_text: text("status_text"),
            open: body.get("open").map(validate::coerce_open),
        };

        Ok(UpdateRequest { id, patch })
    }

    /// Apply the changes and stamp `updated_on`.
    pub fn apply(&self, issue: &mut Issue, now: DateTime<Utc>) {
        if let Some(title) = &self.issue_title {
            issue.issue_title.clone_from(title);
        }
        if let Some(text) = &self.issue_text {
            issue.issue_text.clone_from(text);
        }
        if let Some(created_by) = &self.created_by {
            issue.created_by.clone_from(created_by);
        }
        if let Some(assigned_to) = &self.assigned_to {
            issue.assigned_to.clone_from(assigned_to);
        }
        if let Some(status_text) = &self.status_text {
            issue.status_text.clone_from(status_text);
        }
        if let Some(open) = self.open {
            issue.open = open;
        }
        issue.updated_on = now;
    }
}

/// Current time at millisecond precision, the resolution timestamps are
/// serialized with.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 6;

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[usize::try_from(n % 36).unwrap_or_default()]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Generate an issue id: the base-36 millisecond timestamp followed by six
/// random base-36 characters, uppercase.
///
/// Uniqueness is not guaranteed here; the store checks for collisions.
#[must_use]
pub fn generate_id(now: DateTime<Utc>) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let (_, random) = uuid::Uuid::new_v4().as_u64_pair();
    let suffix = to_base36(random % 36u64.pow(6));
    format!("{}{:0>width$}", to_base36(millis), suffix, width = SUFFIX_LEN)
}

/// Serde adapter for UTC timestamps with millisecond precision
/// (`2026-10-19T08:30:00.123Z`).
pub mod wire_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Render a timestamp the way it appears on the wire.
    #[must_use]
    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
