//! List filters.
//!
//! Query parameters narrow a project listing by equality on a known set of
//! fields. All conditions must hold. A key that names no issue field can
//! never be satisfied, so it empties the result instead of being ignored.

use std::borrow::Cow;

use super::issue::{Issue, wire_timestamp};
use crate::validate;

/// An issue field that can appear as a filter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Id,
    IssueTitle,
    IssueText,
    CreatedBy,
    AssignedTo,
    StatusText,
    CreatedOn,
    UpdatedOn,
    Open,
}

impl FilterField {
    /// Parse a query key. Returns `None` for keys that are not issue fields.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "_id" => Some(Self::Id),
            "issue_title" => Some(Self::IssueTitle),
            "issue_text" => Some(Self::IssueText),
            "created_by" => Some(Self::CreatedBy),
            "assigned_to" => Some(Self::AssignedTo),
            "status_text" => Some(Self::StatusText),
            "created_on" => Some(Self::CreatedOn),
            "updated_on" => Some(Self::UpdatedOn),
            "open" => Some(Self::Open),
            _ => None,
        }
    }

    /// String form of the field's value on `issue`, as it is serialized.
    fn text<'a>(&self, issue: &'a Issue) -> Cow<'a, str> {
        match self {
            Self::Id => Cow::Borrowed(&issue.id),
            Self::IssueTitle => Cow::Borrowed(&issue.issue_title),
            Self::IssueText => Cow::Borrowed(&issue.issue_text),
            Self::CreatedBy => Cow::Borrowed(&issue.created_by),
            Self::AssignedTo => Cow::Borrowed(&issue.assigned_to),
            Self::StatusText => Cow::Borrowed(&issue.status_text),
            Self::CreatedOn => Cow::Owned(wire_timestamp::format(&issue.created_on)),
            Self::UpdatedOn => Cow::Owned(wire_timestamp::format(&issue.updated_on)),
            Self::Open => Cow::Borrowed(if issue.open { "true" } else { "false" }),
        }
    }
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Exact string equality on a text or timestamp field.
    Equals { field: FilterField, value: String },
    /// Open/closed state.
    Open(bool),
    /// A key that is not an issue field; matches nothing.
    Unknown(String),
}

impl Condition {
    /// Build the condition for one `key=value` query pair.
    #[must_use]
    pub fn parse(key: &str, value: &str) -> Self {
        match FilterField::parse(key) {
            Some(FilterField::Open) => Self::Open(validate::parse_open_filter(value)),
            Some(field) => Self::Equals {
                field,
                value: value.to_string(),
            },
            None => Self::Unknown(key.to_string()),
        }
    }

    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        match self {
            Self::Equals { field, value } => field.text(issue) == value.as_str(),
            Self::Open(open) => issue.open == *open,
            Self::Unknown(_) => false,
        }
    }
}

/// A conjunction of conditions. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    conditions: Vec<Condition>,
}

impl IssueFilter {
    /// Build a filter from query `key=value` pairs. Repeated keys each apply.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self {
            conditions: pairs
                .into_iter()
                .map(|(k, v)| Condition::parse(k.as_ref(), v.as_ref()))
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Keys in this filter that are not issue fields.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().filter_map(|c| match c {
            Condition::Unknown(key) => Some(key.as_str()),
            _ => None,
        })
    }

    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        self.conditions.iter().all(|c| c.matches(issue))
    }
}
