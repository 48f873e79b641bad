//! Data models for the issue tracker.
//!
//! This module contains the domain models:
//! - Issue (plus create / update inputs)
//! - IssueFilter

pub mod filter;
pub mod issue;

pub use filter::{Condition, FilterField, IssueFilter};
pub use issue::{Issue, IssuePatch, NewIssue, UpdateRequest};
