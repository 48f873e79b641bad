//! Per-project issue tracker served over HTTP.
//!
//! Issues are grouped by project name and kept in process memory. Four
//! operations on `/api/issues/:project` list, create, update and delete them.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Issue, create/update inputs, list filters)
//! - [`storage`] - In-memory issue store
//! - [`server`] - axum router and request handlers
//! - [`config`] - Server configuration
//! - [`validate`] - Presence checks and value coercion for request bodies
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod server;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};
