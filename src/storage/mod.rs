//! Storage layer for the issue tracker.
//!
//! Issues live only in process memory; nothing survives a restart.
//!
//! # Submodules
//!
//! - [`memory`] - Project-keyed in-memory issue store

pub mod memory;

pub use memory::IssueStore;
