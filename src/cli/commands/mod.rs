//! Command implementations.

pub mod completions;
pub mod serve;
pub mod version;
