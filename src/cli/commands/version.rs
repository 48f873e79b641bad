//! Version command implementation.

use crate::config::DEFAULT_BIND_ADDR;
use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput {
    name: &'static str,
    version: &'static str,
    build: &'static str,
    default_bind: &'static str,
}

impl VersionOutput {
    fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            build: if cfg!(debug_assertions) { "dev" } else { "release" },
            default_bind: DEFAULT_BIND_ADDR,
        }
    }
}

/// Print the package version, as JSON when `json` is set.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput::current();

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "{} {} ({}), listens on {} by default",
            output.name, output.version, output.build, output.default_bind
        );
    }
    Ok(())
}
