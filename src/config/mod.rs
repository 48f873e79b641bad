//! Configuration management.
//!
//! The server needs very little: the address to listen on and the name it
//! reports from `/healthz`. Both come from CLI flags or the environment.

use crate::error::{Error, Result};

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Address used when nothing else is configured.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Environment variable holding a full `HOST:PORT` bind address.
pub const BIND_ADDR_ENV: &str = "ISSUETRACKER_BIND_ADDR";

/// Environment variable holding just a port (binds all interfaces).
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding the reported service name.
pub const SERVICE_NAME_ENV: &str = "ISSUETRACKER_SERVICE_NAME";

const DEFAULT_SERVICE_NAME: &str = "issuetracker";

/// Resolved server settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub service_name: String,
}

impl ServerConfig {
    /// Resolve the configuration from an optional `--bind` flag and the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a bind address or port does not parse.
    pub fn resolve(explicit_bind: Option<&str>) -> Result<Self> {
        Self::resolve_with(explicit_bind, |key| std::env::var(key).ok())
    }

    /// Like [`resolve`](Self::resolve), reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a bind address or port does not parse.
    pub fn resolve_with<F>(explicit_bind: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = resolve_bind_addr(explicit_bind, &lookup)?;
        let service_name = lookup(SERVICE_NAME_ENV)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());

        Ok(Self {
            bind_addr,
            service_name,
        })
    }
}

/// Resolve the listen address.
///
/// Priority:
/// 1. `explicit` (the `--bind` flag)
/// 2. `ISSUETRACKER_BIND_ADDR`
/// 3. `PORT`, bound on all interfaces
/// 4. [`DEFAULT_BIND_ADDR`]
fn resolve_bind_addr<F>(explicit: Option<&str>, lookup: &F) -> Result<SocketAddr>
where
    F: Fn(&str) -> Option<String>,
{
    // Priority 1: explicit flag
    if let Some(raw) = explicit {
        return parse_bind_addr(raw, "--bind");
    }

    // Priority 2: full address from the environment
    if let Some(raw) = lookup(BIND_ADDR_ENV).filter(|v| !v.trim().is_empty()) {
        return parse_bind_addr(&raw, BIND_ADDR_ENV);
    }

    // Priority 3: bare port, as hosting platforms provide it
    if let Some(raw) = lookup(PORT_ENV).filter(|v| !v.trim().is_empty()) {
        let port = raw
            .trim()
            .parse::<u16>()
            .map_err(|e| Error::Config(format!("invalid {PORT_ENV} '{raw}': {e}")))?;
        return Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port));
    }

    parse_bind_addr(DEFAULT_BIND_ADDR, "default")
}

fn parse_bind_addr(raw: &str, source: &str) -> Result<SocketAddr> {
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid bind address '{raw}' from {source}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_bind_addr() {
        let config = ServerConfig::resolve_with(None, env(&[])).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.service_name, "issuetracker");
    }

    #[test]
    fn test_explicit_flag_wins() {
        let config = ServerConfig::resolve_with(
            Some("0.0.0.0:8080"),
            env(&[(BIND_ADDR_ENV, "127.0.0.1:9000"), (PORT_ENV, "7000")]),
        )
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn test_bind_env_beats_port() {
        let config = ServerConfig::resolve_with(
            None,
            env(&[(BIND_ADDR_ENV, "127.0.0.1:9000"), (PORT_ENV, "7000")]),
        )
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
    }

    #[test]
    fn test_port_binds_all_interfaces() {
        let config = ServerConfig::resolve_with(None, env(&[(PORT_ENV, "7000")])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:7000".parse().unwrap());
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let config =
            ServerConfig::resolve_with(None, env(&[(BIND_ADDR_ENV, " "), (PORT_ENV, "")])).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let err = ServerConfig::resolve_with(Some("not-an-addr"), env(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = ServerConfig::resolve_with(None, env(&[(PORT_ENV, "99999")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("PORT")));
    }

    #[test]
    fn test_service_name_override() {
        let config =
            ServerConfig::resolve_with(None, env(&[(SERVICE_NAME_ENV, "tracker-test")])).unwrap();
        assert_eq!(config.service_name, "tracker-test");
    }
}
