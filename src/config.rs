//! Application configuration management

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::resolver::ScoringConfig;
use crate::slots::OverflowPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind to; all interfaces when unset
    pub host: Option<IpAddr>,

    /// Server port
    pub port: u16,

    /// Path to the album list JSON (ordered, positional identity)
    pub albums_path: PathBuf,

    /// Path to the track catalog JSON
    pub catalog_path: PathBuf,

    /// Fuzzy-match scoring weights and threshold
    pub scoring: ScoringConfig,

    /// What to do when the album list needs more slots than exist
    pub overflow_policy: OverflowPolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = ScoringConfig::default();
        let scoring = ScoringConfig {
            match_threshold: env_f64("MATCH_THRESHOLD", defaults.match_threshold)?,
            substring_weight: env_f64("SUBSTRING_WEIGHT", defaults.substring_weight)?,
            prefix_weight: env_f64("PREFIX_WEIGHT", defaults.prefix_weight)?,
        };

        let overflow_policy = match env::var("SLOT_OVERFLOW") {
            Ok(value) => value
                .parse()
                .context("Invalid SLOT_OVERFLOW (expected 'truncate' or 'reject')")?,
            Err(_) => OverflowPolicy::default(),
        };

        Ok(Self {
            host: match env::var("HOST") {
                Ok(value) => Some(value.parse().context("Invalid HOST")?),
                Err(_) => None,
            },

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT")?,

            albums_path: env::var("ALBUMS_PATH")
                .unwrap_or_else(|_| "./data/albums.json".to_string())
                .into(),

            catalog_path: env::var("CATALOG_PATH")
                .unwrap_or_else(|_| "./data/songs.json".to_string())
                .into(),

            scoring,

            overflow_policy,
        })
    }

    /// Address the server binds to: `HOST:PORT`, all interfaces by default
    pub fn bind_addr(&self) -> SocketAddr {
        let ip = self
            .host
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::new(ip, self.port)
    }
}

fn env_f64(name: &str, default: f64) -> Result<f64> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("Invalid {name}: {value}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(host: Option<IpAddr>, port: u16) -> Config {
        Config {
            host,
            port,
            albums_path: "./data/albums.json".into(),
            catalog_path: "./data/songs.json".into(),
            scoring: ScoringConfig::default(),
            overflow_policy: OverflowPolicy::default(),
        }
    }

    #[test]
    fn test_bind_addr_defaults_to_all_interfaces() {
        let addr = config(None, 8080).bind_addr();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_bind_addr_uses_configured_host() {
        let host: IpAddr = "127.0.0.1".parse().expect("valid ip");
        let addr = config(Some(host), 9000).bind_addr();
        assert_eq!(addr.to_string(), "127.0.0.1:9000");
    }
}
