//! Runtime settings read from the environment.

use std::{env, net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone)]
pub struct Config {
    /// `BIND_ADDR`, e.g. `127.0.0.1:5000`.
    pub bind_addr: SocketAddr,
    /// `STATIC_DIR`: files served for any path outside `/api`.
    pub static_dir: PathBuf,
    /// `SEED_SAMPLE_DATA`: load the demonstration records at startup.
    pub seed_sample_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .with_context(|| format!("parsing BIND_ADDR {raw_addr:?}"))?;
        let static_dir = PathBuf::from(
            lookup("STATIC_DIR").unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string()),
        );
        let seed_sample_data = lookup("SEED_SAMPLE_DATA")
            .map(|value| !matches!(value.trim(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Self {
            bind_addr,
            static_dir,
            seed_sample_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(config.seed_sample_data);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("STATIC_DIR", "/srv/planner"),
            ("SEED_SAMPLE_DATA", "0"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.static_dir, PathBuf::from("/srv/planner"));
        assert!(!config.seed_sample_data);
    }

    #[test]
    fn rejects_bad_bind_addr() {
        let err = config_from(&[("BIND_ADDR", "localhost")]).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }
}
