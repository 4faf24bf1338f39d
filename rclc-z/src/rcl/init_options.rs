use std::path::PathBuf;

use serde_json::json;

use crate::ret::{RclError, Result};

pub const ROS_DOMAIN_ID_ENV: &str = "ROS_DOMAIN_ID";
pub const ZENOH_CONFIG_FILE_ENV: &str = "ZENOH_SESSION_CONFIG_URI";
pub const ZENOH_CONFIG_OVERRIDE_ENV: &str = "ZENOH_CONFIG_OVERRIDE";

/// Options used to initialize a [`Context`](crate::rcl::context::Context).
///
/// Resolution order for the session configuration:
/// 1. the file given with [`InitOptions::with_config_file`],
/// 2. the file named by `ZENOH_SESSION_CONFIG_URI`,
/// 3. a local peer configuration (loopback listener, no multicast scouting).
///
/// Overrides from `ZENOH_CONFIG_OVERRIDE` are applied first, then the ones
/// added on the builder.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    domain_id: Option<usize>,
    config_file: Option<PathBuf>,
    config_overrides: Vec<(String, serde_json::Value)>,
}

impl InitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain_id(mut self, domain_id: usize) -> Self {
        self.domain_id = Some(domain_id);
        self
    }

    pub fn set_domain_id(&mut self, domain_id: usize) {
        self.domain_id = Some(domain_id);
    }

    /// The domain id, falling back to `ROS_DOMAIN_ID` and then 0.
    pub fn domain_id(&self) -> Result<usize> {
        if let Some(id) = self.domain_id {
            return Ok(id);
        }
        match std::env::var(ROS_DOMAIN_ID_ENV) {
            Ok(value) if !value.trim().is_empty() => value.trim().parse().map_err(|_| {
                RclError::invalid_argument(format!("{ROS_DOMAIN_ID_ENV}='{value}' is not a number"))
            }),
            _ => Ok(0),
        }
    }

    pub fn with_config_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Add a raw configuration override, e.g. `("scouting/multicast/enabled", false)`.
    pub fn with_json<K: Into<String>, V: serde::Serialize>(mut self, key: K, value: V) -> Self {
        let key = key.into();
        match serde_json::to_value(&value) {
            Ok(value) => self.config_overrides.push((key, value)),
            Err(e) => tracing::error!("dropping config override '{key}': {e}"),
        }
        self
    }

    pub fn disable_multicast_scouting(self) -> Self {
        self.with_json("scouting/multicast/enabled", json!(false))
    }

    pub fn with_connect_endpoints<I, S>(self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let endpoints: Vec<String> = endpoints.into_iter().map(Into::into).collect();
        self.with_json("connect/endpoints", json!(endpoints))
    }

    pub fn connect_to_local_zenohd(self) -> Self {
        self.with_connect_endpoints(["tcp/127.0.0.1:7447"])
    }

    /// "peer", "client" or "router".
    pub fn with_mode<S: Into<String>>(self, mode: S) -> Self {
        self.with_json("mode", json!(mode.into()))
    }

    fn env_overrides() -> Result<Vec<(String, serde_json::Value)>> {
        let Ok(raw) = std::env::var(ZENOH_CONFIG_OVERRIDE_ENV) else {
            return Ok(Vec::new());
        };
        tracing::debug!("{ZENOH_CONFIG_OVERRIDE_ENV}={raw}");
        parse_overrides(&raw)
    }

    /// Build the session configuration.
    pub fn zenoh_config(&self) -> Result<zenoh::Config> {
        let file = self
            .config_file
            .clone()
            .or_else(|| std::env::var(ZENOH_CONFIG_FILE_ENV).ok().map(PathBuf::from));

        let mut config = match file {
            Some(path) => {
                tracing::debug!("loading session config from {}", path.display());
                zenoh::Config::from_file(&path)?
            }
            None => local_peer_config()?,
        };

        for (key, value) in Self::env_overrides()?
            .iter()
            .chain(self.config_overrides.iter())
        {
            let value = value.to_string();
            config.insert_json5(key, &value).map_err(|e| {
                RclError::invalid_argument(format!("config override '{key}'='{value}': {e}"))
            })?;
        }
        Ok(config)
    }
}

fn local_peer_config() -> Result<zenoh::Config> {
    let mut config = zenoh::Config::default();
    for (key, value) in [
        ("mode", r#""peer""#),
        ("listen/endpoints", r#"["tcp/127.0.0.1:0"]"#),
        ("scouting/multicast/enabled", "false"),
    ] {
        config
            .insert_json5(key, value)
            .map_err(|e| RclError::error(format!("default config '{key}': {e}")))?;
    }
    Ok(config)
}

/// Parse `key=json5;key=json5` pairs.
fn parse_overrides(raw: &str) -> Result<Vec<(String, serde_json::Value)>> {
    let mut overrides = Vec::new();
    for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            RclError::invalid_argument(format!(
                "{ZENOH_CONFIG_OVERRIDE_ENV}: expected key=value, got '{pair}'"
            ))
        })?;
        let value: serde_json::Value = json5::from_str(value.trim()).map_err(|e| {
            RclError::invalid_argument(format!(
                "{ZENOH_CONFIG_OVERRIDE_ENV}: bad value for '{}': {e}",
                key.trim()
            ))
        })?;
        overrides.push((key.trim().to_string(), value));
    }
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let parsed =
            parse_overrides(r#"mode="client"; connect/endpoints=["tcp/10.0.0.1:7447"];"#).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], ("mode".to_string(), json!("client")));
        assert_eq!(parsed[1].1, json!(["tcp/10.0.0.1:7447"]));

        assert!(parse_overrides("mode").is_err());
        assert!(parse_overrides("mode={").is_err());
        assert!(parse_overrides("").unwrap().is_empty());
    }

    #[test]
    fn test_explicit_domain_id() {
        let options = InitOptions::new().with_domain_id(42);
        assert_eq!(options.domain_id().unwrap(), 42);
    }

    #[test]
    fn test_builder_overrides_apply() {
        let options = InitOptions::new()
            .with_mode("peer")
            .with_connect_endpoints(["tcp/127.0.0.1:7447"]);
        assert!(options.zenoh_config().is_ok());
    }
}
