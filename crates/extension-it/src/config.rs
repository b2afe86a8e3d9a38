//! Harness configuration: host address, registration record and readiness policy.

use crate::error::{HarnessError, HarnessResult};
use crate::registration::ExtensionRegistration;
use crate::readiness::Readiness;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const ENV_HOST: &str = "EXTENSION_IT_HOST";
pub const ENV_PORT: &str = "EXTENSION_IT_PORT";
pub const ENV_SCHEME: &str = "EXTENSION_IT_SCHEME";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub scheme: String,
    pub address: String,
    pub port: u16,
    pub request_timeout_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            address: "127.0.0.1".to_string(),
            port: 9200,
            request_timeout_ms: 10_000,
        }
    }
}

impl HostConfig {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            ..Self::default()
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.address, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Route polled until it answers 2xx. Without one the harness sleeps `settle_ms`.
    pub probe_endpoint: Option<String>,
    pub interval_ms: u64,
    pub timeout_ms: u64,
    pub settle_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        // CI hosts register handlers noticeably slower
        let timeout_ms = if env::var("CI").is_ok() { 60_000 } else { 30_000 };
        Self {
            probe_endpoint: None,
            interval_ms: 250,
            timeout_ms,
            settle_ms: 5_000,
        }
    }
}

impl ReadinessConfig {
    pub fn to_readiness(&self) -> Readiness {
        match &self.probe_endpoint {
            Some(endpoint) => Readiness::Probe {
                endpoint: endpoint.clone(),
                interval: Duration::from_millis(self.interval_ms),
                timeout: Duration::from_millis(self.timeout_ms),
            },
            None => Readiness::FixedDelay(Duration::from_millis(self.settle_ms)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub host: HostConfig,
    pub registration: ExtensionRegistration,
    pub readiness: ReadinessConfig,
    pub case_timeout_ms: Option<u64>,
}

impl HarnessConfig {
    pub fn case_timeout(&self) -> Option<Duration> {
        self.case_timeout_ms.map(Duration::from_millis)
    }

    /// Applies `EXTENSION_IT_*` environment overrides on top of the loaded values.
    pub fn apply_env_overrides(&mut self) -> HarnessResult<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides read through `lookup`, keyed by the `EXTENSION_IT_*` names.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> HarnessResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            debug!("Overriding host address from {ENV_HOST}: {host}");
            self.host.address = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.host.port = port.parse().map_err(|e| HarnessError::Config {
                context: ENV_PORT.to_string(),
                reason: format!("'{port}' is not a valid port: {e}"),
            })?;
        }
        if let Some(scheme) = lookup(ENV_SCHEME) {
            if scheme != "http" && scheme != "https" {
                return Err(HarnessError::Config {
                    context: ENV_SCHEME.to_string(),
                    reason: format!("unsupported scheme '{scheme}'"),
                });
            }
            self.host.scheme = scheme;
        }
        Ok(())
    }
}

/// Reads harness config files.
///
/// Files may be partial: whatever they leave out comes from the base config,
/// nested tables included.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path` over [`HarnessConfig::default`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> HarnessResult<HarnessConfig> {
        Self::from_path_over(path, &HarnessConfig::default())
    }

    /// Loads `path` over `base`. `.json` is read as JSON, `.yaml`/`.yml` as YAML.
    pub fn from_path_over<P: AsRef<Path>>(
        path: P,
        base: &HarnessConfig,
    ) -> HarnessResult<HarnessConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| HarnessError::from_io_error(e, &format!("reading {}", path.display())))?;

        let overlay = parse_document(path, &content)?;
        let mut merged = serde_json::to_value(base)
            .map_err(|e| HarnessError::from_parse_error(e, "base config"))?;
        merge_into(&mut merged, overlay);

        serde_json::from_value(merged)
            .map_err(|e| HarnessError::from_parse_error(e, &format!("config {}", path.display())))
    }
}

fn parse_document(path: &Path, content: &str) -> HarnessResult<Value> {
    if content.trim().is_empty() {
        debug!("Config {} is empty, using the base config", path.display());
        return Ok(Value::Object(Map::new()));
    }

    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let document: Value = match format.as_deref() {
        Some("json") => serde_json::from_str(content)
            .map_err(|e| HarnessError::from_parse_error(e, "JSON config"))?,
        Some("yaml" | "yml") => serde_yaml::from_str(content)
            .map_err(|e| HarnessError::from_parse_error(e, "YAML config"))?,
        other => {
            warn!(
                "Config {} has no recognised extension ({other:?}), guessing its format",
                path.display()
            );
            // YAML is a superset of JSON, so the YAML error is the useful one
            serde_json::from_str(content).or_else(|_| {
                serde_yaml::from_str(content)
                    .map_err(|e| HarnessError::from_parse_error(e, "config in unknown format"))
            })?
        }
    };

    // A YAML document holding only comments parses to null
    if document.is_null() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(document)
}

/// Overlays `overlay` onto `base`: objects merge key by key, anything else replaces.
fn merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_into(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
