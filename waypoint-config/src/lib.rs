//! Loader for harness configuration with YAML + environment overlays.
//!
//! Sources merge in order: optional YAML file, then `WAYPOINT`-prefixed
//! environment variables (`WAYPOINT_TELEMETRY__DATABASE=...`), with `${VAR}`
//! placeholders expanded recursively before deserialisation.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level harness configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaypointConfig {
    pub webdriver: WebDriverSettings,
    pub waits: WaitTimings,
    pub journey: JourneySettings,
    pub telemetry: TelemetrySettings,
    pub screenshots: ScreenshotSettings,
}

impl Default for WaypointConfig {
    fn default() -> Self {
        Self {
            webdriver: WebDriverSettings::default(),
            waits: WaitTimings::default(),
            journey: JourneySettings::default(),
            telemetry: TelemetrySettings::default(),
            screenshots: ScreenshotSettings::default(),
        }
    }
}

/// Connection settings for the WebDriver endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebDriverSettings {
    /// URL of a running WebDriver service (Chromedriver by default).
    pub endpoint: String,
    /// Run the browser without a visible window.
    pub headless: bool,
}

impl Default for WebDriverSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9515".into(),
            headless: false,
        }
    }
}

/// Synchronisation budgets applied by the element waiter.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WaitTimings {
    /// Default bounded-wait budget in seconds; individual waits may override.
    pub default_timeout_secs: u64,
    /// Interval between DOM polls in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for WaitTimings {
    fn default() -> Self {
        Self {
            default_timeout_secs: 15,
            poll_interval_ms: 250,
        }
    }
}

/// Page-object data for the scripted journey: target URLs, filter values,
/// and the substrings every valid listing must contain.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JourneySettings {
    pub home_url: String,
    /// Department label the listing filter must display before the
    /// dependent location selection proceeds.
    pub expected_department: String,
    /// Location option to select once the department label has settled.
    pub target_location: String,
    /// A listing is valid when its text contains all of these,
    /// case-insensitively.
    pub required_listing_terms: Vec<String>,
    /// Substring expected in the URL of the external application page.
    pub redirect_marker: String,
    /// Bounded retry budget for the filter-label wait.
    pub filter_attempts: u32,
}

impl Default for JourneySettings {
    fn default() -> Self {
        Self {
            home_url: "https://useinsider.com".into(),
            expected_department: "Quality Assurance".into(),
            target_location: "Istanbul, Turkiye".into(),
            required_listing_terms: vec!["quality assurance".into(), "istanbul".into()],
            redirect_marker: "lever.co".into(),
            filter_attempts: 3,
        }
    }
}

/// Settings for the time-series outcome sink.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    pub enabled: bool,
    pub endpoint: String,
    pub database: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "http://localhost:8086".into(),
            database: "test_results".into(),
        }
    }
}

/// Where failure snapshots are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScreenshotSettings {
    pub dir: String,
}

impl Default for ScreenshotSettings {
    fn default() -> Self {
        Self {
            dir: "screenshots".into(),
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct WaypointConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for WaypointConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointConfigLoader {
    /// Start with the default sources: `WAYPOINT_` env overrides only.
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("WAYPOINT").separator("__"));
        Self { builder }
    }

    /// Attach a config file; missing files are tolerated so headless
    /// deployments can rely purely on env variables and defaults.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet (tests, CLI overrides).
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialise the merged sources.
    pub fn load(self) -> Result<WaypointConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: WaypointConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
