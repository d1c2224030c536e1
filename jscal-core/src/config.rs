//! Settings for the iCalendar bridge.

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{JscalError, JscalResult};

pub const DEFAULT_PROD_ID: &str = "-//jscal//JSCalendar Bridge//EN";

/// Environment variables with this prefix override file settings,
/// e.g. `JSCAL_PROD_ID`.
pub const ENV_PREFIX: &str = "JSCAL";

fn default_prod_id() -> String {
    DEFAULT_PROD_ID.to_string()
}

fn default_true() -> bool {
    true
}

/// How exported calendars are stamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Written as the calendar's PRODID.
    #[serde(default = "default_prod_id")]
    pub prod_id: String,

    /// Use the event's `updated` time for DTSTAMP instead of the current time.
    #[serde(default = "default_true")]
    pub stamp_from_updated: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            prod_id: default_prod_id(),
            stamp_from_updated: true,
        }
    }
}

impl BridgeConfig {
    /// Parse TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> JscalResult<Self> {
        toml::from_str(content).map_err(|e| JscalError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> JscalResult<String> {
        toml::to_string_pretty(self).map_err(|e| JscalError::Config(e.to_string()))
    }

    /// Layers defaults, then `toml` if given, then `JSCAL_*` environment variables.
    pub fn load(toml: Option<&str>) -> JscalResult<Self> {
        let mut builder = Config::builder()
            .set_default("prod_id", DEFAULT_PROD_ID)?
            .set_default("stamp_from_updated", true)?;

        if let Some(content) = toml {
            builder = builder.add_source(File::from_str(content, FileFormat::Toml));
        }

        Ok(builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<BridgeConfig>()?)
    }
}
