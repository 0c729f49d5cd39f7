// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Connection parameters for a line session.
//!
//! Profiles can be loaded from TOML; durations are given in milliseconds:
//!
//! ```toml
//! port = "/dev/ttyUSB0"
//! baud_rate = 115200
//! read_timeout_ms = 5000
//! settle_delay_ms = 2000
//! window_ms = 1500        # optional, overrides per-command defaults
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, ConnectionError};
use crate::protocol::Command;

/// Default serial speed of the device firmware.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default ceiling for a single blocking read in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5000;

/// Default wait after opening the port. ESP8266 boards reset when DTR toggles.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2000;

/// Everything needed to open and drive a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Serial port, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    pub baud_rate: u32,
    #[serde(rename = "read_timeout_ms", with = "millis")]
    pub read_timeout: Duration,
    #[serde(rename = "settle_delay_ms", with = "millis")]
    pub settle_delay: Duration,
    /// Fixed collection window; `None` uses each command's own default.
    #[serde(rename = "window_ms", with = "millis_opt")]
    pub window: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            window: None,
        }
    }
}

impl ConnectionConfig {
    /// Default settings for `port`.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }

    /// Load a profile from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse a profile from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Collection window to use for `cmd`.
    pub fn window_for(&self, cmd: &Command) -> Duration {
        self.window.unwrap_or_else(|| cmd.default_window())
    }

    /// Check the values a port open would reject anyway, with a clearer message.
    pub fn validate(&self) -> Result<(), ConnectionError> {
        if self.port.trim().is_empty() {
            return Err(ConnectionError::InvalidConfig(
                "port must not be empty".to_string(),
            ));
        }
        if self.baud_rate == 0 {
            return Err(ConnectionError::InvalidConfig(
                "baud rate must be greater than zero".to_string(),
            ));
        }
        if self.read_timeout.is_zero() {
            return Err(ConnectionError::InvalidConfig(
                "read timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

mod millis_opt {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(d).map(|ms| ms.map(Duration::from_millis))
    }
}
