// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! JSON payloads embedded in device output.
//!
//! The firmware prints debug chatter around its reports, so extraction starts
//! at the first `{` and takes the first complete JSON value found there.
//! Whatever follows that value is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::protocol::DeviceField;
use crate::session::ResponseBatch;

/// Extract the first JSON value embedded in a response batch.
pub fn extract_json(batch: &ResponseBatch) -> Option<Value> {
    extract_json_str(&batch.text())
}

/// Extract the first JSON value starting at the first `{` of `text`.
pub fn extract_json_str(text: &str) -> Option<Value> {
    let Some(start) = text.find('{') else {
        trace!("no JSON object start in {} bytes of output", text.len());
        return None;
    };

    let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
    match values.next() {
        Some(Ok(value)) => Some(value),
        Some(Err(e)) => {
            trace!("embedded JSON did not parse: {}", e);
            None
        }
        None => None,
    }
}

/// `device_info` section of the `INFO` report.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceInfo {
    pub device_name: Option<String>,
    pub device_repo: Option<String>,
    pub device_type: Option<String>,
    pub device_id: Option<String>,
    pub firmware_version: Option<String>,
    pub board_type: Option<String>,
    pub mac_address: Option<String>,
    pub installation_date: Option<String>,
    pub location: Option<String>,
}

/// `connectivity_status` section, also the first object of `INFO_CONNECTION`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectivityStatus {
    pub current_status: Option<String>,
    pub last_seen: Option<String>,
    pub connection_type: Option<String>,
    pub ip_address: Option<String>,
    pub signal_strength: Option<String>,
}

/// `power_status` section of the `INFO` report.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PowerStatus {
    pub power_source: Option<String>,
    pub battery_level: Option<String>,
    pub charging_status: Option<String>,
    pub voltage_reading: Option<String>,
}

/// Typed view of the report printed in reply to `INFO`.
///
/// Every field is optional; a report from older firmware with fewer keys
/// still decodes.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceReport {
    pub device_info: DeviceInfo,
    pub connectivity_status: ConnectivityStatus,
    pub power_status: PowerStatus,
}

impl DeviceReport {
    /// Decode the report embedded in an `INFO` response, if any.
    pub fn from_batch(batch: &ResponseBatch) -> Option<Self> {
        extract_json(batch).and_then(Self::from_value)
    }

    /// Decode an already extracted payload. Non-object payloads yield `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Reported value of a settable metadata field.
    pub fn field(&self, field: DeviceField) -> Option<&str> {
        let info = &self.device_info;
        match field {
            DeviceField::DeviceName => info.device_name.as_deref(),
            DeviceField::Location => info.location.as_deref(),
            DeviceField::InstallationDate => info.installation_date.as_deref(),
        }
    }
}

impl ConnectivityStatus {
    /// Decode the first object of an `INFO_CONNECTION` response.
    pub fn from_batch(batch: &ResponseBatch) -> Option<Self> {
        extract_json(batch)
            .filter(Value::is_object)
            .and_then(|value| serde_json::from_value(value).ok())
    }
}
