// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Text command vocabulary shared between the host tools and the device.
//!
//! Commands are case-sensitive ASCII lines. The session appends exactly one
//! [`LINE_TERMINATOR`] before transmission; nothing in here carries one.

use core::fmt;
use core::str::FromStr;
use std::time::Duration;

use crate::error::CommandError;

// --- Wire constants ---

/// Terminator appended to every command and expected after every response line.
pub const LINE_TERMINATOR: &str = "\n";

/// Separator between command segments (`SET_WIFI:<ssid>:<password>`).
pub const SEGMENT_SEPARATOR: char = ':';

/// Collection window for commands that only echo an acknowledgement.
pub const ACK_WINDOW: Duration = Duration::from_millis(1000);

/// Collection window for `INFO`, which prints a multi-line report.
pub const INFO_WINDOW: Duration = Duration::from_millis(2000);

/// Collection window for commands that touch the device EEPROM.
pub const PERSIST_WINDOW: Duration = Duration::from_millis(2000);

// --- Device metadata fields ---

/// Device metadata field that can be staged with `SET_DEVICE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceField {
    DeviceName,
    Location,
    InstallationDate,
}

impl DeviceField {
    pub const ALL: [DeviceField; 3] = [
        DeviceField::DeviceName,
        DeviceField::Location,
        DeviceField::InstallationDate,
    ];

    /// Name used on the wire (`DEVICE_NAME`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceField::DeviceName => "DEVICE_NAME",
            DeviceField::Location => "LOCATION",
            DeviceField::InstallationDate => "INSTALLATION_DATE",
        }
    }

    /// Key under which the device reports this field in its `INFO` JSON.
    pub fn report_key(self) -> &'static str {
        match self {
            DeviceField::DeviceName => "device_name",
            DeviceField::Location => "location",
            DeviceField::InstallationDate => "installation_date",
        }
    }
}

impl fmt::Display for DeviceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceField {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CommandError::UnknownField(s.to_string()))
    }
}

// --- Commands ---

/// A single command line understood by the device firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Full configuration and status report.
    Info,
    /// Connectivity and power status only.
    InfoConnection,
    /// Stage a metadata field update.
    SetDevice { field: DeviceField, value: String },
    /// Stage new Wi-Fi credentials.
    SetWifi { ssid: String, password: String },
    /// Persist staged configuration.
    SaveConfig,
    /// Restore factory defaults.
    ResetConfig,
    /// Anything else, sent verbatim.
    Raw(String),
}

impl Command {
    /// Build a `SET_DEVICE` command, rejecting values that would break the line.
    pub fn set_device(field: DeviceField, value: impl Into<String>) -> Result<Self, CommandError> {
        let value = value.into();
        check_single_line(&value)?;
        Ok(Command::SetDevice { field, value })
    }

    /// Build a `SET_WIFI` command.
    ///
    /// The SSID is a middle segment and may not contain the separator; the
    /// password is the last segment and may.
    pub fn set_wifi(
        ssid: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CommandError> {
        let ssid = ssid.into();
        let password = password.into();
        check_single_line(&ssid)?;
        check_single_line(&password)?;
        if ssid.contains(SEGMENT_SEPARATOR) {
            return Err(CommandError::SeparatorInSegment(ssid));
        }
        Ok(Command::SetWifi { ssid, password })
    }

    /// Wrap a caller-supplied command line.
    pub fn raw(line: impl Into<String>) -> Result<Self, CommandError> {
        let line = line.into();
        check_single_line(&line)?;
        Ok(Command::Raw(line))
    }

    /// Text transmitted for this command, without terminator.
    pub fn to_line(&self) -> String {
        self.to_string()
    }

    /// Same as [`Command::to_line`] with the Wi-Fi password masked, for logs.
    pub fn redacted(&self) -> String {
        match self {
            Command::SetWifi { ssid, .. } => format!("SET_WIFI:{ssid}:***"),
            other => other.to_string(),
        }
    }

    /// How long to collect response lines after sending this command.
    pub fn default_window(&self) -> Duration {
        match self {
            Command::Info | Command::InfoConnection => INFO_WINDOW,
            Command::SaveConfig | Command::ResetConfig => PERSIST_WINDOW,
            Command::SetDevice { .. } | Command::SetWifi { .. } | Command::Raw(_) => ACK_WINDOW,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Info => f.write_str("INFO"),
            Command::InfoConnection => f.write_str("INFO_CONNECTION"),
            Command::SetDevice { field, value } => write!(f, "SET_DEVICE:{field}:{value}"),
            Command::SetWifi { ssid, password } => write!(f, "SET_WIFI:{ssid}:{password}"),
            Command::SaveConfig => f.write_str("SAVE_CONFIG"),
            Command::ResetConfig => f.write_str("RESET_CONFIG"),
            Command::Raw(line) => f.write_str(line),
        }
    }
}

/// Reject text containing a line terminator (`\n` or `\r`).
pub fn check_single_line(text: &str) -> Result<(), CommandError> {
    if text.contains(['\n', '\r']) {
        Err(CommandError::MultiLine(text.escape_debug().to_string()))
    } else {
        Ok(())
    }
}

