// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Error types for opening and driving a line session.
//!
//! Only failures to reach the device surface as errors. Decode noise, missing
//! payloads and truncated windows degrade to empty values instead.

use std::io;

use thiserror::Error;

/// Failure to establish a connection. Fatal to the session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("invalid connection config: {0}")]
    InvalidConfig(String),

    #[error("failed to open serial port {port}")]
    Open {
        port: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to prepare port {port}")]
    Prepare {
        port: String,
        #[source]
        source: io::Error,
    },
}

/// Failure to load a connection profile from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure while exchanging a command on an open session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is closed")]
    Closed,

    #[error(transparent)]
    InvalidCommand(#[from] CommandError),

    #[error("failed to write command to device")]
    Io(#[from] io::Error),
}

/// A command that cannot be sent as a single line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("command spans multiple lines: \"{0}\"")]
    MultiLine(String),

    #[error("segment may not contain ':': \"{0}\"")]
    SeparatorInSegment(String),

    #[error("unknown device field \"{0}\" (expected DEVICE_NAME, LOCATION or INSTALLATION_DATE)")]
    UnknownField(String),
}
