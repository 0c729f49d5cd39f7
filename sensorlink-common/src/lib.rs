// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Common types and the line session for talking to SensorLink devices.
//!
//! The device speaks newline-terminated ASCII commands and answers with
//! freeform text lines, some of which carry a JSON report.
//! - Default: protocol, line assembly, payload extraction and the session,
//!   generic over any [`session::Link`]
//! - `serial` feature: [`serial::open`] for host serial ports

pub mod config;
pub mod error;
pub mod lines;
pub mod payload;
pub mod protocol;
pub mod session;

#[cfg(feature = "serial")]
pub mod serial;

// Re-export commonly used types
pub use config::ConnectionConfig;
pub use error::{CommandError, ConfigError, ConnectionError, SessionError};
pub use payload::{extract_json, extract_json_str, ConnectivityStatus, DeviceReport};
pub use protocol::{Command, DeviceField, LINE_TERMINATOR};
pub use session::{LineSession, Link, ResponseBatch};

#[cfg(feature = "serial")]
pub use serial::{open, SerialSession};
