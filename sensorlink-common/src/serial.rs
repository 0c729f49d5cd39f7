// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Serial port backed sessions.

use std::io;
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};

use crate::config::ConnectionConfig;
use crate::error::ConnectionError;
use crate::session::{LineSession, Link};

/// Session over a host serial port.
pub type SerialSession = LineSession<Box<dyn SerialPort>>;

impl Link for Box<dyn SerialPort> {
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.set_timeout(timeout).map_err(io::Error::from)
    }

    fn discard_input(&mut self) -> io::Result<()> {
        self.clear(ClearBuffer::Input).map_err(io::Error::from)
    }

    fn name(&self) -> Option<String> {
        SerialPort::name(&**self)
    }
}

/// Open the configured port and return a ready session.
///
/// Busy, missing or inaccessible ports fail here and nowhere else.
pub fn open(config: ConnectionConfig) -> Result<SerialSession, ConnectionError> {
    config.validate()?;

    let port = serialport::new(&config.port, config.baud_rate)
        .timeout(config.read_timeout)
        .open()
        .map_err(|source| ConnectionError::Open {
            port: config.port.clone(),
            source: source.into(),
        })?;

    LineSession::attach(port, config)
}
