// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Simulated device firmware behind a [`Link`], shared by integration tests.
//!
//! Output is scheduled with a due time so tests can model a slow device.
//! Reads block up to the configured timeout like a real serial port.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use sensorlink_common::{ConnectionConfig, LineSession, Link};

pub const DEFAULT_NAME: &str = "SensorNode";
pub const DEFAULT_LOCATION: &str = "Unknown";
pub const DEFAULT_INSTALLATION_DATE: &str = "2024-01-01";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub device_name: String,
    pub location: String,
    pub installation_date: String,
    pub ssid: String,
    pub password: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_name: DEFAULT_NAME.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            installation_date: DEFAULT_INSTALLATION_DATE.to_string(),
            ssid: String::new(),
            password: String::new(),
        }
    }
}

enum Output {
    Bytes(Vec<u8>),
    Fail(io::ErrorKind),
}

pub struct SimulatedDevice {
    pub working: DeviceConfig,
    pub saved: DeviceConfig,
    /// Answer commands like the firmware does; off for scripted output only.
    pub responsive: bool,
    /// Delay between receiving a command and starting to answer it.
    pub reply_delay: Duration,
    written: Vec<u8>,
    rx_line: Vec<u8>,
    outbox: VecDeque<(Instant, Output)>,
    read_timeout: Duration,
    timeouts_set: Vec<Duration>,
    discards: usize,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self {
            working: DeviceConfig::default(),
            saved: DeviceConfig::default(),
            responsive: true,
            reply_delay: Duration::ZERO,
            written: Vec::new(),
            rx_line: Vec::new(),
            outbox: VecDeque::new(),
            read_timeout: Duration::from_millis(100),
            timeouts_set: Vec::new(),
            discards: 0,
        }
    }

    /// A device that never answers; output comes only from `schedule`.
    pub fn silent() -> Self {
        Self {
            responsive: false,
            ..Self::new()
        }
    }

    /// Queue raw bytes to become readable `after` from now.
    pub fn schedule(&mut self, after: Duration, bytes: &[u8]) {
        self.outbox
            .push_back((Instant::now() + after, Output::Bytes(bytes.to_vec())));
    }

    /// Queue a read failure `after` from now.
    pub fn schedule_failure(&mut self, after: Duration, kind: io::ErrorKind) {
        self.outbox.push_back((Instant::now() + after, Output::Fail(kind)));
    }

    /// Everything the host has written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn timeouts_set(&self) -> &[Duration] {
        &self.timeouts_set
    }

    pub fn discards(&self) -> usize {
        self.discards
    }

    pub fn pending_output(&self) -> usize {
        self.outbox.len()
    }

    fn reply(&mut self, lines: &[String]) {
        let due = Instant::now() + self.reply_delay;
        for line in lines {
            let mut bytes = line.clone().into_bytes();
            bytes.extend_from_slice(b"\r\n");
            self.outbox.push_back((due, Output::Bytes(bytes)));
        }
    }

    fn handle_command(&mut self, command: &str) {
        let mut lines = vec![format!("[DEBUG] Processing command: '{command}'")];

        let mut parts = command.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("INFO"), None, None) => {
                lines.push("[DEBUG] INFO command matched, sending response...".to_string());
                lines.extend(self.info_lines());
            }
            (Some("INFO_CONNECTION"), None, None) => lines.extend(self.state_lines()),
            (Some("SET_DEVICE"), Some(field), Some(value)) => {
                let target = match field {
                    "DEVICE_NAME" => Some(&mut self.working.device_name),
                    "LOCATION" => Some(&mut self.working.location),
                    "INSTALLATION_DATE" => Some(&mut self.working.installation_date),
                    _ => None,
                };
                match target {
                    Some(slot) => {
                        *slot = value.to_string();
                        lines.push(format!("[OK] {field} updated to {value}"));
                    }
                    None => lines.push(format!("[ERROR] Unknown field: {field}")),
                }
            }
            (Some("SET_WIFI"), Some(ssid), Some(password)) => {
                self.working.ssid = ssid.to_string();
                self.working.password = password.to_string();
                lines.push(format!("[OK] WiFi credentials updated for {ssid}"));
            }
            (Some("SAVE_CONFIG"), None, None) => {
                self.saved = self.working.clone();
                lines.push("[OK] Configuration saved to EEPROM".to_string());
            }
            (Some("RESET_CONFIG"), None, None) => {
                self.working = DeviceConfig::default();
                self.saved = DeviceConfig::default();
                lines.push("[OK] Configuration reset to defaults".to_string());
            }
            _ => lines.push(format!("[ERROR] Unknown command: {command}")),
        }

        self.reply(&lines);
    }

    fn info_lines(&self) -> Vec<String> {
        let cfg = &self.working;
        let mut lines = vec![
            "{".to_string(),
            "  \"device_info\": {".to_string(),
            format!("    \"device_name\": \"{}\",", cfg.device_name),
            "    \"device_repo\": \"sensor-node-fw\",".to_string(),
            "    \"device_type\": \"health-monitor\",".to_string(),
            "    \"device_id\": \"ESP-00A1B2\",".to_string(),
            "    \"firmware_version\": \"1.2.0\",".to_string(),
            "    \"board_type\": \"ESP8266\",".to_string(),
            "    \"mac_address\": \"5C:CF:7F:00:A1:B2\",".to_string(),
            format!("    \"installation_date\": \"{}\",", cfg.installation_date),
            format!("    \"location\": \"{}\"", cfg.location),
            "  },".to_string(),
        ];
        lines.extend(self.state_lines());
        lines
    }

    fn state_lines(&self) -> Vec<String> {
        let online = !self.working.ssid.is_empty();
        vec![
            "  \"connectivity_status\": {".to_string(),
            format!(
                "    \"current_status\": \"{}\",",
                if online { "Online" } else { "Offline" }
            ),
            "    \"last_seen\": \"Not available\",".to_string(),
            "    \"connection_type\": \"Wi-Fi\",".to_string(),
            "    \"ip_address\": \"Not available\",".to_string(),
            "    \"signal_strength\": \"Not available\"".to_string(),
            "  },".to_string(),
            "  \"power_status\": {".to_string(),
            "    \"power_source\": \"USB (PC Connection)\",".to_string(),
            "    \"battery_level\": \"N/A (USB Powered)\",".to_string(),
            "    \"charging_status\": \"External Power\",".to_string(),
            "    \"voltage_reading\": \"0.12V\"".to_string(),
            "  }".to_string(),
            "}".to_string(),
        ]
    }

    fn take_ready(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.outbox.pop_front() {
            Some((_, Output::Fail(kind))) => Err(io::Error::new(kind, "simulated failure")),
            Some((due, Output::Bytes(mut bytes))) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    let rest = bytes.split_off(n);
                    self.outbox.push_front((due, Output::Bytes(rest)));
                }
                Ok(n)
            }
            None => Ok(0),
        }
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Read for SimulatedDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let deadline = Instant::now() + self.read_timeout;
        loop {
            let now = Instant::now();
            if let Some((due, _)) = self.outbox.front() {
                if *due <= now {
                    return self.take_ready(buf);
                }
                if *due <= deadline {
                    thread::sleep(*due - now);
                    continue;
                }
            }
            if now < deadline {
                thread::sleep(deadline - now);
            }
            return Err(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
        }
    }
}

impl Write for SimulatedDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        for &byte in buf {
            if byte == b'\n' {
                let line = String::from_utf8_lossy(&self.rx_line).trim().to_string();
                self.rx_line.clear();
                if self.responsive && !line.is_empty() {
                    self.handle_command(&line);
                }
            } else {
                self.rx_line.push(byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Link for SimulatedDevice {
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.timeouts_set.push(timeout);
        self.read_timeout = timeout;
        Ok(())
    }

    fn discard_input(&mut self) -> io::Result<()> {
        self.discards += 1;
        let now = Instant::now();
        self.outbox.retain(|(due, _)| *due > now);
        Ok(())
    }

    fn name(&self) -> Option<String> {
        Some("sim0".to_string())
    }
}

/// Config suitable for tests: no settle delay, short read timeout.
pub fn test_config() -> ConnectionConfig {
    ConnectionConfig {
        port: "sim0".to_string(),
        settle_delay: Duration::ZERO,
        read_timeout: Duration::from_millis(50),
        ..ConnectionConfig::default()
    }
}

/// Open session on a fresh simulated device.
pub fn open_session(device: SimulatedDevice) -> LineSession<SimulatedDevice> {
    LineSession::from_link(device, test_config())
}
