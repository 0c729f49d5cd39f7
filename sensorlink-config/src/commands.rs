// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command implementations for device configuration.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use sensorlink_common::payload::{ConnectivityStatus, DeviceReport, PowerStatus};
use sensorlink_common::{Command, DeviceField, LineSession, Link, ResponseBatch};

/// Send a command, showing a spinner for the length of the response window.
fn exchange<L: Link>(session: &mut LineSession<L>, cmd: &Command) -> Result<ResponseBatch> {
    let window = session.config().window_for(cmd);
    let label = cmd.redacted();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("{} (waiting {:.1}s)", label, window.as_secs_f32()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = session.send_with_window(cmd, window);
    spinner.finish_and_clear();

    result.with_context(|| format!("Failed to send {}", label))
}

fn print_lines(batch: &ResponseBatch) {
    if batch.is_empty() {
        println!("  (no response)");
    }
    for line in batch {
        println!("  {}", line);
    }
}

fn show(label: &str, value: Option<&str>) {
    println!("  {:<18} {}", label, value.unwrap_or("-"));
}

/// List serial ports present on this host.
pub fn list_ports() -> Result<()> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;
    if ports.is_empty() {
        println!("No serial ports found.");
        return Ok(());
    }
    for port in ports {
        match port.port_type {
            serialport::SerialPortType::UsbPort(usb) => println!(
                "{}  USB {:04x}:{:04x} {}",
                port.port_name,
                usb.vid,
                usb.pid,
                usb.product.unwrap_or_default()
            ),
            _ => println!("{}", port.port_name),
        }
    }
    Ok(())
}

/// Get and display the device report.
pub fn info<L: Link>(session: &mut LineSession<L>, json: bool) -> Result<()> {
    let batch = exchange(session, &Command::Info)?;

    if json {
        let Some(payload) = batch.extract_json() else {
            print_lines(&batch);
            bail!("No JSON report in device output");
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let Some(report) = DeviceReport::from_batch(&batch) else {
        print_lines(&batch);
        bail!("No device report in output (is the firmware running?)");
    };

    let info = &report.device_info;
    println!("Device:");
    show("Name", info.device_name.as_deref());
    show("Type", info.device_type.as_deref());
    show("ID", info.device_id.as_deref());
    show("Firmware", info.firmware_version.as_deref());
    show("Board", info.board_type.as_deref());
    show("MAC", info.mac_address.as_deref());
    show("Installed", info.installation_date.as_deref());
    show("Location", info.location.as_deref());
    print_connectivity(&report.connectivity_status);
    print_power(&report.power_status);

    Ok(())
}

fn print_connectivity(status: &ConnectivityStatus) {
    println!("Connectivity:");
    show("Status", status.current_status.as_deref());
    show("Type", status.connection_type.as_deref());
    show("IP address", status.ip_address.as_deref());
    show("Signal", status.signal_strength.as_deref());
    show("Last seen", status.last_seen.as_deref());
}

fn print_power(status: &PowerStatus) {
    println!("Power:");
    show("Source", status.power_source.as_deref());
    show("Battery", status.battery_level.as_deref());
    show("Charging", status.charging_status.as_deref());
    show("Voltage", status.voltage_reading.as_deref());
}

/// Get and display connectivity status.
pub fn connection<L: Link>(session: &mut LineSession<L>) -> Result<()> {
    let batch = exchange(session, &Command::InfoConnection)?;
    match ConnectivityStatus::from_batch(&batch) {
        Some(status) => print_connectivity(&status),
        None => {
            print_lines(&batch);
            bail!("No connectivity status in device output");
        }
    }
    Ok(())
}

/// Stage one metadata field, optionally saving it.
pub fn set_device<L: Link>(
    session: &mut LineSession<L>,
    field: DeviceField,
    value: &str,
    save_after: bool,
) -> Result<()> {
    let cmd = Command::set_device(field, value)?;
    println!("Setting {} to \"{}\"...", field, value);
    print_lines(&exchange(session, &cmd)?);

    if save_after {
        save(session)?;
    } else {
        println!("Staged. Use 'save' to persist it on the device.");
    }
    Ok(())
}

/// Stage Wi-Fi credentials, optionally saving them.
pub fn set_wifi<L: Link>(
    session: &mut LineSession<L>,
    ssid: &str,
    password: &str,
    save_after: bool,
) -> Result<()> {
    let cmd = Command::set_wifi(ssid, password)?;
    println!("Setting Wi-Fi network to \"{}\"...", ssid);
    print_lines(&exchange(session, &cmd)?);

    if save_after {
        save(session)?;
    } else {
        println!("Staged. Use 'save' to persist it on the device.");
    }
    Ok(())
}

/// Persist staged configuration.
pub fn save<L: Link>(session: &mut LineSession<L>) -> Result<()> {
    println!("Saving configuration...");
    let batch = exchange(session, &Command::SaveConfig)?;
    print_lines(&batch);
    if batch.is_empty() {
        println!("No acknowledgement; run 'info' to check the device state.");
    }
    Ok(())
}

/// Restore the default configuration.
pub fn reset<L: Link>(session: &mut LineSession<L>) -> Result<()> {
    println!("Resetting configuration to defaults...");
    print_lines(&exchange(session, &Command::ResetConfig)?);
    Ok(())
}

/// Stage fields and credentials, save, then verify through `INFO`.
pub fn configure<L: Link>(
    session: &mut LineSession<L>,
    fields: &[(DeviceField, String)],
    wifi: Option<(String, String)>,
    save_after: bool,
) -> Result<()> {
    if fields.is_empty() && wifi.is_none() {
        bail!("Nothing to configure (give --name, --location, --installation-date or --ssid/--password)");
    }

    for (field, value) in fields {
        let cmd = Command::set_device(*field, value.as_str())?;
        println!("Setting {} to \"{}\"...", field, value);
        print_lines(&exchange(session, &cmd)?);
    }
    if let Some((ssid, password)) = &wifi {
        let cmd = Command::set_wifi(ssid.as_str(), password.as_str())?;
        println!("Setting Wi-Fi network to \"{}\"...", ssid);
        print_lines(&exchange(session, &cmd)?);
    }
    if save_after {
        save(session)?;
    }

    println!();
    println!("Verifying...");
    let batch = exchange(session, &Command::Info)?;
    let Some(report) = DeviceReport::from_batch(&batch) else {
        print_lines(&batch);
        bail!("Could not read back the device report");
    };

    let mut mismatches = 0;
    for (field, expected) in fields {
        match report.field(*field) {
            Some(actual) if actual == expected => {
                println!("  {:<18} {} (ok)", field.report_key(), actual);
            }
            actual => {
                mismatches += 1;
                println!(
                    "  {:<18} expected \"{}\", device reports \"{}\"",
                    field.report_key(),
                    expected,
                    actual.unwrap_or("-")
                );
            }
        }
    }

    if mismatches > 0 {
        bail!("{} field(s) not applied by the device", mismatches);
    }
    println!();
    println!("Configuration applied successfully!");
    Ok(())
}

/// Send an arbitrary command line and dump the response.
pub fn send_raw<L: Link>(session: &mut LineSession<L>, line: &str) -> Result<()> {
    let cmd = Command::raw(line)?;
    let batch = exchange(session, &cmd)?;
    print_lines(&batch);

    if let Some(payload) = batch.extract_json() {
        println!();
        println!("JSON payload:");
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(())
}
