// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use sensorlink_common::{ConnectionConfig, DeviceField, SerialSession};

use crate::commands;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "sensorlink-config")]
#[command(about = "Read and change SensorLink device configuration over a serial line")]
pub struct Cli {
    /// Serial port (e.g., /dev/ttyUSB0 or COM3)
    #[arg(short, long, global = true)]
    pub port: Option<String>,

    /// Baud rate
    #[arg(short, long, global = true)]
    pub baud: Option<u32>,

    /// Per-read timeout in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// Response window in milliseconds (overrides per-command defaults)
    #[arg(short, long, value_name = "MS", global = true)]
    pub window_ms: Option<u64>,

    /// Wait after opening the port before the first command, in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub settle_ms: Option<u64>,

    /// Connection profile (TOML); flags override its values
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List serial ports present on this host
    Ports,

    /// Show the device report (INFO)
    Info {
        /// Print the raw JSON payload instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show connectivity and power status (INFO_CONNECTION)
    Connection,

    /// Stage a device metadata field
    SetDevice {
        #[arg(value_enum)]
        field: FieldArg,

        value: String,

        /// Persist immediately with SAVE_CONFIG
        #[arg(long)]
        save: bool,
    },

    /// Stage Wi-Fi credentials
    SetWifi {
        ssid: String,

        password: String,

        /// Persist immediately with SAVE_CONFIG
        #[arg(long)]
        save: bool,
    },

    /// Persist staged configuration on the device
    Save,

    /// Restore the device's default configuration
    Reset,

    /// Stage several settings, save them and verify the device reports them
    Configure {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        location: Option<String>,

        /// Installation date (e.g., 2024-01-15)
        #[arg(long)]
        installation_date: Option<String>,

        #[arg(long, requires = "password")]
        ssid: Option<String>,

        #[arg(long, requires = "ssid")]
        password: Option<String>,

        /// Stage only, skip SAVE_CONFIG
        #[arg(long)]
        no_save: bool,
    },

    /// Send a raw command line and print whatever comes back
    Send {
        #[arg(value_name = "COMMAND")]
        line: String,
    },
}

/// Settable device field as spelled on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldArg {
    DeviceName,
    Location,
    InstallationDate,
}

impl From<FieldArg> for DeviceField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::DeviceName => DeviceField::DeviceName,
            FieldArg::Location => DeviceField::Location,
            FieldArg::InstallationDate => DeviceField::InstallationDate,
        }
    }
}

impl Cli {
    /// Log filter implied by `-v` when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Merge the optional profile file with command-line overrides.
    pub fn connection_config(&self) -> Result<ConnectionConfig> {
        let mut config = match &self.config {
            Some(path) => ConnectionConfig::from_file(path)?,
            None => ConnectionConfig::default(),
        };

        if let Some(port) = &self.port {
            config.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(ms) = self.timeout_ms {
            config.read_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.settle_ms {
            config.settle_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.window_ms {
            config.window = Some(Duration::from_millis(ms));
        }

        if config.port.is_empty() {
            bail!("No serial port given (use --port or a --config profile)");
        }
        Ok(config)
    }
}

/// Execute the parsed CLI command.
pub fn run(cli: Cli) -> Result<()> {
    let connect = || -> Result<SerialSession> {
        let config = cli.connection_config()?;
        debug!(?config, "resolved connection config");
        let port = config.port.clone();
        let session = sensorlink_common::open(config)
            .with_context(|| format!("Could not connect to {}", port))?;
        println!("Connected to {}", session.port_name());
        Ok(session)
    };

    match &cli.command {
        Commands::Ports => commands::list_ports(),
        Commands::Info { json } => commands::info(&mut connect()?, *json),
        Commands::Connection => commands::connection(&mut connect()?),
        Commands::SetDevice { field, value, save } => {
            commands::set_device(&mut connect()?, (*field).into(), value, *save)
        }
        Commands::SetWifi {
            ssid,
            password,
            save,
        } => commands::set_wifi(&mut connect()?, ssid, password, *save),
        Commands::Save => commands::save(&mut connect()?),
        Commands::Reset => commands::reset(&mut connect()?),
        Commands::Configure {
            name,
            location,
            installation_date,
            ssid,
            password,
            no_save,
        } => {
            let mut fields = Vec::new();
            if let Some(v) = name {
                fields.push((DeviceField::DeviceName, v.clone()));
            }
            if let Some(v) = location {
                fields.push((DeviceField::Location, v.clone()));
            }
            if let Some(v) = installation_date {
                fields.push((DeviceField::InstallationDate, v.clone()));
            }
            let wifi = ssid.clone().zip(password.clone());
            commands::configure(&mut connect()?, &fields, wifi, !no_save)
        }
        Commands::Send { line } => commands::send_raw(&mut connect()?, line),
    }
}
