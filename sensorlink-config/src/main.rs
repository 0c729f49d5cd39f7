// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Configuration tool for SensorLink devices over a serial line.
//!
//! Usage:
//!   sensorlink-config --port /dev/ttyUSB0 info
//!   sensorlink-config --port /dev/ttyUSB0 set-device device-name SmartSensor-01 --save
//!   sensorlink-config --port COM3 configure --name SmartSensor-01 --location "Living Room"
//!   sensorlink-config --config bench.toml send INFO_CONNECTION

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    cli::run(args)
}
