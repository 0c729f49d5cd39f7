// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Line session: send one command line, collect the reply for a fixed window.
//!
//! The session owns its link. It is either open (link present) or closed;
//! `close` and `Drop` release the link and closing twice is a no-op.
//!
//! A response window is purely time-bounded. Bytes still in flight when it
//! closes stay in the link and show up in the next window, so a slow device
//! can have one reply line split in two (the tail of the first window is
//! flushed as a truncated line). Nothing tries to reassemble it.

use std::io::{self, Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::config::ConnectionConfig;
use crate::error::{ConnectionError, SessionError};
use crate::lines::LineAssembler;
use crate::payload;
use crate::protocol::{check_single_line, Command, LINE_TERMINATOR};

/// Sleep between reads that returned no data.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

const READ_CHUNK: usize = 256;

/// Byte stream a session can drive. Implemented for serial ports.
pub trait Link: Read + Write {
    /// Ceiling for the next blocking read.
    fn set_read_timeout(&mut self, timeout: Duration) -> io::Result<()>;

    /// Throw away whatever input is already buffered.
    fn discard_input(&mut self) -> io::Result<()>;

    /// Human-readable name of the underlying port, if it has one.
    fn name(&self) -> Option<String> {
        None
    }
}

/// Lines received during one response window, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBatch {
    lines: Vec<String>,
}

impl ResponseBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// All lines joined with the line terminator.
    pub fn text(&self) -> String {
        self.lines.join(LINE_TERMINATOR)
    }

    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.iter().any(|line| line.contains(needle))
    }

    /// First JSON value embedded in the batch, see [`payload::extract_json`].
    pub fn extract_json(&self) -> Option<Value> {
        payload::extract_json(self)
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl<S: Into<String>> FromIterator<S> for ResponseBatch {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResponseBatch {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Command/response session over an exclusively owned link.
pub struct LineSession<L: Link> {
    link: Option<L>,
    config: ConnectionConfig,
}

impl<L: Link> LineSession<L> {
    /// A session that was never opened. Every exchange fails with
    /// [`SessionError::Closed`]; closing it is allowed.
    pub fn closed(config: ConnectionConfig) -> Self {
        Self { link: None, config }
    }

    /// Wrap a link that is already usable, without settling or draining.
    pub fn from_link(link: L, config: ConnectionConfig) -> Self {
        Self {
            link: Some(link),
            config,
        }
    }

    /// Wrap a freshly opened link: wait for the device to settle, then
    /// discard whatever it printed while booting.
    pub fn attach(mut link: L, config: ConnectionConfig) -> Result<Self, ConnectionError> {
        if !config.settle_delay.is_zero() {
            debug!("waiting {:?} for device to settle", config.settle_delay);
            thread::sleep(config.settle_delay);
        }
        link.discard_input()
            .map_err(|source| ConnectionError::Prepare {
                port: config.port.clone(),
                source,
            })?;
        info!(port = %config.port, baud = config.baud_rate, "session open");
        Ok(Self::from_link(link, config))
    }

    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Port name reported by the link, falling back to the configured one.
    pub fn port_name(&self) -> String {
        self.link
            .as_ref()
            .and_then(Link::name)
            .unwrap_or_else(|| self.config.port.clone())
    }

    pub fn link(&self) -> Option<&L> {
        self.link.as_ref()
    }

    pub fn link_mut(&mut self) -> Option<&mut L> {
        self.link.as_mut()
    }

    /// Send a typed command and collect its reply for the configured window.
    pub fn send(&mut self, cmd: &Command) -> Result<ResponseBatch, SessionError> {
        let window = self.config.window_for(cmd);
        self.send_with_window(cmd, window)
    }

    /// Send a typed command and collect its reply for `window`.
    pub fn send_with_window(
        &mut self,
        cmd: &Command,
        window: Duration,
    ) -> Result<ResponseBatch, SessionError> {
        self.exchange(&cmd.to_line(), &cmd.redacted(), window)
    }

    /// Send `command` verbatim plus one line terminator, then collect every
    /// non-empty line that arrives within `window`.
    pub fn send_command(
        &mut self,
        command: &str,
        window: Duration,
    ) -> Result<ResponseBatch, SessionError> {
        self.exchange(command, command, window)
    }

    /// Release the link. Safe to call any number of times.
    pub fn close(&mut self) {
        if self.link.take().is_some() {
            info!(port = %self.config.port, "session closed");
        }
    }

    fn exchange(
        &mut self,
        line: &str,
        log_line: &str,
        window: Duration,
    ) -> Result<ResponseBatch, SessionError> {
        check_single_line(line)?;
        let read_timeout = self.config.read_timeout;
        let link = self.link.as_mut().ok_or(SessionError::Closed)?;

        debug!("> {}", log_line);
        let mut frame = String::with_capacity(line.len() + LINE_TERMINATOR.len());
        frame.push_str(line);
        frame.push_str(LINE_TERMINATOR);
        link.write_all(frame.as_bytes())?;
        link.flush()?;

        Ok(collect(link, window, read_timeout))
    }
}

impl<L: Link> Drop for LineSession<L> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Read until `window` has elapsed. Never fails: decode noise is dropped and
/// a broken read ends the window early with what was gathered so far.
fn collect<L: Link>(link: &mut L, window: Duration, read_timeout: Duration) -> ResponseBatch {
    // No deadline when the window is too large to represent
    let deadline = Instant::now().checked_add(window);
    let mut batch = ResponseBatch::new();
    let mut assembler = LineAssembler::new();
    let mut buf = [0u8; READ_CHUNK];

    loop {
        let now = Instant::now();
        let remaining = match deadline {
            Some(deadline) if now >= deadline => break,
            Some(deadline) => deadline - now,
            None => Duration::MAX,
        };

        if let Err(e) = link.set_read_timeout(remaining.min(read_timeout)) {
            warn!(%e, "failed to set read timeout, closing window early");
            break;
        }

        match link.read(&mut buf) {
            Ok(0) => idle(remaining),
            Ok(n) => {
                for line in assembler.push(&buf[..n]) {
                    debug!("< {}", line);
                    batch.push(line);
                }
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                idle(remaining)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                warn!(%e, "read failed, closing window early");
                break;
            }
        }
    }

    if let Some(line) = assembler.finish() {
        debug!("< {} (window closed mid-line)", line);
        batch.push(line);
    }
    if assembler.dropped_bytes() > 0 {
        trace!("dropped {} undecodable bytes", assembler.dropped_bytes());
    }

    batch
}

fn idle(remaining: Duration) {
    thread::sleep(POLL_INTERVAL.min(remaining));
}
