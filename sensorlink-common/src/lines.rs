// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Line assembly for a noisy text byte stream.
//!
//! Bytes are buffered until a `\n` arrives, then the whole line is decoded.
//! Decoding per line (not per read) keeps multi-byte characters intact when a
//! read splits them. Invalid UTF-8 sequences are dropped, never replaced.

/// Decode `bytes` as UTF-8, skipping invalid sequences.
///
/// Returns the decoded text and the number of bytes that were dropped.
pub fn decode_dropping_invalid(bytes: &[u8]) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0;
    let mut rest = bytes;

    loop {
        match core::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                // from_utf8 already validated this prefix
                text.push_str(core::str::from_utf8(valid).unwrap_or_default());
                // None means the input ends mid-sequence
                let skip = e.error_len().unwrap_or(after.len());
                dropped += skip;
                rest = &after[skip..];
            }
        }
    }

    (text, dropped)
}

/// Incremental splitter turning raw reads into trimmed, non-empty lines.
#[derive(Debug, Default)]
pub struct LineAssembler {
    pending: Vec<u8>,
    dropped: usize,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed freshly read bytes; returns every line completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for chunk in bytes.split_inclusive(|&b| b == b'\n') {
            self.pending.extend_from_slice(chunk);
            if chunk.ends_with(b"\n") {
                if let Some(line) = self.take_pending() {
                    lines.push(line);
                }
            }
        }
        lines
    }

    /// Flush a partial line left over when the read window closes.
    pub fn finish(&mut self) -> Option<String> {
        self.take_pending()
    }

    /// True if bytes of an unterminated line are buffered.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Total invalid bytes dropped so far.
    pub fn dropped_bytes(&self) -> usize {
        self.dropped
    }

    fn take_pending(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let (text, dropped) = decode_dropping_invalid(&self.pending);
        self.pending.clear();
        self.dropped += dropped;

        let line = text.trim();
        if line.is_empty() {
            None
        } else {
            Some(line.to_string())
        }
    }
}

