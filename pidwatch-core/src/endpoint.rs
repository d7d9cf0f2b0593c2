// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! The control endpoint: snapshot (read) and update (write) over the shared cell.
//!
//! A read renders `Currently monitoring PID: <n>\n` exactly once per open
//! handle. A write parses a base-10 integer out of a bounded payload and,
//! after the privilege gate and full validation, commits it atomically.
//! A rejected write leaves the cell untouched.

use std::sync::Arc;

use crate::auth::{Authorizer, CapabilityGate, Credentials};
use crate::error::ControlError;
use crate::state::PidCell;
use crate::types::MonitoredPid;

/// Fixed capacity of the write-side input buffer. One byte stays reserved,
/// so the largest accepted payload is `INPUT_CAPACITY - 1` bytes.
pub const INPUT_CAPACITY: usize = 32;

/// Recommended read-buffer capacity, comfortably above the widest line the
/// response format can produce.
pub const RESPONSE_CAPACITY: usize = 128;

/// Control endpoint mediating all access to a [`PidCell`].
///
/// Readers need no privilege; writers pass the injected [`Authorizer`]
/// before their payload is even looked at.
pub struct ControlEndpoint {
    cell: Arc<PidCell>,
    authorizer: Arc<dyn Authorizer>,
}

impl ControlEndpoint {
    /// Create an endpoint over `cell` gated by `authorizer`.
    pub fn new(cell: Arc<PidCell>, authorizer: Arc<dyn Authorizer>) -> Self {
        Self { cell, authorizer }
    }

    /// Create an endpoint with the default administrative-capability gate.
    pub fn with_capability_gate(cell: Arc<PidCell>) -> Self {
        Self::new(cell, Arc::new(CapabilityGate))
    }

    /// Open a fresh handle with its own read cursor.
    pub fn open(self: &Arc<Self>) -> EndpointHandle {
        EndpointHandle {
            endpoint: Arc::clone(self),
            cursor: 0,
        }
    }

    /// Snapshot the current value into `out`.
    ///
    /// `cursor` tracks progress on one open handle: the first call produces
    /// the whole line and advances the cursor, every later call returns
    /// `Ok(0)` for end-of-data. Returns the number of bytes copied.
    pub fn snapshot(&self, cursor: &mut u64, out: &mut [u8]) -> Result<usize, ControlError> {
        if *cursor != 0 {
            return Ok(0);
        }

        let pid = self.cell.load();
        let line = format!("Currently monitoring PID: {}\n", pid);

        if line.len() > out.len() {
            return Err(ControlError::ResponseTruncated {
                needed: line.len(),
                capacity: out.len(),
            });
        }

        out[..line.len()].copy_from_slice(line.as_bytes());
        *cursor = line.len() as u64;
        Ok(line.len())
    }

    /// Update the monitored PID from a caller-supplied payload.
    ///
    /// Checks run strictly in order: privilege gate, size bound, bounded
    /// copy, parse, sign validation, then the atomic commit. Returns the
    /// payload length as the number of bytes accepted.
    pub fn update(&self, caller: &Credentials, payload: &[u8]) -> Result<usize, ControlError> {
        if !self.authorizer.allows(caller) {
            return Err(ControlError::PermissionDenied);
        }

        let count = payload.len();
        if count > INPUT_CAPACITY - 1 {
            return Err(ControlError::payload_too_large(count));
        }

        // The bound check above already rejects oversized payloads; the
        // clamp keeps the copy inside the buffer even if it did not.
        let mut buf = [0u8; INPUT_CAPACITY];
        let copied = count.min(INPUT_CAPACITY - 1);
        buf[..copied].copy_from_slice(&payload[..copied]);

        let value = parse_pid(&buf[..copied])?;
        let pid =
            MonitoredPid::new(value).map_err(|_| ControlError::NegativePid { value })?;

        self.cell.store(pid);
        tracing::info!(pid = pid.value(), "now monitoring pid");

        Ok(count)
    }

    /// The cell this endpoint guards.
    pub fn cell(&self) -> &Arc<PidCell> {
        &self.cell
    }
}

/// Per-open cursor over one endpoint.
///
/// Read state lives here, not in the endpoint: two handles over the same
/// endpoint each get the line once.
pub struct EndpointHandle {
    endpoint: Arc<ControlEndpoint>,
    cursor: u64,
}

impl std::fmt::Debug for EndpointHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointHandle")
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl EndpointHandle {
    /// Read the snapshot line; `Ok(0)` once the handle is drained.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize, ControlError> {
        self.endpoint.snapshot(&mut self.cursor, out)
    }

    /// Write a payload through this handle's endpoint.
    pub fn write(&self, caller: &Credentials, payload: &[u8]) -> Result<usize, ControlError> {
        self.endpoint.update(caller, payload)
    }
}

impl std::io::Read for EndpointHandle {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        EndpointHandle::read(self, buf).map_err(Into::into)
    }
}

/// Parse a base-10 signed integer, ignoring a single trailing newline.
fn parse_pid(raw: &[u8]) -> Result<i64, ControlError> {
    let unparsable = || ControlError::UnparsablePid {
        payload: String::from_utf8_lossy(raw).into_owned(),
    };

    let text = std::str::from_utf8(raw).map_err(|_| unparsable())?;
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.parse::<i64>().map_err(|_| unparsable())
}
