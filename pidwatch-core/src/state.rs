// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! The shared monitored-PID cell.
//!
//! One word-sized value behind atomic load/store. A torn read is the only
//! hazard a plain integer cell has, so atomics suffice; readers are never
//! blocked behind writers and vice versa. Last store wins: a reader that
//! overlaps a store may observe either the old or the new value, never a
//! partial one.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::types::MonitoredPid;

/// Shared cell holding the currently monitored PID.
///
/// Owned explicitly by whoever hosts the control endpoint and shared via
/// `Arc`; there is no process-wide global. Starts at the sentinel 0
/// ("no process selected").
#[derive(Debug)]
pub struct PidCell {
    pid: AtomicI64,
}

impl PidCell {
    /// Create a new cell holding the sentinel value.
    pub fn new() -> Self {
        Self {
            pid: AtomicI64::new(MonitoredPid::NONE.value()),
        }
    }

    /// Create a cell wrapped in an Arc for sharing across threads.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Current value, read with a single atomic load. Never blocks.
    ///
    /// Relaxed ordering is sufficient: this is the only shared cell and no
    /// ordering relative to other memory is promised.
    pub fn load(&self) -> i64 {
        self.pid.load(Ordering::Relaxed)
    }

    /// Replace the value with a single atomic store. Never blocks.
    ///
    /// Taking `MonitoredPid` keeps the non-negative invariant at the type
    /// level: an unvalidated integer cannot reach the cell.
    pub fn store(&self, pid: MonitoredPid) {
        self.pid.store(pid.value(), Ordering::Relaxed);
    }
}

impl Default for PidCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_sentinel() {
        let cell = PidCell::new();
        assert_eq!(cell.load(), 0);
    }

    #[test]
    fn test_store_then_load() {
        let cell = PidCell::new();
        cell.store(MonitoredPid::new(4242).unwrap());
        assert_eq!(cell.load(), 4242);

        cell.store(MonitoredPid::NONE);
        assert_eq!(cell.load(), 0);
    }

    #[test]
    fn test_concurrent_store_load_never_torn() {
        use std::thread;

        let cell = PidCell::new_shared();
        let written: Vec<i64> = (1..=8).map(|i| i * 1_000_003).collect();

        let writers: Vec<_> = written
            .iter()
            .map(|&v| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    cell.store(MonitoredPid::new(v).unwrap());
                })
            })
            .collect();

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || cell.load())
            })
            .collect();

        for handle in writers {
            handle.join().unwrap();
        }
        for handle in readers {
            let observed = handle.join().unwrap();
            assert!(
                observed == 0 || written.contains(&observed),
                "observed value {} was never written",
                observed
            );
        }

        // After all writers finish, the cell holds one of the written values.
        assert!(written.contains(&cell.load()));
    }
}
