// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::Timestamp;

/// A clock that provides the current UTC time
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Timestamp;
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(Utc::now())
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<Timestamp>>,
}

impl FakeClock {
    /// Starts at 2026-01-30T08:14:09Z.
    pub fn new() -> Self {
        Self::at(Timestamp::from_unix_secs(1_769_760_849).unwrap_or_else(|| SystemClock.now()))
    }

    pub fn at(start: Timestamp) -> Self {
        Self { current: Arc::new(Mutex::new(start)) }
    }

    /// Advance the clock by the given duration (whole seconds)
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock();
        let secs = current.unix_secs().saturating_add(duration.as_secs() as i64);
        if let Some(next) = Timestamp::from_unix_secs(secs) {
            *current = next;
        }
    }

    /// Set the clock to a specific instant
    pub fn set(&self, ts: Timestamp) {
        *self.current.lock() = ts;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Timestamp {
        *self.current.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
