// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Injectable time source for expiry decisions.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;

/// Provides the current time to the cache.
///
/// Working with time is notoriously difficult to test. The clock makes the
/// passage of time an injected dependency: production code uses
/// [`Clock::new`], which follows the system clock, while tests construct a
/// frozen clock through [`ClockControl`] and advance it manually. This makes
/// expiry tests fast and deterministic.
///
/// Cloning a clock is inexpensive (an `Arc` clone) and every clone shares the
/// same underlying state: advancing time through a [`ClockControl`] is
/// visible to every clone of its clock.
///
/// # Examples
///
/// ```
/// use profilon::{Clock, ClockControl};
/// use std::time::Duration;
///
/// let control = ClockControl::new();
/// let clock = control.to_clock();
///
/// let before = clock.system_time();
/// control.advance(Duration::from_secs(60));
/// assert_eq!(clock.system_time(), before + Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct Clock(ClockState);

#[derive(Debug, Clone)]
enum ClockState {
    System,
    Manual(Arc<Mutex<SystemTime>>),
}

impl Clock {
    /// Creates a clock that follows the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self(ClockState::System)
    }

    /// Creates a clock frozen at the Unix epoch.
    ///
    /// Useful when a test needs stable timestamps but never advances time;
    /// to control the passage of time, construct a [`ClockControl`] instead.
    #[must_use]
    pub fn new_frozen() -> Self {
        ClockControl::new().to_clock()
    }

    /// Creates a clock frozen at the given point in time.
    #[must_use]
    pub fn new_frozen_at(time: SystemTime) -> Self {
        ClockControl::new_at(time).to_clock()
    }

    /// Returns the current absolute time according to this clock.
    #[must_use]
    pub fn system_time(&self) -> SystemTime {
        match &self.0 {
            ClockState::System => SystemTime::now(),
            ClockState::Manual(now) => *now.lock(),
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Manual control over the passage of time, for tests.
///
/// A `ClockControl` owns a frozen point in time; [`to_clock`](Self::to_clock)
/// hands out clocks that share it. Advancing the control moves every clock
/// derived from it.
///
/// # Examples
///
/// ```
/// use profilon::ClockControl;
/// use std::time::{Duration, SystemTime};
///
/// let control = ClockControl::new_at(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));
/// let clock = control.to_clock();
///
/// control.advance_millis(250);
/// assert_eq!(
///     clock.system_time(),
///     SystemTime::UNIX_EPOCH + Duration::from_millis(1_000_250)
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ClockControl(Arc<Mutex<SystemTime>>);

impl ClockControl {
    /// Creates a control frozen at the Unix epoch.
    #[must_use]
    pub fn new() -> Self {
        Self::new_at(SystemTime::UNIX_EPOCH)
    }

    /// Creates a control frozen at the given point in time.
    #[must_use]
    pub fn new_at(time: SystemTime) -> Self {
        Self(Arc::new(Mutex::new(time)))
    }

    /// Returns a clock sharing this control's state.
    #[must_use]
    pub fn to_clock(&self) -> Clock {
        Clock(ClockState::Manual(Arc::clone(&self.0)))
    }

    /// Moves time forward by the given duration.
    pub fn advance(&self, duration: Duration) {
        let mut now = self.0.lock();
        *now += duration;
    }

    /// Moves time forward by the given number of milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl Default for ClockControl {
    fn default() -> Self {
        Self::new()
    }
}
