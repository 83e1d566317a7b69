// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::{Duration, SystemTime};

/// Source of wall-clock time for a [`Clock`][crate::Clock], in milliseconds.
///
/// Wall time is the host's real-world time expressed as milliseconds since the UNIX epoch.
/// It is sampled once per [`Clock::update`][crate::Clock::update] and whenever the clock
/// needs an out-of-cadence reading (refresh, resume).
///
/// In production the wall clock reads [`SystemTime::now`]. When the `test-util` feature is
/// enabled, a wall clock can instead be driven by a
/// [`WallClockControl`][crate::WallClockControl], which makes every reading deterministic.
///
/// > **Note**: System time is not monotonic. The frame clock treats wall time as
/// > non-decreasing by contract and does not correct backward jumps.
///
/// # Cloning and shared state
///
/// Cloning a wall clock is inexpensive. Clones created from the same controlled clock observe
/// the same controlled time.
///
/// # Examples
///
/// ```
/// use metronome::WallClock;
///
/// let clock = WallClock::new_system();
///
/// let first = clock.now_ms();
/// let second = clock.now_ms();
///
/// assert!(second >= first);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WallClock(WallClockRepr);

#[derive(Debug, Clone, Default)]
enum WallClockRepr {
    #[default]
    System,
    #[cfg(any(feature = "test-util", test))]
    Control(crate::WallClockControl),
}

impl WallClock {
    /// Creates a wall clock that reads the operating system's clock.
    #[must_use]
    pub fn new_system() -> Self {
        Self(WallClockRepr::System)
    }

    /// Creates a wall clock frozen at the UNIX epoch.
    ///
    /// This is a convenience method equivalent to calling `WallClockControl::new().to_wall_clock()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use metronome::WallClock;
    ///
    /// let clock = WallClock::new_frozen();
    ///
    /// assert_eq!(clock.now_ms(), 0.0);
    /// assert_eq!(clock.now_ms(), 0.0);
    /// ```
    #[cfg(any(feature = "test-util", test))]
    #[must_use]
    pub fn new_frozen() -> Self {
        crate::WallClockControl::new().to_wall_clock()
    }

    /// Creates a wall clock frozen at `millis` milliseconds after the UNIX epoch.
    #[cfg(any(feature = "test-util", test))]
    #[must_use]
    pub fn new_frozen_at(millis: f64) -> Self {
        crate::WallClockControl::new_at(millis).to_wall_clock()
    }

    #[cfg(any(feature = "test-util", test))]
    pub(crate) fn with_control(control: &crate::WallClockControl) -> Self {
        Self(WallClockRepr::Control(control.clone()))
    }

    /// Reads the current wall time in milliseconds since the UNIX epoch.
    ///
    /// A system clock set before the epoch reads as `0.0`.
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        match &self.0 {
            WallClockRepr::System => system_millis(SystemTime::now()),
            #[cfg(any(feature = "test-util", test))]
            WallClockRepr::Control(control) => control.now_ms(),
        }
    }

    /// Reads the current wall time as a [`SystemTime`].
    #[must_use]
    pub fn system_time(&self) -> SystemTime {
        match &self.0 {
            WallClockRepr::System => SystemTime::now(),
            #[cfg(any(feature = "test-util", test))]
            WallClockRepr::Control(control) => {
                SystemTime::UNIX_EPOCH + Duration::from_secs_f64(control.now_ms().max(0.0) / 1000.0)
            }
        }
    }
}

fn system_millis(time: SystemTime) -> f64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0.0, duration_millis)
}

pub(crate) fn duration_millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
