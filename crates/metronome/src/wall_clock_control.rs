// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::WallClock;
use crate::wall_clock::duration_millis;

/// Controls the flow of wall time in tests.
///
/// This is useful for testing frame-clock behavior without waiting for real time to pass:
/// pause durations, session totals and wall deltas all become exact.
/// `WallClockControl` is available when the `test-util` feature is enabled.
///
/// To create a [`WallClock`] from `WallClockControl`, use [`WallClockControl::to_wall_clock`].
///
/// # Examples
///
/// ## Advancing time manually
///
/// ```
/// # use std::time::Duration;
/// # use metronome::WallClockControl;
/// let control = WallClockControl::new();
/// let clock = control.to_wall_clock();
///
/// let before = clock.now_ms();
/// control.advance(Duration::from_secs(1));
///
/// assert_eq!(clock.now_ms() - before, 1000.0);
/// ```
///
/// ## Advancing time automatically
///
/// ```
/// # use std::time::Duration;
/// # use metronome::WallClockControl;
/// let clock = WallClockControl::new()
///     .auto_advance(Duration::from_millis(16))
///     .to_wall_clock();
///
/// let first = clock.now_ms();
/// let second = clock.now_ms();
///
/// assert_eq!(second - first, 16.0);
/// ```
///
/// # Production code and `WallClockControl`
///
/// Never enable the `test-util` feature in production code. Only enable it for
/// `dev-dependencies`.
///
/// ```toml
/// metronome = { version = "*", features = ["test-util"] }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WallClockControl {
    state: Arc<Mutex<State>>,
}

impl WallClockControl {
    /// Creates a new `WallClockControl` whose time starts at the UNIX epoch with no auto-advance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `WallClockControl` whose time starts `millis` milliseconds after the UNIX epoch.
    ///
    /// # Examples
    ///
    /// ```
    /// use metronome::WallClockControl;
    ///
    /// let clock = WallClockControl::new_at(5000.0).to_wall_clock();
    ///
    /// assert_eq!(clock.now_ms(), 5000.0);
    /// ```
    #[must_use]
    pub fn new_at(millis: f64) -> Self {
        let this = Self::new();
        this.advance_to(millis);
        this
    }

    /// Converts the `WallClockControl` to a [`WallClock`] that reads the controlled time.
    #[must_use]
    pub fn to_wall_clock(&self) -> WallClock {
        WallClock::with_control(self)
    }

    /// Sets the duration by which the time auto-advances every time it is read.
    #[must_use]
    pub fn auto_advance(self, duration: Duration) -> Self {
        self.with_state(|s| s.auto_advance_ms = duration_millis(duration));
        self
    }

    /// Manually advances the time by the specified duration.
    pub fn advance(&self, duration: Duration) {
        self.advance_millis(duration_millis(duration));
    }

    /// Manually advances the time by a (possibly fractional) number of milliseconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use metronome::WallClockControl;
    ///
    /// let control = WallClockControl::new();
    /// let clock = control.to_wall_clock();
    ///
    /// control.advance_millis(16.5);
    ///
    /// assert_eq!(clock.now_ms(), 16.5);
    /// ```
    pub fn advance_millis(&self, millis: f64) {
        self.with_state(|s| s.millis += millis);
    }

    /// Moves the time to an absolute reading in milliseconds since the UNIX epoch.
    ///
    /// The time can be moved backward. This simulates a system clock change, which the
    /// frame clock does not correct.
    pub fn advance_to(&self, millis: f64) {
        self.with_state(|s| s.millis = millis);
    }

    pub(crate) fn now_ms(&self) -> f64 {
        self.with_state(State::now)
    }

    fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut State) -> R,
    {
        f(&mut self.state.lock())
    }
}

impl From<WallClockControl> for WallClock {
    fn from(control: WallClockControl) -> Self {
        control.to_wall_clock()
    }
}

impl From<&WallClockControl> for WallClock {
    fn from(control: &WallClockControl) -> Self {
        control.to_wall_clock()
    }
}

#[derive(Debug, Default)]
struct State {
    millis: f64,
    auto_advance_ms: f64,
}

impl State {
    fn now(&mut self) -> f64 {
        let time = self.millis;
        self.millis += self.auto_advance_ms;
        time
    }
}
