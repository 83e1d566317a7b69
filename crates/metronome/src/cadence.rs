// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::FixedStep;

/// How the external frame scheduler decides when to call [`Clock::update`][crate::Clock::update].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(any(feature = "serde", test), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(feature = "serde", test), serde(rename_all = "snake_case"))]
pub enum SchedulerMode {
    /// Calls are aligned to the display refresh; the cadence is handled by the platform.
    #[default]
    Vsync,

    /// Calls are re-armed with a fixed delay after each frame. The clock computes the delay
    /// that keeps the call cadence on the desired update rate.
    FixedDelay,
}

/// Cadence estimate for a scheduler running in [`SchedulerMode::FixedDelay`].
///
/// A fixed-delay scheduler has no notion of frame rate. After every update the clock works
/// out how long the scheduler should wait before the next call, starting from the desired
/// interval and correcting it by the gap between the expected and the actual call time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct FallbackCadence {
    next_call_delay_ms: f64,
    expected_next_call_at: f64,
}

impl FallbackCadence {
    pub fn next_call_delay_ms(&self) -> f64 {
        self.next_call_delay_ms
    }

    pub fn expected_next_call_at(&self) -> f64 {
        self.expected_next_call_at
    }

    /// Expects the first call at `at`.
    pub fn seed(&mut self, at: f64) {
        self.expected_next_call_at = at;
    }

    /// Records a call that happened at `now` and plans the next one.
    pub fn observe(&mut self, now: f64, step: &FixedStep) {
        let drift = self.expected_next_call_at - now;
        self.next_call_delay_ms = (step.target_interval_ms() - drift).floor().max(0.0);
        self.expected_next_call_at = now + self.next_call_delay_ms;
    }
}
