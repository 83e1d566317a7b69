// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::{Error, Result};

/// The update rate a [`Clock`][crate::Clock] targets when none is configured, in updates per second.
pub const DEFAULT_UPDATE_RATE: f64 = 60.0;

/// Fixed-step parameters derived from a desired update rate.
///
/// The physics delta (in seconds and milliseconds) and the update-rate multiplier are
/// always computed together from a single rate, so they can never disagree with each other.
/// A `FixedStep` is immutable; changing the rate means building a new value.
///
/// # Examples
///
/// ```
/// use metronome::FixedStep;
///
/// let step = FixedStep::new(50.0);
///
/// assert_eq!(step.rate(), 50.0);
/// assert_eq!(step.physics_elapsed(), 0.02);
/// assert_eq!(step.physics_elapsed_ms(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    rate: f64,
    physics_elapsed: f64,
    physics_elapsed_ms: f64,
    update_rate_multiplier: f64,
}

impl FixedStep {
    /// Derives the fixed-step parameters for `rate` updates per second.
    ///
    /// The rate must be positive. This is not checked: a zero or negative rate produces
    /// infinite or negative deltas. Use [`FixedStep::try_new`] for untrusted input.
    #[must_use]
    pub fn new(rate: f64) -> Self {
        let physics_elapsed = 1.0 / rate;

        Self {
            rate,
            physics_elapsed,
            physics_elapsed_ms: physics_elapsed * 1000.0,
            update_rate_multiplier: 1.0 / rate,
        }
    }

    /// Derives the fixed-step parameters, rejecting rates that are not finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUpdateRate`] when `rate` is zero, negative, NaN or infinite.
    pub fn try_new(rate: f64) -> Result<Self> {
        if rate.is_finite() && rate > 0.0 {
            Ok(Self::new(rate))
        } else {
            Err(Error::InvalidUpdateRate(rate))
        }
    }

    /// The desired number of updates per second.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Duration of one fixed step, in seconds.
    #[must_use]
    pub fn physics_elapsed(&self) -> f64 {
        self.physics_elapsed
    }

    /// Duration of one fixed step, in milliseconds.
    #[must_use]
    pub fn physics_elapsed_ms(&self) -> f64 {
        self.physics_elapsed_ms
    }

    /// Multiplier that scales per-update quantities to the desired rate.
    #[must_use]
    pub fn update_rate_multiplier(&self) -> f64 {
        self.update_rate_multiplier
    }

    /// Number of sampled frames after which the suggested rate is recomputed.
    pub(crate) fn suggestion_window(&self) -> f64 {
        self.rate * 2.0
    }

    /// Target delay between two scheduler calls, in milliseconds.
    pub(crate) fn target_interval_ms(&self) -> f64 {
        1000.0 / self.rate
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_RATE)
    }
}
