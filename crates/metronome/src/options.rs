// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::{Error, Result};
use crate::{DEFAULT_UPDATE_RATE, FixedStep, SchedulerMode};

/// Construction-time configuration for a [`Clock`][crate::Clock].
///
/// # Examples
///
/// ```
/// use metronome::{ClockOptions, SchedulerMode};
///
/// let options = ClockOptions::default()
///     .desired_update_rate(30.0)
///     .statistics(true)
///     .scheduler_mode(SchedulerMode::FixedDelay);
///
/// assert!(options.validate().is_ok());
/// ```
///
/// With the `serde` feature, options can be loaded from configuration files. Missing fields
/// fall back to their defaults:
///
/// ```
/// # #[cfg(feature = "serde")]
/// # {
/// use metronome::ClockOptions;
///
/// let options: ClockOptions = serde_json::from_str(r#"{ "desired_update_rate": 120.0 }"#).unwrap();
///
/// assert_eq!(options.get_desired_update_rate(), 120.0);
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(any(feature = "serde", test), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(feature = "serde", test), serde(default))]
pub struct ClockOptions {
    desired_update_rate: f64,
    slow_motion: f64,
    statistics: bool,
    scheduler_mode: SchedulerMode,
}

impl Default for ClockOptions {
    fn default() -> Self {
        Self {
            desired_update_rate: DEFAULT_UPDATE_RATE,
            slow_motion: 1.0,
            statistics: false,
            scheduler_mode: SchedulerMode::Vsync,
        }
    }
}

impl ClockOptions {
    /// Sets the desired number of updates per second. Must be positive.
    #[must_use]
    pub fn desired_update_rate(mut self, rate: f64) -> Self {
        self.desired_update_rate = rate;
        self
    }

    /// Sets the slow-motion factor. `1.0` is normal speed.
    #[must_use]
    pub fn slow_motion(mut self, factor: f64) -> Self {
        self.slow_motion = factor;
        self
    }

    /// Enables or disables frame statistics.
    #[must_use]
    pub fn statistics(mut self, enabled: bool) -> Self {
        self.statistics = enabled;
        self
    }

    /// Declares how the frame scheduler is driving the clock.
    #[must_use]
    pub fn scheduler_mode(mut self, mode: SchedulerMode) -> Self {
        self.scheduler_mode = mode;
        self
    }

    /// The configured update rate.
    #[must_use]
    pub fn get_desired_update_rate(&self) -> f64 {
        self.desired_update_rate
    }

    /// The configured slow-motion factor.
    #[must_use]
    pub fn get_slow_motion(&self) -> f64 {
        self.slow_motion
    }

    /// Whether statistics start enabled.
    #[must_use]
    pub fn get_statistics(&self) -> bool {
        self.statistics
    }

    /// The configured scheduler mode.
    #[must_use]
    pub fn get_scheduler_mode(&self) -> SchedulerMode {
        self.scheduler_mode
    }

    /// Checks the options describe a usable clock.
    ///
    /// [`Clock::with_options`][crate::Clock::with_options] does not validate; call this first
    /// when options come from an untrusted source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUpdateRate`] for a rate that is not finite and positive, and
    /// [`Error::InvalidSlowMotion`] for a slow-motion factor that is not finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        FixedStep::try_new(self.desired_update_rate)?;

        if !self.slow_motion.is_finite() || self.slow_motion < 0.0 {
            return Err(Error::InvalidSlowMotion(self.slow_motion));
        }

        Ok(())
    }

    pub(crate) fn fixed_step(&self) -> FixedStep {
        FixedStep::new(self.desired_update_rate)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_ok() {
        let options = ClockOptions::default();

        assert!((options.get_desired_update_rate() - 60.0).abs() < f64::EPSILON);
        assert!((options.get_slow_motion() - 1.0).abs() < f64::EPSILON);
        assert!(!options.get_statistics());
        assert_eq!(options.get_scheduler_mode(), SchedulerMode::Vsync);
        options.validate().unwrap();
    }

    #[test]
    fn builder_sets_fields() {
        let options = ClockOptions::default()
            .desired_update_rate(144.0)
            .slow_motion(0.5)
            .statistics(true)
            .scheduler_mode(SchedulerMode::FixedDelay);

        assert!((options.get_desired_update_rate() - 144.0).abs() < f64::EPSILON);
        assert!((options.get_slow_motion() - 0.5).abs() < f64::EPSILON);
        assert!(options.get_statistics());
        assert_eq!(options.get_scheduler_mode(), SchedulerMode::FixedDelay);
        assert_eq!(options.fixed_step(), FixedStep::new(144.0));
    }

    #[test]
    fn validate_rejects_bad_rate() {
        let error = ClockOptions::default().desired_update_rate(0.0).validate().unwrap_err();

        assert!(matches!(error, Error::InvalidUpdateRate(_)));
    }

    #[test]
    fn validate_rejects_bad_slow_motion() {
        let error = ClockOptions::default().slow_motion(-2.0).validate().unwrap_err();

        assert!(matches!(error, Error::InvalidSlowMotion(_)));
    }

    #[test]
    fn deserialize_fills_missing_fields_with_defaults() {
        let options: ClockOptions =
            serde_json::from_str(r#"{ "statistics": true, "scheduler_mode": "fixed_delay" }"#).unwrap();

        assert_eq!(
            options,
            ClockOptions::default()
                .statistics(true)
                .scheduler_mode(SchedulerMode::FixedDelay)
        );
    }
}
