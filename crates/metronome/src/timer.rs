// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cell::RefCell;
use std::rc::Rc;

/// The capability set a [`Clock`][crate::Clock] needs from a countdown or interval timer.
///
/// The clock never looks inside a timer. It only starts the master timer, advances every
/// timer once per unpaused update, fans pause and resume out to them, and destroys pooled
/// timers when they are swept. How a timer schedules and fires its own events is up to the
/// implementation.
///
/// # Examples
///
/// ```
/// use metronome::Timer;
///
/// /// Fires once when the deadline passes, then asks to be removed.
/// struct Deadline {
///     at: f64,
///     paused: bool,
/// }
///
/// impl Timer for Deadline {
///     fn advance(&mut self, wall_time: f64) -> bool {
///         self.paused || wall_time < self.at
///     }
///
///     fn pause(&mut self) {
///         self.paused = true;
///     }
///
///     fn resume(&mut self) {
///         self.paused = false;
///     }
///
///     fn destroy(&mut self) {}
/// }
/// ```
pub trait Timer {
    /// Starts the timer. The clock calls this on its master timer during boot.
    fn start(&mut self) {}

    /// Advances the timer to `wall_time` (milliseconds).
    ///
    /// Returns `false` when the timer is finished and should be removed from the pool.
    /// A timer that expired with no repeat and auto-destroys itself on empty returns `false`.
    fn advance(&mut self, wall_time: f64) -> bool;

    /// Suspends the timer because the host paused.
    fn pause(&mut self);

    /// Resumes the timer after the host resumed.
    fn resume(&mut self);

    /// Releases the timer's events. The timer is not used again by the pool.
    fn destroy(&mut self);

    /// Drops every scheduled event without destroying the timer.
    ///
    /// The clock calls this on its master timer when the pool is cleared.
    fn clear_events(&mut self) {}
}

/// A timer handle shared between the pool and whoever created the timer.
pub type SharedTimer = Rc<RefCell<dyn Timer>>;

/// Builds timers for [`Clock::create`][crate::Clock::create] and for the clock's master timer.
///
/// Any `Fn(bool) -> T` closure is a factory; the argument is the auto-destroy policy.
///
/// # Examples
///
/// ```
/// use metronome::{Timer, TimerFactory};
///
/// struct Idle;
///
/// impl Timer for Idle {
///     fn advance(&mut self, _wall_time: f64) -> bool {
///         true
///     }
///     fn pause(&mut self) {}
///     fn resume(&mut self) {}
///     fn destroy(&mut self) {}
/// }
///
/// fn build(factory: &impl TimerFactory) {
///     let _timer = factory.create(true);
/// }
///
/// build(&|_auto_destroy: bool| Idle);
/// ```
pub trait TimerFactory {
    /// The timer type this factory builds.
    type Timer: Timer + 'static;

    /// Builds a timer. When `auto_destroy` is set, the timer reports completion once it runs
    /// out of events.
    fn create(&self, auto_destroy: bool) -> Self::Timer;
}

impl<T, F> TimerFactory for F
where
    T: Timer + 'static,
    F: Fn(bool) -> T,
{
    type Timer = T;

    fn create(&self, auto_destroy: bool) -> T {
        self(auto_destroy)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, CallLog, RecordingTimer};

    #[test]
    fn closure_is_a_factory() {
        let log = CallLog::default();
        let factory = |auto_destroy: bool| RecordingTimer::new(7, &log).auto_destroy(auto_destroy);

        let timer = factory.create(false);

        assert_eq!(timer.id(), 7);
        assert!(!timer.is_auto_destroy());
    }

    #[test]
    fn default_start_and_clear_events_are_no_ops() {
        struct Bare;

        impl Timer for Bare {
            fn advance(&mut self, _wall_time: f64) -> bool {
                false
            }
            fn pause(&mut self) {}
            fn resume(&mut self) {}
            fn destroy(&mut self) {}
        }

        let mut bare = Bare;
        bare.start();
        bare.clear_events();

        assert!(!bare.advance(0.0));
    }

    #[test]
    fn shared_timer_erases_type() {
        let log = CallLog::default();
        let shared: SharedTimer = Rc::new(RefCell::new(RecordingTimer::new(1, &log)));

        shared.borrow_mut().pause();

        assert_eq!(log.calls(), vec![(1, Call::Pause)]);
    }
}
