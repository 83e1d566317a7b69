// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cadence::FallbackCadence;
use crate::pool::TimerPool;
use crate::{ClockOptions, FixedStep, SchedulerMode, SharedTimer, Statistics, Timer, TimerFactory, WallClock};

/// The authoritative clock of a real-time loop.
///
/// An external frame scheduler calls [`update`][Self::update] once per frame with a monotonic
/// timestamp. From that single input, the clock derives a consistent set of time values:
///
/// - Wall time: sampled from a [`WallClock`] on every update, in milliseconds since the UNIX
///   epoch, together with the wall-time delta since the previous sample.
/// - Monotonic "now": the timestamp supplied by the scheduler, and `elapsed`, the delta from
///   the previous frame. This is the per-frame delta consumers should use.
/// - Fixed-step parameters: the physics delta derived from the desired update rate, used
///   for deterministic simulation stepping. See [`FixedStep`].
///
/// Once per unpaused update, the clock advances its master timer and then every pooled
/// timer. Pooled timers that report completion are removed.
///
/// # Lifecycle
///
/// Construct the clock with [`Clock::new`] or [`Clock::with_options`], call
/// [`boot`][Self::boot] once, then [`update`][Self::update] every frame. The host reports
/// global pause state through [`game_paused`][Self::game_paused] and
/// [`game_resumed`][Self::game_resumed].
///
/// The first update after construction has no previous frame to compare against. It reports
/// an `elapsed` of zero and is not sampled by the statistics engine.
///
/// # Threading
///
/// The clock is single-threaded. Timers are shared through `Rc<RefCell<_>>`, so the clock is
/// neither `Send` nor `Sync`, and every operation runs to completion on the caller's thread.
///
/// # Preconditions
///
/// The desired update rate must be positive; use [`ClockOptions::validate`] to check
/// untrusted configuration. Wall time and "now" must be non-decreasing. The clock does not
/// detect or correct backward jumps.
///
/// # Examples
///
/// ```
/// use metronome::{Clock, Timer, WallClock};
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
/// let mut clock = Clock::new(WallClock::new_system(), |_auto_destroy: bool| Idle);
/// clock.boot();
///
/// clock.update(0.0);
/// clock.update(16.0);
/// clock.update(33.0);
///
/// assert_eq!(clock.elapsed(), 17.0);
/// assert_eq!(clock.physics_elapsed(), 1.0 / 60.0);
/// ```
pub struct Clock<F: TimerFactory> {
    wall_clock: WallClock,
    factory: F,
    master: Rc<RefCell<F::Timer>>,
    pool: TimerPool,

    fixed_step: FixedStep,
    slow_motion: f64,
    scheduler_mode: SchedulerMode,
    cadence: FallbackCadence,
    statistics: Statistics,

    booted: bool,
    paused: bool,

    session_start_wall_time: f64,
    wall_time: f64,
    previous_wall_time: f64,
    wall_delta_ms: f64,

    now: f64,
    previous_now: f64,
    elapsed: f64,
    frame_count: u64,

    pause_started_at: f64,
    pause_duration_ms: f64,
}

impl<F: TimerFactory> Clock<F> {
    /// Creates a clock with default options: 60 updates per second, normal speed, statistics
    /// disabled and a vsync-aligned scheduler.
    ///
    /// The master timer is built immediately through `factory`, with auto-destroy disabled.
    #[must_use]
    pub fn new(wall_clock: WallClock, factory: F) -> Self {
        Self::with_options(wall_clock, factory, ClockOptions::default())
    }

    /// Creates a clock from explicit options.
    ///
    /// The options are not validated here. See [`ClockOptions::validate`].
    #[must_use]
    pub fn with_options(wall_clock: WallClock, factory: F, options: ClockOptions) -> Self {
        let master = Rc::new(RefCell::new(factory.create(false)));

        Self {
            wall_clock,
            factory,
            master,
            pool: TimerPool::default(),
            fixed_step: options.fixed_step(),
            slow_motion: options.get_slow_motion(),
            scheduler_mode: options.get_scheduler_mode(),
            cadence: FallbackCadence::default(),
            statistics: Statistics::new(options.get_statistics()),
            booted: false,
            paused: false,
            session_start_wall_time: 0.0,
            wall_time: 0.0,
            previous_wall_time: 0.0,
            wall_delta_ms: 0.0,
            now: 0.0,
            previous_now: 0.0,
            elapsed: 0.0,
            frame_count: 0,
            pause_started_at: 0.0,
            pause_duration_ms: 0.0,
        }
    }

    /// Initializes the clock: captures the session start wall time, starts the master timer
    /// and seeds the fallback cadence with the current wall time.
    ///
    /// Must be called once before the first [`update`][Self::update]. Later calls are ignored.
    pub fn boot(&mut self) {
        if self.booted {
            #[cfg(any(feature = "logs", test))]
            tracing::event!(
                name: "metronome.boot.ignored",
                tracing::Level::WARN,
                "clock already booted"
            );
            return;
        }

        let sample = self.wall_clock.now_ms();
        self.booted = true;
        self.session_start_wall_time = sample;
        self.wall_time = sample;
        self.previous_wall_time = sample;
        self.wall_delta_ms = 0.0;

        self.master.borrow_mut().start();
        self.cadence.seed(sample);

        #[cfg(any(feature = "logs", test))]
        tracing::event!(
            name: "metronome.boot",
            tracing::Level::INFO,
            clock.wall_time = self.wall_time,
            clock.desired_update_rate = self.fixed_step.rate(),
            clock.statistics = self.statistics.is_enabled(),
        );
    }

    /// Samples the wall clock without touching "now" or `elapsed`.
    ///
    /// Two refreshes with no wall time passing in between leave
    /// [`wall_delta_ms`][Self::wall_delta_ms] at zero.
    pub fn refresh(&mut self) {
        self.previous_wall_time = self.wall_time;
        self.wall_time = self.wall_clock.now_ms();
        self.wall_delta_ms = self.wall_time - self.previous_wall_time;
    }

    /// Advances the clock by one frame.
    ///
    /// `now` is the scheduler's monotonic timestamp for this frame, in milliseconds. The
    /// update refreshes wall time, computes the frame delta, updates the fallback cadence
    /// when the scheduler runs on a fixed delay, samples statistics when enabled and, unless
    /// paused, advances the master timer followed by every pooled timer.
    pub fn update(&mut self, now: f64) {
        self.refresh();

        let priming = self.frame_count == 0;
        self.previous_now = if priming { now } else { self.now };
        self.now = now;
        self.elapsed = now - self.previous_now;
        self.frame_count += 1;

        if self.scheduler_mode == SchedulerMode::FixedDelay {
            self.cadence.observe(now, &self.fixed_step);
        }

        // The first frame, and the first after statistics are re-enabled, only anchors the window.
        if self.statistics.sample(now, self.elapsed, &self.fixed_step) {
            #[cfg(any(feature = "logs", test))]
            tracing::event!(
                name: "metronome.statistics.rollover",
                tracing::Level::DEBUG,
                statistics.fps = self.statistics.fps(),
                statistics.ups = self.statistics.ups(),
                statistics.rps = self.statistics.rps(),
            );
        }

        if self.paused {
            return;
        }

        // The master timer is never pruned, whatever it reports.
        self.master.borrow_mut().advance(self.wall_time);

        if !self.pool.is_empty() && self.pool.advance(self.wall_time) > 0 {
            #[cfg(any(feature = "logs", test))]
            tracing::event!(
                name: "metronome.pool.pruned",
                tracing::Level::DEBUG,
                clock.wall_time = self.wall_time,
                pool.len = self.pool.len(),
            );
        }
    }

    /// The desired number of logic updates per second.
    #[must_use]
    pub fn desired_update_rate(&self) -> f64 {
        self.fixed_step.rate()
    }

    /// Sets the desired number of logic updates per second.
    ///
    /// The physics delta and the update-rate multiplier are recomputed together. `rate` must
    /// be positive; this is not checked.
    pub fn set_desired_update_rate(&mut self, rate: f64) {
        self.fixed_step = FixedStep::new(rate);
    }

    /// The fixed-step parameters derived from the desired update rate.
    #[must_use]
    pub fn fixed_step(&self) -> FixedStep {
        self.fixed_step
    }

    /// The fixed physics delta, in seconds.
    #[must_use]
    pub fn physics_elapsed(&self) -> f64 {
        self.fixed_step.physics_elapsed()
    }

    /// The fixed physics delta, in milliseconds.
    #[must_use]
    pub fn physics_elapsed_ms(&self) -> f64 {
        self.fixed_step.physics_elapsed_ms()
    }

    /// `1 / desired_update_rate`.
    #[must_use]
    pub fn update_rate_multiplier(&self) -> f64 {
        self.fixed_step.update_rate_multiplier()
    }

    /// The slow-motion factor. Stored for consumers; the clock itself does not apply it.
    #[must_use]
    pub fn slow_motion(&self) -> f64 {
        self.slow_motion
    }

    /// Sets the slow-motion factor.
    pub fn set_slow_motion(&mut self, factor: f64) {
        self.slow_motion = factor;
    }

    /// How the external scheduler is currently driving the clock.
    #[must_use]
    pub fn scheduler_mode(&self) -> SchedulerMode {
        self.scheduler_mode
    }

    /// Tells the clock how the external scheduler is driving it.
    ///
    /// The fallback cadence is only recomputed in [`SchedulerMode::FixedDelay`].
    pub fn set_scheduler_mode(&mut self, mode: SchedulerMode) {
        self.scheduler_mode = mode;
    }

    /// Handles the host pausing.
    ///
    /// Records when the pause started and pauses the master timer and every pooled timer.
    /// While paused, updates keep tracking time but no timer is advanced. Calling this while
    /// already paused is logged and otherwise ignored.
    pub fn game_paused(&mut self) {
        if self.paused {
            #[cfg(any(feature = "logs", test))]
            tracing::event!(
                name: "metronome.pause.ignored",
                tracing::Level::WARN,
                "clock already paused"
            );
            return;
        }

        self.paused = true;
        self.pause_started_at = self.wall_time;

        self.master.borrow_mut().pause();
        self.pool.pause_all();

        #[cfg(any(feature = "logs", test))]
        tracing::event!(
            name: "metronome.pause",
            tracing::Level::INFO,
            clock.wall_time = self.wall_time,
            pool.len = self.pool.len(),
        );
    }

    /// Handles the host resuming.
    ///
    /// Samples the wall clock, records how long the pause lasted and resumes the master
    /// timer and every pooled timer. The wall-time delta is reset to zero so the pause does
    /// not leak into the next frame. Calling this while not paused is logged and otherwise
    /// ignored.
    pub fn game_resumed(&mut self) {
        if !self.paused {
            #[cfg(any(feature = "logs", test))]
            tracing::event!(
                name: "metronome.resume.ignored",
                tracing::Level::WARN,
                "clock is not paused"
            );
            return;
        }

        let sample = self.wall_clock.now_ms();
        self.paused = false;
        self.wall_time = sample;
        self.previous_wall_time = sample;
        self.wall_delta_ms = 0.0;
        self.pause_duration_ms = self.wall_time - self.pause_started_at;

        self.master.borrow_mut().resume();
        self.pool.resume_all();

        #[cfg(any(feature = "logs", test))]
        tracing::event!(
            name: "metronome.resume",
            tracing::Level::INFO,
            clock.wall_time = self.wall_time,
            clock.pause_duration_ms = self.pause_duration_ms,
        );
    }

    /// Whether the host is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether [`boot`][Self::boot] has run.
    #[must_use]
    pub fn is_booted(&self) -> bool {
        self.booted
    }

    /// Seconds of wall time since the session started (boot or the last reset).
    #[must_use]
    pub fn total_elapsed_seconds(&self) -> f64 {
        (self.wall_time - self.session_start_wall_time) * 0.001
    }

    /// Milliseconds of wall time since `since`.
    #[must_use]
    pub fn elapsed_since(&self, since: f64) -> f64 {
        self.wall_time - since
    }

    /// Seconds of wall time since `since` (given in milliseconds).
    #[must_use]
    pub fn elapsed_seconds_since(&self, since: f64) -> f64 {
        (self.wall_time - since) * 0.001
    }

    /// Restarts the session at the current wall time and clears every timer.
    ///
    /// Pooled timers are destroyed and removed. The master timer stays, with its events
    /// cleared.
    pub fn reset(&mut self) {
        self.session_start_wall_time = self.wall_time;
        self.remove_all();

        #[cfg(any(feature = "logs", test))]
        tracing::event!(
            name: "metronome.reset",
            tracing::Level::INFO,
            clock.wall_time = self.wall_time,
        );
    }

    /// Adds an externally built timer to the pool and hands the same handle back.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// use metronome::{Clock, Timer, WallClock};
    ///
    /// struct Countdown(u32);
    ///
    /// impl Timer for Countdown {
    ///     fn advance(&mut self, _wall_time: f64) -> bool {
    ///         self.0 = self.0.saturating_sub(1);
    ///         self.0 > 0
    ///     }
    ///     fn pause(&mut self) {}
    ///     fn resume(&mut self) {}
    ///     fn destroy(&mut self) {}
    /// }
    ///
    /// let mut clock = Clock::new(WallClock::new_system(), |_auto_destroy: bool| Countdown(u32::MAX));
    /// clock.boot();
    ///
    /// let countdown = clock.add(Rc::new(RefCell::new(Countdown(2))));
    ///
    /// clock.update(0.0);
    /// assert_eq!(countdown.borrow().0, 1);
    /// assert_eq!(clock.timer_count(), 1);
    ///
    /// clock.update(16.0);
    /// assert_eq!(clock.timer_count(), 0);
    /// ```
    pub fn add<T: Timer + 'static>(&mut self, timer: Rc<RefCell<T>>) -> Rc<RefCell<T>> {
        let shared = Rc::clone(&timer);
        self.pool.push(shared);
        timer
    }

    /// Adds an already type-erased timer to the pool and returns the same handle.
    ///
    /// Use this for handles taken from [`timers`][Self::timers] or built by code that only
    /// knows about [`SharedTimer`]. Adding a handle that is already pooled makes it advance
    /// once per copy.
    pub fn add_shared(&mut self, timer: SharedTimer) -> SharedTimer {
        self.pool.push(Rc::clone(&timer));
        timer
    }

    /// Builds a timer through the clock's factory, adds it to the pool and returns it.
    ///
    /// With `auto_destroy` set, the timer removes itself from the pool once it has no events
    /// left.
    pub fn create(&mut self, auto_destroy: bool) -> Rc<RefCell<F::Timer>> {
        let timer = Rc::new(RefCell::new(self.factory.create(auto_destroy)));
        self.add(timer)
    }

    /// Builds an auto-destroying timer. Equivalent to `create(true)`.
    pub fn create_default(&mut self) -> Rc<RefCell<F::Timer>> {
        self.create(true)
    }

    /// Destroys and removes every pooled timer, then clears the master timer's events.
    ///
    /// The master timer itself is kept.
    pub fn remove_all(&mut self) {
        let destroyed = self.pool.destroy_all();
        self.master.borrow_mut().clear_events();

        #[cfg(any(feature = "logs", test))]
        tracing::event!(
            name: "metronome.pool.cleared",
            tracing::Level::DEBUG,
            pool.destroyed = destroyed,
        );
        #[cfg(not(any(feature = "logs", test)))]
        let _ = destroyed;
    }

    /// The master timer. It lives as long as the clock and is never pruned.
    #[must_use]
    pub fn master(&self) -> &Rc<RefCell<F::Timer>> {
        &self.master
    }

    /// The number of pooled timers, not counting the master timer.
    #[must_use]
    pub fn timer_count(&self) -> usize {
        self.pool.len()
    }

    /// The pooled timers, in the order they are advanced.
    pub fn timers(&self) -> impl Iterator<Item = &SharedTimer> {
        self.pool.iter()
    }

    /// Counts one logic update for the statistics. Ignored while statistics are disabled.
    pub fn count_update(&mut self) {
        self.statistics.count_update();
    }

    /// Counts one render for the statistics. Ignored while statistics are disabled.
    pub fn count_render(&mut self) {
        self.statistics.count_render();
    }

    /// Turns statistics collection on or off.
    ///
    /// While off, every statistic keeps its last value. Turning collection back on starts
    /// fresh sampling windows: the next update re-anchors the one-second window and is not
    /// sampled, so the time spent disabled never shows up in the rates or extrema.
    pub fn set_statistics_enabled(&mut self, enabled: bool) {
        self.statistics.set_enabled(enabled);
    }

    /// The frame statistics.
    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Clears the frame-duration and frame-rate extrema.
    pub fn reset_statistics_extrema(&mut self) {
        self.statistics.reset_extrema();
    }

    /// The wall clock the clock samples.
    #[must_use]
    pub fn wall_clock(&self) -> &WallClock {
        &self.wall_clock
    }

    /// The most recent wall-time sample, in milliseconds.
    #[must_use]
    pub fn wall_time(&self) -> f64 {
        self.wall_time
    }

    /// The wall-time sample before the most recent one.
    #[must_use]
    pub fn previous_wall_time(&self) -> f64 {
        self.previous_wall_time
    }

    /// `wall_time - previous_wall_time`. Zero right after a resume.
    #[must_use]
    pub fn wall_delta_ms(&self) -> f64 {
        self.wall_delta_ms
    }

    /// The wall time the session started at.
    #[must_use]
    pub fn session_start_wall_time(&self) -> f64 {
        self.session_start_wall_time
    }

    /// The scheduler timestamp of the current frame.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// The scheduler timestamp of the previous frame.
    #[must_use]
    pub fn previous_now(&self) -> f64 {
        self.previous_now
    }

    /// `now - previous_now`: the per-frame delta, in milliseconds.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of updates since construction.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The wall time at which the current or last pause started.
    #[must_use]
    pub fn pause_started_at(&self) -> f64 {
        self.pause_started_at
    }

    /// How long the last pause lasted, in milliseconds.
    #[must_use]
    pub fn pause_duration_ms(&self) -> f64 {
        self.pause_duration_ms
    }

    /// How long a fixed-delay scheduler should wait before the next update, in milliseconds.
    ///
    /// Only maintained in [`SchedulerMode::FixedDelay`].
    #[must_use]
    pub fn next_call_delay_ms(&self) -> f64 {
        self.cadence.next_call_delay_ms()
    }

    /// When a fixed-delay scheduler is expected to call next.
    ///
    /// Only maintained in [`SchedulerMode::FixedDelay`].
    #[must_use]
    pub fn expected_next_call_at(&self) -> f64 {
        self.cadence.expected_next_call_at()
    }
}

impl<F: TimerFactory> fmt::Debug for Clock<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clock")
            .field("wall_clock", &self.wall_clock)
            .field("pool", &self.pool)
            .field("fixed_step", &self.fixed_step)
            .field("scheduler_mode", &self.scheduler_mode)
            .field("paused", &self.paused)
            .field("wall_time", &self.wall_time)
            .field("now", &self.now)
            .field("elapsed", &self.elapsed)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}
