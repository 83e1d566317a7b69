// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::FixedStep;

/// Length of the rollover window for the per-second rates, in milliseconds.
const ROLLOVER_MS: f64 = 1000.0;

/// Rolling frame statistics collected by a [`Clock`][crate::Clock].
///
/// Statistics are only collected while enabled (see
/// [`Clock::set_statistics_enabled`][crate::Clock::set_statistics_enabled]). While disabled,
/// every value keeps whatever it held when collection stopped.
///
/// The first frame sampled after collection starts (or restarts) only anchors the one-second
/// window: its `elapsed` may span time nobody measured, so it feeds neither the extrema nor
/// the counters. Rates (`fps`, `ups`, `rps`) are recomputed once the monotonic "now" moves
/// more than one second past the previous rollover. Frame-duration extrema accumulate until
/// [`Clock::reset_statistics_extrema`][crate::Clock::reset_statistics_extrema] is called.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    enabled: bool,

    // Suggested-rate sampling window.
    window_frames: u32,
    window_elapsed: f64,
    suggested_rate: Option<f64>,

    min_elapsed: f64,
    max_elapsed: f64,

    // Per-second counters.
    frames: u32,
    updates: u32,
    renders: u32,
    last_second_mark: Option<f64>,

    fps: f64,
    ups: f64,
    rps: f64,
    fps_min: f64,
    fps_max: f64,
}

impl Statistics {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            window_frames: 0,
            window_elapsed: 0.0,
            suggested_rate: None,
            min_elapsed: f64::INFINITY,
            max_elapsed: 0.0,
            frames: 0,
            updates: 0,
            renders: 0,
            last_second_mark: None,
            fps: 0.0,
            ups: 0.0,
            rps: 0.0,
            fps_min: f64::INFINITY,
            fps_max: 0.0,
        }
    }

    /// Whether statistics are being collected.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Coarse estimate of the sustainable update rate, in steps of 5.
    ///
    /// `None` until a full sampling window of twice the desired update rate has been observed.
    #[must_use]
    pub fn suggested_rate(&self) -> Option<f64> {
        self.suggested_rate
    }

    /// Frames per second over the last completed one-second window.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Logic updates per second over the last completed one-second window.
    #[must_use]
    pub fn ups(&self) -> f64 {
        self.ups
    }

    /// Renders per second over the last completed one-second window.
    #[must_use]
    pub fn rps(&self) -> f64 {
        self.rps
    }

    /// Lowest per-second frame rate seen. Infinite until the first window completes.
    #[must_use]
    pub fn fps_min(&self) -> f64 {
        self.fps_min
    }

    /// Highest per-second frame rate seen.
    #[must_use]
    pub fn fps_max(&self) -> f64 {
        self.fps_max
    }

    /// Shortest frame seen, in milliseconds. Infinite until a frame has been sampled.
    #[must_use]
    pub fn min_elapsed(&self) -> f64 {
        self.min_elapsed
    }

    /// Longest frame seen, in milliseconds.
    #[must_use]
    pub fn max_elapsed(&self) -> f64 {
        self.max_elapsed
    }

    /// Frames counted in the current one-second window.
    #[must_use]
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Logic updates counted in the current one-second window.
    #[must_use]
    pub fn updates(&self) -> u32 {
        self.updates
    }

    /// Renders counted in the current one-second window.
    #[must_use]
    pub fn renders(&self) -> u32 {
        self.renders
    }

    /// Turning collection back on starts fresh windows; computed values are kept.
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.window_frames = 0;
            self.window_elapsed = 0.0;
            self.frames = 0;
            self.updates = 0;
            self.renders = 0;
            self.last_second_mark = None;
        }

        self.enabled = enabled;
    }

    /// Anchors the one-second window at `now`. Counts made before the anchor are dropped.
    pub(crate) fn prime(&mut self, now: f64) {
        if self.enabled {
            self.last_second_mark = Some(now);
            self.frames = 0;
            self.updates = 0;
            self.renders = 0;
        }
    }

    pub(crate) fn count_update(&mut self) {
        if self.enabled {
            self.updates = self.updates.saturating_add(1);
        }
    }

    pub(crate) fn count_render(&mut self) {
        if self.enabled {
            self.renders = self.renders.saturating_add(1);
        }
    }

    pub(crate) fn reset_extrema(&mut self) {
        self.min_elapsed = f64::INFINITY;
        self.max_elapsed = 0.0;
        self.fps_min = f64::INFINITY;
        self.fps_max = 0.0;
    }

    /// Samples one frame. Returns `true` when the one-second window rolled over.
    ///
    /// Without an anchor, the frame primes the window instead of being sampled.
    pub(crate) fn sample(&mut self, now: f64, elapsed: f64, step: &FixedStep) -> bool {
        if !self.enabled {
            return false;
        }

        let Some(mark) = self.last_second_mark else {
            self.prime(now);
            return false;
        };

        self.window_frames = self.window_frames.saturating_add(1);
        self.window_elapsed += elapsed;

        if f64::from(self.window_frames) >= step.suggestion_window() {
            let average = self.window_elapsed / f64::from(self.window_frames);
            self.suggested_rate = Some((200.0 / average).floor() * 5.0);
            self.window_frames = 0;
            self.window_elapsed = 0.0;
        }

        self.min_elapsed = self.min_elapsed.min(elapsed);
        self.max_elapsed = self.max_elapsed.max(elapsed);

        self.frames = self.frames.saturating_add(1);

        if now <= mark + ROLLOVER_MS {
            return false;
        }

        let interval = now - mark;
        self.fps = per_second(self.frames, interval);
        self.ups = per_second(self.updates, interval);
        self.rps = per_second(self.renders, interval);
        self.fps_min = self.fps_min.min(self.fps);
        self.fps_max = self.fps_max.max(self.fps);

        self.frames = 0;
        self.updates = 0;
        self.renders = 0;
        self.last_second_mark = Some(now);

        true
    }
}

fn per_second(count: u32, interval_ms: f64) -> f64 {
    (f64::from(count) * 1000.0 / interval_ms).round()
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> Statistics {
        let mut stats = Statistics::new(true);
        stats.prime(0.0);
        stats
    }

    #[test]
    fn disabled_statistics_are_frozen() {
        let step = FixedStep::default();
        let mut stats = Statistics::new(false);
        let before = stats.clone();

        stats.prime(0.0);
        stats.count_update();
        stats.count_render();
        assert!(!stats.sample(2000.0, 16.0, &step));

        assert_eq!(stats, before);
    }

    #[test]
    fn suggested_rate_after_full_window() {
        let step = FixedStep::new(60.0);
        let mut stats = enabled();
        let mut now = 0.0;

        for _ in 0..119 {
            now += 20.0;
            stats.sample(now, 20.0, &step);
        }
        assert_eq!(stats.suggested_rate(), None);

        now += 20.0;
        stats.sample(now, 20.0, &step);

        // floor(200 / 20) * 5
        assert_eq!(stats.suggested_rate(), Some(50.0));
    }

    #[test]
    fn suggested_rate_rounds_down_to_multiple_of_five() {
        let step = FixedStep::new(10.0);
        let mut stats = enabled();

        for frame in 1..=20 {
            stats.sample(f64::from(frame) * 7.0, 7.0, &step);
        }

        // 200 / 7 = 28.57 -> 28 * 5
        assert_eq!(stats.suggested_rate(), Some(140.0));
    }

    #[test]
    fn rollover_computes_rates() {
        let step = FixedStep::new(60.0);
        let mut stats = enabled();
        let mut rolled = false;

        for frame in 1..=60 {
            stats.count_update();
            stats.count_update();
            stats.count_render();
            rolled = stats.sample(f64::from(frame) * 16.667, 16.667, &step);
        }

        assert!(rolled);
        assert!((stats.fps() - 60.0).abs() < f64::EPSILON);
        assert!((stats.ups() - 120.0).abs() < f64::EPSILON);
        assert!((stats.rps() - 60.0).abs() < f64::EPSILON);
        assert!((stats.fps_min() - 60.0).abs() < f64::EPSILON);
        assert!((stats.fps_max() - 60.0).abs() < f64::EPSILON);
        assert_eq!(stats.frames(), 0);
        assert_eq!(stats.updates(), 0);
        assert_eq!(stats.renders(), 0);
    }

    #[test]
    fn no_rollover_at_exactly_one_second() {
        let step = FixedStep::new(60.0);
        let mut stats = enabled();

        for frame in 1..=4 {
            assert!(!stats.sample(f64::from(frame) * 250.0, 250.0, &step));
        }

        assert_eq!(stats.frames(), 4);
        assert!(stats.sample(1000.5, 0.5, &step));
    }

    #[test]
    fn extrema_track_series_until_reset() {
        let step = FixedStep::new(60.0);
        let mut stats = enabled();

        for (now, elapsed) in [(15.0, 15.0), (40.0, 25.0), (50.0, 10.0), (70.0, 20.0)] {
            stats.sample(now, elapsed, &step);
        }

        assert!((stats.min_elapsed() - 10.0).abs() < f64::EPSILON);
        assert!((stats.max_elapsed() - 25.0).abs() < f64::EPSILON);

        stats.reset_extrema();

        assert!(stats.min_elapsed().is_infinite());
        assert!(stats.max_elapsed().abs() < f64::EPSILON);
    }

    #[test]
    fn re_enabling_restarts_windows_but_keeps_rates() {
        let step = FixedStep::new(60.0);
        let mut stats = enabled();
        stats.sample(500.0, 16.0, &step);
        stats.sample(1001.0, 16.0, &step);
        let fps = stats.fps();

        stats.set_enabled(false);
        stats.sample(9000.0, 16.0, &step);
        stats.set_enabled(true);

        assert!((stats.fps() - fps).abs() < f64::EPSILON);

        // The first frame back spans the disabled period and only re-anchors the window.
        assert!(!stats.sample(20_000.0, 11_000.0, &step));
        assert_eq!(stats.frames(), 0);
        assert!((stats.max_elapsed() - 16.0).abs() < f64::EPSILON);

        assert!(!stats.sample(21_000.0, 1_000.0, &step));
        assert!(stats.sample(21_001.0, 1.0, &step));
    }

    #[test]
    fn unprimed_window_anchors_on_first_sample() {
        let step = FixedStep::new(60.0);
        let mut stats = Statistics::new(true);
        stats.count_update();

        assert!(!stats.sample(5000.0, 16.0, &step));
        assert_eq!(stats.updates(), 0);
        assert!(stats.min_elapsed().is_infinite());

        assert!(!stats.sample(5900.0, 16.0, &step));
        assert!(stats.sample(6001.0, 16.0, &step));
        assert!((stats.fps() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn counters_saturate_when_window_never_rolls_over() {
        let step = FixedStep::new(60.0);
        let mut stats = enabled();
        stats.frames = u32::MAX;
        stats.updates = u32::MAX;
        stats.renders = u32::MAX;
        stats.window_frames = u32::MAX;

        stats.count_update();
        stats.count_render();
        assert!(!stats.sample(0.0, 0.0, &step));

        assert_eq!(stats.frames(), u32::MAX);
        assert_eq!(stats.updates(), u32::MAX);
        assert_eq!(stats.renders(), u32::MAX);
    }
}
