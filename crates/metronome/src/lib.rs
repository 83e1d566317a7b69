// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! An authoritative frame clock for real-time loops.
//!
//! A frame scheduler calls [`Clock::update`] once per frame with a monotonic timestamp. The
//! clock turns that into wall time, per-frame deltas and fixed-step physics parameters,
//! drives a pool of timers, and optionally keeps rolling frame statistics.
//!
//! # Quick Start
//!
//! ```
//! use metronome::{Clock, ClockOptions, Timer, WallClock};
//!
//! struct Idle;
//!
//! impl Timer for Idle {
//!     fn advance(&mut self, _wall_time: f64) -> bool {
//!         true
//!     }
//!     fn pause(&mut self) {}
//!     fn resume(&mut self) {}
//!     fn destroy(&mut self) {}
//! }
//!
//! let options = ClockOptions::default().desired_update_rate(30.0).statistics(true);
//! let mut clock = Clock::with_options(WallClock::new_system(), |_auto_destroy: bool| Idle, options);
//! clock.boot();
//!
//! for frame in 0..10 {
//!     clock.count_update();
//!     clock.count_render();
//!     clock.update(f64::from(frame) * 33.3);
//! }
//!
//! assert_eq!(clock.frame_count(), 10);
//! assert!((clock.physics_elapsed_ms() - 33.333).abs() < 0.001);
//! ```
//!
//! # Three kinds of time
//!
//! - **Wall time** is real-world time read from a [`WallClock`], in milliseconds. It backs
//!   session totals ([`Clock::total_elapsed_seconds`]), pause durations and the time passed
//!   to timers.
//! - **Now** is the frame timestamp supplied by the scheduler. [`Clock::elapsed`] is the
//!   difference between two consecutive frames and is the delta consumers should use.
//! - **Fixed-step time** is the constant slice derived from the desired update rate. See
//!   [`FixedStep`].
//!
//! # Overview
//!
//! - [`Clock`] - The frame clock.
//! - [`ClockOptions`] - Construction-time configuration.
//! - [`Timer`] and [`TimerFactory`] - What the clock needs from the timers it drives.
//! - [`Statistics`] - Frame, update and render rates, plus frame-duration extrema.
//! - [`SchedulerMode`] - How the external scheduler calls the clock.
//! - [`WallClock`] - Source of wall time.
//! - [`WallClockControl`] - Manual control of wall time. Available with `test-util`.
//!
//! # Features
//!
//! - **`test-util`** - Enables [`WallClockControl`] and frozen wall clocks for deterministic
//!   tests. **Only enable this in `dev-dependencies`.**
//! - **`serde`** - Serialization support for [`ClockOptions`] and [`SchedulerMode`].
//! - **`logs`** - Emits structured events (boot, pause, resume, reset, pruning, statistics
//!   rollover) through [tracing](https://docs.rs/tracing).

mod cadence;
mod clock;
mod error;
mod fixed_step;
mod options;
mod pool;
mod stats;
mod timer;
mod wall_clock;
#[cfg(any(feature = "test-util", test))]
mod wall_clock_control;

#[cfg(test)]
mod testing;

pub use cadence::SchedulerMode;
pub use clock::Clock;
pub use error::{Error, Result};
pub use fixed_step::{DEFAULT_UPDATE_RATE, FixedStep};
pub use options::ClockOptions;
pub use stats::Statistics;
pub use timer::{SharedTimer, Timer, TimerFactory};
pub use wall_clock::WallClock;
#[cfg(any(feature = "test-util", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
pub use wall_clock_control::WallClockControl;
