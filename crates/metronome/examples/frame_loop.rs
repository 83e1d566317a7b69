// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Drives a clock from a fixed-delay scheduler for one second of real time.
//!
//! The loop sleeps for the delay the clock suggests after every frame, counts one logic
//! update and one render per frame, and prints the resulting statistics. Run with the
//! `logs` feature to see the clock's structured events.

use std::thread;
use std::time::{Duration, Instant};

use metronome::{Clock, ClockOptions, SchedulerMode, Timer, WallClock};

/// Prints a message once per second of wall time.
struct Heartbeat {
    next_beat: Option<f64>,
}

impl Timer for Heartbeat {
    fn start(&mut self) {
        self.next_beat = None;
    }

    fn advance(&mut self, wall_time: f64) -> bool {
        let next_beat = *self.next_beat.get_or_insert(wall_time + 1000.0);
        if wall_time >= next_beat {
            println!("heartbeat at {wall_time:.0} ms");
            self.next_beat = Some(next_beat + 1000.0);
        }
        true
    }

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn destroy(&mut self) {
        self.next_beat = None;
    }
}

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let options = ClockOptions::default()
        .desired_update_rate(30.0)
        .statistics(true)
        .scheduler_mode(SchedulerMode::FixedDelay);

    let mut clock = Clock::with_options(WallClock::new_system(), |_auto_destroy: bool| Heartbeat { next_beat: None }, options);
    clock.boot();

    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(1500) {
        clock.count_update();
        clock.count_render();
        // A sleeping scheduler has no frame timestamp of its own, so it stamps frames with
        // the clock's wall time.
        clock.update(clock.wall_clock().now_ms());

        thread::sleep(Duration::from_secs_f64(clock.next_call_delay_ms() / 1000.0));
    }

    let stats = clock.statistics();
    println!("frames: {}", clock.frame_count());
    println!("fps: {} (min {}, max {})", stats.fps(), stats.fps_min(), stats.fps_max());
    println!("ups: {}, rps: {}", stats.ups(), stats.rps());
    println!("frame time: {:.2} ms .. {:.2} ms", stats.min_elapsed(), stats.max_elapsed());
    println!("session: {:.3} s", clock.total_elapsed_seconds());
}
