// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::timer::SharedTimer;

/// The timers owned by a [`Clock`][crate::Clock], apart from its master timer.
///
/// The pool is advanced once per unpaused update. A timer that reports completion is dropped
/// from the pool in place; the remaining timers keep their relative order.
#[derive(Default)]
pub(crate) struct TimerPool {
    timers: Vec<SharedTimer>,
}

impl TimerPool {
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedTimer> {
        self.timers.iter()
    }

    pub fn push(&mut self, timer: SharedTimer) {
        self.timers.push(timer);
    }

    /// Advances every timer to `wall_time` and drops those that report completion.
    ///
    /// Each timer is visited exactly once, in order. Returns the number of timers removed.
    pub fn advance(&mut self, wall_time: f64) -> usize {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.borrow_mut().advance(wall_time));
        before - self.timers.len()
    }

    /// Pauses every timer, last to first.
    pub fn pause_all(&self) {
        for timer in self.timers.iter().rev() {
            timer.borrow_mut().pause();
        }
    }

    /// Resumes every timer, last to first.
    pub fn resume_all(&self) {
        for timer in self.timers.iter().rev() {
            timer.borrow_mut().resume();
        }
    }

    /// Destroys every timer and empties the pool. Returns the number of timers destroyed.
    pub fn destroy_all(&mut self) -> usize {
        let count = self.timers.len();
        for timer in self.timers.drain(..) {
            timer.borrow_mut().destroy();
        }
        count
    }
}

impl fmt::Debug for TimerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerPool").field("len", &self.timers.len()).finish()
    }
}
