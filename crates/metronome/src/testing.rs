// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

use crate::Timer;

/// A call observed by a [`RecordingTimer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Call {
    Start,
    Advance(f64),
    Pause,
    Resume,
    Destroy,
    ClearEvents,
}

/// Ordered log of calls shared by several recording timers.
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog(Rc<RefCell<Vec<(u32, Call)>>>);

impl CallLog {
    pub(crate) fn calls(&self) -> Vec<(u32, Call)> {
        self.0.borrow().clone()
    }

    pub(crate) fn calls_for(&self, id: u32) -> Vec<Call> {
        self.0
            .borrow()
            .iter()
            .filter(|(timer, _)| *timer == id)
            .map(|(_, call)| *call)
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, id: u32, call: Call) {
        self.0.borrow_mut().push((id, call));
    }
}

/// A timer that records every call and expires on a chosen advance.
#[derive(Debug)]
pub(crate) struct RecordingTimer {
    id: u32,
    log: CallLog,
    auto_destroy: bool,
    advances: usize,
    expire_on_advance: Option<usize>,
}

impl RecordingTimer {
    pub(crate) fn new(id: u32, log: &CallLog) -> Self {
        Self {
            id,
            log: log.clone(),
            auto_destroy: true,
            advances: 0,
            expire_on_advance: None,
        }
    }

    pub(crate) fn shared(id: u32, log: &CallLog) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(id, log)))
    }

    pub(crate) fn auto_destroy(mut self, auto_destroy: bool) -> Self {
        self.auto_destroy = auto_destroy;
        self
    }

    /// The timer reports completion on its `n`-th advance (1-based).
    pub(crate) fn expire_on_advance(mut self, n: usize) -> Self {
        self.expire_on_advance = Some(n);
        self
    }

    pub(crate) fn id(&self) -> u32 {
        self.id
    }

    pub(crate) fn is_auto_destroy(&self) -> bool {
        self.auto_destroy
    }
}

impl Timer for RecordingTimer {
    fn start(&mut self) {
        self.log.push(self.id, Call::Start);
    }

    fn advance(&mut self, wall_time: f64) -> bool {
        self.advances += 1;
        self.log.push(self.id, Call::Advance(wall_time));
        self.expire_on_advance != Some(self.advances)
    }

    fn pause(&mut self) {
        self.log.push(self.id, Call::Pause);
    }

    fn resume(&mut self) {
        self.log.push(self.id, Call::Resume);
    }

    fn destroy(&mut self) {
        self.log.push(self.id, Call::Destroy);
    }

    fn clear_events(&mut self) {
        self.log.push(self.id, Call::ClearEvents);
    }
}

/// Captures formatted `tracing` output into a buffer that tests can inspect.
#[derive(Debug, Clone, Default)]
pub(crate) struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub(crate) fn output(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).to_string()
    }

    pub(crate) fn assert_contains(&self, expected: &str) {
        let output = self.output();
        assert!(output.contains(expected), "log output does not contain '{expected}', got:\n{output}");
    }

    pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + use<> {
        tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(self.clone())
                .with_ansi(false),
        )
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

#[derive(Debug)]
pub(crate) struct LogCaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
