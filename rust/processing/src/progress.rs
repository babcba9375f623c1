// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Progress reporting.

/// Receives `(percent, message)` updates. Percent is in `0..=100`.
pub trait ProgressSink {
    fn report(&mut self, percent: f64, message: &str);
}

impl<F> ProgressSink for F
where
    F: FnMut(f64, &str),
{
    fn report(&mut self, percent: f64, message: &str) {
        self(percent, message)
    }
}

/// Sink that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: f64, _message: &str) {}
}

/// Maps item counts onto a percentage window, reporting about every 5%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressCadence {
    start: f64,
    end: f64,
    total: usize,
}

impl ProgressCadence {
    pub fn new(start: f64, end: f64, total: usize) -> Self {
        Self { start, end, total }
    }

    /// Whether item `current` (1-based) should produce an update.
    pub fn should_report(&self, current: usize) -> bool {
        if self.total == 0 {
            return false;
        }
        let step = (self.total / 20).max(1);
        current % step == 0 || current == self.total
    }

    pub fn percent(&self, current: usize) -> f64 {
        if self.total == 0 {
            return self.end;
        }
        self.start + (self.end - self.start) * current as f64 / self.total as f64
    }
}
