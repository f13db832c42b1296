use log::{log_enabled, warn, Level};
use std::time::{Duration, Instant};

/// Logs the wall time of a scope at trace level.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("start {label}");
        }
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            let elapsed = self.start.elapsed();
            log::trace!("end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Warns when simulating one fixed tick took longer than the tick itself
/// covers, meaning the host cannot keep up in real time.
pub fn warn_if_tick_budget_exceeded(duration: Duration, time_step: f32) -> bool {
    let exceeded = duration.as_secs_f32() > time_step;
    if exceeded {
        warn!(
            "tick took {:.3} ms, budget {:.3} ms",
            duration.as_secs_f32() * 1000.0,
            time_step * 1000.0
        );
    }
    exceeded
}
