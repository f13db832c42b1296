use log::debug;
use std::time::{Duration, Instant};

/// Timing gathered over the ticks of one `advance` call.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickProfile {
    pub vehicle_time: Duration,
    pub total_time: Duration,

    pub vehicle_count: usize,
    pub tick_count: usize,
}

impl TickProfile {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Average wall time per vehicle tick.
    pub fn per_vehicle_tick(&self) -> Duration {
        let ticks = (self.vehicle_count * self.tick_count) as u32;
        if ticks == 0 {
            Duration::ZERO
        } else {
            self.vehicle_time / ticks
        }
    }

    pub fn report(&self) {
        if self.tick_count == 0 {
            return;
        }
        debug!(
            "{} ticks x {} vehicles in {:.3} ms ({} µs per vehicle tick)",
            self.tick_count,
            self.vehicle_count,
            self.total_time.as_secs_f32() * 1000.0,
            self.per_vehicle_tick().as_micros()
        );
    }
}

/// Adds the lifetime of the scope to `output`.
pub struct StageTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> StageTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for StageTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_vehicle_tick_handles_empty_profile() {
        let mut profile = TickProfile::default();
        assert_eq!(profile.per_vehicle_tick(), Duration::ZERO);

        profile.vehicle_time = Duration::from_micros(800);
        profile.vehicle_count = 4;
        profile.tick_count = 2;
        assert_eq!(profile.per_vehicle_tick(), Duration::from_micros(100));

        profile.reset();
        assert_eq!(profile.tick_count, 0);
    }

    #[test]
    fn stage_timer_accumulates() {
        let mut total = Duration::ZERO;
        {
            let _timer = StageTimer::new(&mut total);
            std::thread::sleep(Duration::from_millis(1));
        }
        let first = total;
        assert!(first >= Duration::from_millis(1));
        {
            let _timer = StageTimer::new(&mut total);
        }
        assert!(total >= first);
    }
}
