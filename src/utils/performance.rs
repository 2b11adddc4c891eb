// Timing helpers for batch validation

use std::time::{Duration, Instant};

/// Wall clock timer started on creation.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of one batch run, logged on completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub messages: usize,
    pub detections: usize,
    pub elapsed: Duration,
}

impl BatchStats {
    pub fn new(messages: usize, detections: usize, elapsed: Duration) -> Self {
        Self {
            messages,
            detections,
            elapsed,
        }
    }

    pub fn messages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return self.messages as f64;
        }
        self.messages as f64 / secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_is_monotonic() {
        let timer = Timer::new();
        let first = timer.elapsed();
        assert!(timer.elapsed() >= first);
    }

    #[test]
    fn test_messages_per_second() {
        let stats = BatchStats::new(10, 3, Duration::from_secs(2));
        assert_eq!(stats.messages_per_second(), 5.0);
        assert_eq!(BatchStats::new(4, 0, Duration::ZERO).messages_per_second(), 4.0);
    }
}
