use std::time::{Duration, Instant};

use crate::time::SimTime;

/// A record of a finished (or stopped) simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profiler {
    /// The number of events that were dispatched.
    pub event_count: usize,
    /// The wall-clock duration of the run.
    pub duration: Duration,
    /// The simulation time at which the run ended.
    pub end_time: SimTime,

    time_start: Option<Instant>,
}

impl Profiler {
    /// Starts the profile.
    pub(super) fn start(&mut self) {
        self.time_start = Some(Instant::now());
    }

    /// Finishes the profile.
    pub(super) fn finish(&mut self, event_count: usize, end_time: SimTime) {
        self.event_count = event_count;
        self.end_time = end_time;
        if let Some(start) = self.time_start {
            self.duration = start.elapsed();
        }
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self {
            event_count: 0,
            duration: Duration::ZERO,
            end_time: SimTime::ZERO,
            time_start: None,
        }
    }
}
