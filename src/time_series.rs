use serde::Serialize;

/// One point of the per-session history, recorded by the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSeriesSample {
    pub elapsed_secs: u64,
    pub wpm: u32,
    pub accuracy: u32,
}

impl TimeSeriesSample {
    pub fn new(elapsed_secs: u64, wpm: u32, accuracy: u32) -> Self {
        Self {
            elapsed_secs,
            wpm,
            accuracy,
        }
    }

    /// (seconds, wpm) pair as used by chart datasets
    pub fn wpm_point(&self) -> (f64, f64) {
        (self.elapsed_secs as f64, self.wpm as f64)
    }

    /// (seconds, accuracy) pair as used by chart datasets
    pub fn accuracy_point(&self) -> (f64, f64) {
        (self.elapsed_secs as f64, self.accuracy as f64)
    }
}
