//! Pausable run timebase
//!
//! Converts raw frame timestamps (whatever monotonic clock the host loop
//! provides) into elapsed run time. Pauses are logical: ticks are skipped
//! while paused and the accumulated pause duration is subtracted afterward,
//! so difficulty and spawn timing never see wall-clock pause time.

/// Timebase for a single run
#[derive(Debug, Clone, Default)]
pub struct RunClock {
    start: Option<f64>,
    last_raw: f64,
    total_paused: f64,
    pause_start: Option<f64>,
    elapsed: f64,
}

impl RunClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to a new raw timestamp, returning `(elapsed, dt)`.
    ///
    /// The first call captures the start time and returns zeros. A timestamp
    /// earlier than the previous one (scene reload, clock hiccup) yields
    /// `dt = 0` and leaves elapsed time unchanged rather than running the
    /// simulation backward.
    pub fn advance(&mut self, raw: f64) -> (f64, f32) {
        let start = match self.start {
            Some(s) => s,
            None => {
                self.start = Some(raw);
                self.last_raw = raw;
                return (0.0, 0.0);
            }
        };

        let dt = (raw - self.last_raw).max(0.0);
        self.last_raw = self.last_raw.max(raw);

        let elapsed = (raw - self.total_paused) - start;
        self.elapsed = self.elapsed.max(elapsed);
        (self.elapsed, dt as f32)
    }

    /// Elapsed run time as of the last `advance`
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Mark the beginning of a pause. Nested calls keep the earliest start.
    pub fn record_pause_start(&mut self, raw: f64) {
        if self.pause_start.is_none() {
            self.pause_start = Some(raw);
        }
    }

    /// Mark the end of a pause, folding its duration into the offset
    pub fn record_pause_end(&mut self, raw: f64) {
        if let Some(begin) = self.pause_start.take() {
            self.total_paused += (raw - begin).max(0.0);
            self.last_raw = self.last_raw.max(raw);
        }
    }
}
