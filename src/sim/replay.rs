//! Replay recording and ghost playback
//!
//! One sample is appended per simulation tick. The trace is append-only and
//! read-only after capture; ghost playback interpolates between samples so a
//! previous run can be rendered alongside the current one, and the progress
//! marker at run end can animate along the recorded path.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::RunOutcome;

/// One recorded point of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplaySample {
    /// Elapsed run time at capture
    pub time: f64,
    /// Active actor center at capture
    pub pos: Vec2,
    /// Total score at capture
    pub score: u32,
}

/// Interpolated ghost position for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostSample {
    pub pos: Vec2,
    pub score: u32,
}

/// Append-only sequence of replay samples
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayTrace {
    samples: Vec<ReplaySample>,
}

impl ReplayTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: f64, pos: Vec2, score: u32) {
        self.samples.push(ReplaySample { time, pos, score });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[ReplaySample] {
        &self.samples
    }

    /// Duration covered by the trace
    pub fn duration(&self) -> f64 {
        self.samples.last().map(|s| s.time).unwrap_or(0.0)
    }

    /// Interpolated ghost state at an elapsed time.
    ///
    /// Returns `None` once the requested time passes the end of the trace
    /// (the ghost has finished its run). Before the first sample the ghost
    /// sits at that sample.
    pub fn sample_at(&self, elapsed: f64) -> Option<GhostSample> {
        let first = self.samples.first()?;
        if elapsed > self.duration() {
            return None;
        }
        if elapsed <= first.time {
            return Some(GhostSample {
                pos: first.pos,
                score: first.score,
            });
        }

        let mut prev = *first;
        for curr in &self.samples[1..] {
            if curr.time >= elapsed {
                let span = curr.time - prev.time;
                let ratio = if span > 0.0 {
                    ((elapsed - prev.time) / span) as f32
                } else {
                    1.0
                };
                let pos = prev.pos + (curr.pos - prev.pos) * ratio;
                let score = prev.score as f32 + (curr.score as f32 - prev.score as f32) * ratio;
                return Some(GhostSample {
                    pos,
                    score: score as u32,
                });
            }
            prev = *curr;
        }

        let last = self.samples.last()?;
        Some(GhostSample {
            pos: last.pos,
            score: last.score,
        })
    }
}

/// Immutable handoff to the persistence collaborator at run end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub final_score: u32,
    pub duration_seconds: f64,
    pub outcome: RunOutcome,
    pub trace: ReplayTrace,
}
