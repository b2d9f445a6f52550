//! L3 Molecular Layer: One planned leg of constant-velocity motion

use std::time::{Duration, Instant};

use super::timing::{is_complete_at, lerp, progress_at, travel_time};
use super::wrap::distance_to_boundary;

/// Linear motion from the current offset to the next period boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Offset when the leg started
    pub start_offset: f64,
    /// Offset at the boundary this leg ends on
    pub target: f64,
    /// Time the leg takes at the configured velocity
    pub duration: Duration,
    /// Instant the leg started
    pub started_at: Instant,
}

impl Segment {
    /// Plan the leg that carries `offset` to the next boundary
    pub fn plan(offset: f64, period: f64, velocity: f64, started_at: Instant) -> Self {
        let distance = distance_to_boundary(offset, period);
        Self {
            start_offset: offset,
            target: offset - distance,
            duration: travel_time(distance, velocity),
            started_at,
        }
    }

    /// Distance this leg covers
    #[inline]
    pub fn distance(&self) -> f64 {
        self.start_offset - self.target
    }

    /// Instant the leg reaches its target, `None` if it lies beyond `Instant`'s range
    #[inline]
    pub fn ends_at(&self) -> Option<Instant> {
        self.started_at.checked_add(self.duration)
    }

    #[inline]
    pub fn is_complete(&self, now: Instant) -> bool {
        is_complete_at(self.started_at, self.duration, now)
    }

    /// Offset at `now`, clamped to the target once the leg is over
    #[inline]
    pub fn offset_at(&self, now: Instant) -> f64 {
        let t = progress_at(self.started_at, self.duration, now);
        lerp(self.start_offset, self.target, t)
    }
}
