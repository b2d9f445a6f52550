//! L4 Atomic Layer: Time calculation utilities for loop animation
//!
//! Pure functions over explicit instants; nothing here reads the clock.

use std::time::{Duration, Instant};

/// Calculate progress (0.0 to 1.0) of a leg that started at `start`
///
/// Returns 1.0 for a zero duration and clamps late samples to 1.0, so a
/// tick arriving after the end never extrapolates past the target.
#[inline]
pub fn progress_at(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check whether a leg has run its full duration at `now`
#[inline]
pub fn is_complete_at(start: Instant, duration: Duration, now: Instant) -> bool {
    now.saturating_duration_since(start) >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Convert a distance at a velocity into a duration
///
/// Both inputs are validated positive upstream; a result too large for a
/// `Duration` saturates instead of panicking.
#[inline]
pub fn travel_time(distance: f64, velocity: f64) -> Duration {
    Duration::try_from_secs_f64(distance / velocity).unwrap_or(Duration::MAX)
}
