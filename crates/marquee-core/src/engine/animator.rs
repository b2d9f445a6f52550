//! L3 Molecular Layer: Continuous loop animation controller
//!
//! Chains [`Segment`]s end to end so the offset decreases forever at a
//! constant velocity, re-anchoring into one period at every boundary.
//! Call [`LoopAnimator::tick`] every frame; call `pause()`/`resume()` from
//! the same context when the pointer enters or leaves the strip.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, trace};

use super::clock::{Clock, SystemClock};
use super::segment::Segment;
use super::timing::travel_time;
use super::wrap::{land, rewrap};
use crate::error::{Error, Result};

/// Whether the loop is moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Running(Segment),
    Paused,
    Disposed,
}

/// State reached by advancing a segment to some instant
#[derive(Debug, Clone, Copy)]
struct Advance {
    offset: f64,
    wraps: u64,
    segment: Segment,
}

/// Point-in-time view of a loop, for status lines and simulation output
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub offset: f64,
    pub wraps: u64,
    pub state: RunState,
    pub period: f64,
    pub velocity: f64,
}

impl Snapshot {
    /// Offset as a fraction of the period, in `[0, 1)`
    pub fn phase(&self) -> f64 {
        (self.offset.abs() % self.period) / self.period
    }

    /// Serialize as one line of JSON
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Loop animation controller
///
/// Owns the offset, the run state and the in-flight segment. The track
/// being animated is only known through its period.
#[derive(Debug, Clone)]
pub struct LoopAnimator<C: Clock = SystemClock> {
    clock: C,
    period: f64,
    velocity: f64,
    /// Offset as of the last tick, pause or resume
    offset: f64,
    /// Boundaries crossed since construction
    wraps: u64,
    phase: Phase,
}

impl LoopAnimator<SystemClock> {
    /// Start a running loop on wall-clock time at offset 0
    pub fn start(period: f64, velocity: f64) -> Result<Self> {
        Self::new(SystemClock, period, velocity, RunState::Running)
    }
}

impl<C: Clock> LoopAnimator<C> {
    /// Create a loop at offset 0 in the given state
    ///
    /// Fails with [`Error::InvalidParameter`] before anything is scheduled if
    /// `period` or `velocity` is not a positive finite number.
    pub fn new(clock: C, period: f64, velocity: f64, initial: RunState) -> Result<Self> {
        let period = Error::check_positive("period", period)?;
        let velocity = Error::check_positive("velocity", velocity)?;

        let phase = match initial {
            RunState::Running => Phase::Running(Segment::plan(0.0, period, velocity, clock.now())),
            RunState::Paused => Phase::Paused,
        };
        debug!(period, velocity, ?initial, "Loop animator created");

        Ok(Self {
            clock,
            period,
            velocity,
            offset: 0.0,
            wraps: 0,
            phase,
        })
    }

    /// Move the loop to `offset` (re-anchored into one period)
    ///
    /// Used when rebuilding an animator, e.g. after the track is re-measured,
    /// so the strip does not jump back to the start.
    pub fn with_offset(mut self, offset: f64) -> Self {
        let offset = if offset.is_finite() {
            rewrap(offset, self.period).offset
        } else {
            0.0
        };
        self.offset = offset;
        if let Phase::Running(_) = self.phase {
            self.phase = Phase::Running(self.plan_from(offset, self.clock.now()));
        }
        self
    }

    /// Start the wrap count at `wraps` instead of zero
    pub fn with_wraps(mut self, wraps: u64) -> Self {
        self.wraps = wraps;
        self
    }

    /// Loop period
    #[inline]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Configured velocity in period units per second
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Time one full period takes
    #[inline]
    pub fn period_duration(&self) -> Duration {
        travel_time(self.period, self.velocity)
    }

    /// Boundaries crossed as of the last committed tick
    #[inline]
    pub fn wraps(&self) -> u64 {
        self.wraps
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        matches!(self.phase, Phase::Disposed)
    }

    pub fn state(&self) -> Result<RunState> {
        match self.phase {
            Phase::Running(_) => Ok(RunState::Running),
            Phase::Paused => Ok(RunState::Paused),
            Phase::Disposed => Err(Error::Disposed),
        }
    }

    /// Offset, wraps and state at the clock's current time
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            offset: self.current_offset()?,
            wraps: self.wraps,
            state: self.state()?,
            period: self.period,
            velocity: self.velocity,
        })
    }

    /// The leg currently in flight, if running
    pub fn segment(&self) -> Option<&Segment> {
        match &self.phase {
            Phase::Running(segment) => Some(segment),
            _ => None,
        }
    }

    /// Instantaneous offset at the clock's current time
    ///
    /// Does not commit anything; the next `tick()` will observe the same
    /// value for the same instant.
    pub fn current_offset(&self) -> Result<f64> {
        match &self.phase {
            Phase::Running(segment) => Ok(self.advance(segment, self.clock.now()).offset),
            Phase::Paused => Ok(self.offset),
            Phase::Disposed => Err(Error::Disposed),
        }
    }

    /// Advance to the clock's current time and return the offset
    ///
    /// Applies the wrap correction and starts the next leg when the current
    /// one has finished. A paused loop returns its frozen offset.
    pub fn tick(&mut self) -> Result<f64> {
        match self.phase {
            Phase::Running(segment) => {
                let now = self.clock.now();
                self.commit(segment, now);
                Ok(self.offset)
            }
            Phase::Paused => Ok(self.offset),
            Phase::Disposed => Err(Error::Disposed),
        }
    }

    /// Freeze the offset where it is right now
    ///
    /// No-op when already paused.
    pub fn pause(&mut self) -> Result<()> {
        match self.phase {
            Phase::Running(segment) => {
                let now = self.clock.now();
                self.commit(segment, now);
                self.phase = Phase::Paused;
                debug!(offset = self.offset, "Loop paused");
                Ok(())
            }
            Phase::Paused => Ok(()),
            Phase::Disposed => Err(Error::Disposed),
        }
    }

    /// Continue from the frozen offset
    ///
    /// The new leg is planned from the frozen offset, so time spent paused
    /// never counts as motion. No-op when already running.
    pub fn resume(&mut self) -> Result<()> {
        match self.phase {
            Phase::Paused => {
                let segment = self.plan_from(self.offset, self.clock.now());
                debug!(
                    offset = self.offset,
                    target = segment.target,
                    duration_ms = segment.duration.as_millis(),
                    "Loop resumed"
                );
                self.phase = Phase::Running(segment);
                Ok(())
            }
            Phase::Running(_) => Ok(()),
            Phase::Disposed => Err(Error::Disposed),
        }
    }

    /// Flip between running and paused, returning the new state
    pub fn toggle(&mut self) -> Result<RunState> {
        match self.state()? {
            RunState::Running => self.pause()?,
            RunState::Paused => self.resume()?,
        }
        self.state()
    }

    /// Cancel the in-flight leg; every later call fails with [`Error::Disposed`]
    pub fn dispose(&mut self) -> Result<()> {
        if self.is_disposed() {
            return Err(Error::Disposed);
        }
        self.phase = Phase::Disposed;
        debug!(offset = self.offset, wraps = self.wraps, "Loop disposed");
        Ok(())
    }

    fn plan_from(&self, offset: f64, at: Instant) -> Segment {
        Segment::plan(offset, self.period, self.velocity, at)
    }

    fn commit(&mut self, segment: Segment, now: Instant) {
        let advance = self.advance(&segment, now);
        if advance.wraps > 0 {
            trace!(wraps = advance.wraps, offset = advance.offset, "Loop wrapped");
        }
        self.offset = advance.offset;
        self.wraps += advance.wraps;
        self.phase = Phase::Running(advance.segment);
    }

    /// Where `segment` puts the loop at `now`, chaining legs as needed
    fn advance(&self, segment: &Segment, now: Instant) -> Advance {
        let ended = match segment.ends_at() {
            Some(ended) if segment.is_complete(now) => ended,
            _ => {
                let wrapped = rewrap(segment.offset_at(now), self.period);
                let segment = if wrapped.wraps > 0 {
                    self.plan_from(wrapped.offset, now)
                } else {
                    *segment
                };
                return Advance {
                    offset: wrapped.offset,
                    wraps: wrapped.wraps,
                    segment,
                };
            }
        };

        // The leg is over: land on its boundary and chain the next one from
        // the instant it ended, skipping whole periods a stalled tick missed.
        let landed = land(segment.target, self.period);
        let behind = now.saturating_duration_since(ended);
        let full = self.period_duration().max(Duration::from_nanos(1));
        let skipped = behind.as_nanos() / full.as_nanos();
        if !behind.is_zero() {
            trace!(
                behind_ms = behind.as_millis(),
                skipped_periods = skipped as u64,
                "Tick overshot segment end"
            );
        }

        let skip = u64::try_from(full.as_nanos().saturating_mul(skipped))
            .map(Duration::from_nanos)
            .unwrap_or(Duration::MAX);
        let next_start = ended.checked_add(skip).unwrap_or(now);
        let next = self.plan_from(landed.offset, next_start);

        Advance {
            offset: next.offset_at(now),
            wraps: landed.wraps + skipped as u64,
            segment: next,
        }
    }
}
