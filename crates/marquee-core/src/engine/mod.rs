//! Continuous loop animation engine for the certificate carousel
//!
//! Drives a single scalar offset leftwards at a constant velocity, wrapping
//! seamlessly every `period` units. Motion is planned as a chain of segments,
//! each ending exactly on a period boundary, and is advanced by ticks from a
//! [`Clock`].
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `clock` - Tick sources (system time, manual time for tests and simulation)
//! - `timing` - Progress and interpolation helpers
//! - `wrap` - Modular arithmetic for boundary distance and re-anchoring
//!
//! ## L3 Molecular Layer
//! - `segment` - One planned leg of motion between wrap boundaries
//! - `animator` - The loop state machine combining the atoms
//!
//! # Usage
//!
//! ```ignore
//! use marquee_core::LoopAnimator;
//!
//! let track_period = track.period()?;
//! let mut animator = LoopAnimator::start(track_period, 120.0)?;
//!
//! // Each frame
//! let offset = animator.tick()?;
//!
//! // Pointer enters / leaves the strip
//! animator.pause()?;
//! animator.resume()?;
//! ```

// L4 Atomic Layer
pub mod clock;
pub mod timing;
pub mod wrap;

// L3 Molecular Layer
pub mod animator;
pub mod segment;

pub use animator::{LoopAnimator, RunState, Snapshot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use segment::Segment;
