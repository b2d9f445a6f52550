//! L4 Atomic Layer: Modular arithmetic for the seamless loop
//!
//! Offsets move leftwards, so the engine keeps them in `(-period, 0]`.
//! Magnitudes are reduced modulo the period rather than by a single
//! subtraction, so an overshoot of any number of periods lands correctly.

/// Result of re-anchoring an offset into one period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rewrap {
    /// Offset inside `(-period, 0]`
    pub offset: f64,
    /// Number of whole periods removed
    pub wraps: u64,
}

/// Distance left to travel before `|offset|` hits the next multiple of `period`
///
/// Exactly on a boundary (including offset 0) this is a full period, never
/// zero.
#[inline]
pub fn distance_to_boundary(offset: f64, period: f64) -> f64 {
    let remainder = offset.abs() % period;
    if remainder == 0.0 {
        period
    } else {
        period - remainder
    }
}

/// Re-anchor an offset into `(-period, 0]` if its magnitude reached a period
#[inline]
pub fn rewrap(offset: f64, period: f64) -> Rewrap {
    let magnitude = offset.abs();
    if magnitude < period {
        return Rewrap { offset, wraps: 0 };
    }

    let remainder = magnitude % period;
    let wraps = ((magnitude - remainder) / period).round() as u64;
    Rewrap {
        // `+ 0.0` folds -0.0 into 0.0
        offset: -remainder + 0.0,
        wraps,
    }
}

/// Land a finished leg on its boundary
///
/// A leg's target is a multiple of the period by construction, but float
/// rounding can leave it a hair short (e.g. `-999.9999999999999`). Landing
/// snaps to offset 0 and counts the boundaries crossed, at least one.
#[inline]
pub fn land(target: f64, period: f64) -> Rewrap {
    let crossed = (target.abs() / period).round() as u64;
    Rewrap {
        offset: 0.0,
        wraps: crossed.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_at_boundary_is_full_period() {
        assert_eq!(distance_to_boundary(0.0, 1000.0), 1000.0);
        assert_eq!(distance_to_boundary(-0.0, 1000.0), 1000.0);
        assert_eq!(distance_to_boundary(-1000.0, 1000.0), 1000.0);
        assert_eq!(distance_to_boundary(-3000.0, 1000.0), 1000.0);
    }

    #[test]
    fn test_distance_inside_period() {
        assert!((distance_to_boundary(-240.0, 1000.0) - 760.0).abs() < 1e-9);
        assert!((distance_to_boundary(-1240.0, 1000.0) - 760.0).abs() < 1e-9);
        assert!((distance_to_boundary(-999.5, 1000.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rewrap_inside_range_is_untouched() {
        let r = rewrap(-999.0, 1000.0);
        assert_eq!(r, Rewrap { offset: -999.0, wraps: 0 });
    }

    #[test]
    fn test_rewrap_single_period() {
        let r = rewrap(-1000.0, 1000.0);
        assert_eq!(r.offset, 0.0);
        assert!(r.offset.is_sign_positive());
        assert_eq!(r.wraps, 1);

        let r = rewrap(-1250.0, 1000.0);
        assert!((r.offset + 250.0).abs() < 1e-9);
        assert_eq!(r.wraps, 1);
    }

    #[test]
    fn test_rewrap_many_periods() {
        // Overshoot larger than one period still lands inside the range
        let r = rewrap(-4321.0, 1000.0);
        assert!((r.offset + 321.0).abs() < 1e-9);
        assert_eq!(r.wraps, 4);
    }

    #[test]
    fn test_land_snaps_short_target() {
        let r = land(-999.999_999_999_9, 1000.0);
        assert_eq!(r, Rewrap { offset: 0.0, wraps: 1 });

        let r = land(-1000.000_000_000_1, 1000.0);
        assert_eq!(r, Rewrap { offset: 0.0, wraps: 1 });
    }
}
