//! Doubled item strip whose measured length defines the loop period
//!
//! The strip is the item sequence followed by an identical copy, with a gap
//! after every item. Translating it by any offset in `(-period, 0]` always
//! leaves a full period of content ahead of the viewport, so the wrap back
//! to 0 is invisible.

use unicode_width::UnicodeWidthStr;

use crate::error::{Error, Result};

/// Something with a measurable extent along the scroll axis
pub trait Measure {
    fn extent(&self) -> f64;
}

impl Measure for str {
    fn extent(&self) -> f64 {
        self.width() as f64
    }
}

impl Measure for String {
    fn extent(&self) -> f64 {
        self.as_str().extent()
    }
}

impl<T: Measure + ?Sized> Measure for &T {
    fn extent(&self) -> f64 {
        (**self).extent()
    }
}

/// An item placed on screen for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Index into [`Track::items`]
    pub item: usize,
    /// Position in the doubled sequence (`0..2 * len`), used for labels
    pub slot: usize,
    /// Leading edge in viewport coordinates (may be negative)
    pub start: f64,
    pub extent: f64,
}

impl Placement {
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.extent
    }
}

#[derive(Debug, Clone)]
pub struct Track<T> {
    items: Vec<T>,
    extents: Vec<f64>,
    gap: f64,
}

impl<T: Measure> Track<T> {
    /// Build a track whose items measure themselves
    pub fn measured(items: Vec<T>, gap: f64) -> Self {
        let extents = items.iter().map(Measure::extent).collect();
        Self::from_parts(items, extents, gap)
    }
}

impl<T> Track<T> {
    /// Build a track where every item has the same extent
    pub fn uniform(items: Vec<T>, extent: f64, gap: f64) -> Self {
        let extents = vec![extent.max(0.0); items.len()];
        Self::from_parts(items, extents, gap)
    }

    fn from_parts(items: Vec<T>, extents: Vec<f64>, gap: f64) -> Self {
        let gap = if gap.is_finite() { gap.max(0.0) } else { 0.0 };
        let extents = extents
            .into_iter()
            .map(|e| if e.is_finite() { e.max(0.0) } else { 0.0 })
            .collect();
        Self { items, extents, gap }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The rendered sequence: every item twice, back to back
    pub fn doubled(&self) -> impl Iterator<Item = &T> {
        self.items.iter().chain(self.items.iter())
    }

    /// Total length of the doubled strip
    pub fn measured_length(&self) -> f64 {
        2.0 * self.copy_length()
    }

    /// Distance after which the strip repeats exactly
    ///
    /// Fails with [`Error::InvalidParameter`] for an empty or zero-width
    /// track rather than handing a zero period to the animator.
    pub fn period(&self) -> Result<f64> {
        Error::check_positive("period", self.measured_length() / 2.0)
    }

    /// Which doubled slot covers strip `position`, and how far into it
    ///
    /// Positions wrap modulo the doubled length. Returns `None` for a gap
    /// or a zero-length track.
    pub fn item_at(&self, position: f64) -> Option<(usize, f64)> {
        let length = self.measured_length();
        if !(length > 0.0) || !position.is_finite() {
            return None;
        }

        let mut cursor = 0.0;
        let position = position.rem_euclid(length);
        for (slot, extent) in self.extents.iter().chain(self.extents.iter()).enumerate() {
            if position < cursor + extent {
                return Some((slot, position - cursor));
            }
            cursor += extent + self.gap;
            if position < cursor {
                return None;
            }
        }
        None
    }

    /// Items visible in `[0, viewport)` when the strip is translated by `offset`
    ///
    /// Content repeats past the doubled strip if the viewport is wider than
    /// a period, so the view is never left blank.
    pub fn placements(&self, offset: f64, viewport: f64) -> Vec<Placement> {
        let mut placements = Vec::new();
        let copy = self.copy_length();
        if !(copy > 0.0) || !offset.is_finite() || !(viewport > 0.0) {
            return placements;
        }

        // Start at the copy boundary just left of the viewport
        let mut cursor = offset - (offset / copy).ceil().max(0.0) * copy;
        let mut slot = 0usize;
        while cursor < viewport {
            let item = slot % self.len();
            let extent = self.extents[item];
            let end = cursor + extent;
            if end > 0.0 && extent > 0.0 {
                placements.push(Placement {
                    item,
                    slot: slot % (2 * self.len()),
                    start: cursor,
                    extent,
                });
            }
            cursor = end + self.gap;
            slot += 1;
        }
        placements
    }

    fn copy_length(&self) -> f64 {
        self.extents.iter().map(|e| e + self.gap).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certificates(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Certificate {i}")).collect()
    }

    #[test]
    fn test_doubled_sequence() {
        let track = Track::uniform(vec!["a", "b", "c"], 4.0, 1.0);
        let doubled: Vec<_> = track.doubled().copied().collect();
        assert_eq!(doubled, ["a", "b", "c", "a", "b", "c"]);
    }

    #[test]
    fn test_period_is_half_measured_length() {
        let track = Track::uniform(certificates(10), 18.0, 2.0);
        assert_eq!(track.measured_length(), 400.0);
        assert_eq!(track.period().unwrap(), 200.0);
    }

    #[test]
    fn test_zero_length_track_rejected() {
        let empty: Track<String> = Track::uniform(Vec::new(), 18.0, 2.0);
        assert!(matches!(
            empty.period(),
            Err(Error::InvalidParameter { name: "period", .. })
        ));

        let flat = Track::uniform(vec!["x"], 0.0, 0.0);
        assert!(flat.period().is_err());
        assert!(flat.placements(0.0, 80.0).is_empty());
        assert!(flat.item_at(0.0).is_none());
    }

    #[test]
    fn test_measured_uses_display_width() {
        let track = Track::measured(vec!["ab".to_string(), "証明書".to_string()], 1.0);
        // 2 + 1 + 6 + 1 per copy
        assert_eq!(track.period().unwrap(), 10.0);
    }

    #[test]
    fn test_item_at() {
        let track = Track::uniform(vec!["a", "b"], 4.0, 1.0);
        assert_eq!(track.item_at(0.0), Some((0, 0.0)));
        assert_eq!(track.item_at(3.5), Some((0, 3.5)));
        assert_eq!(track.item_at(4.5), None);
        assert_eq!(track.item_at(5.0), Some((1, 0.0)));
        assert_eq!(track.item_at(10.0), Some((2, 0.0)));
        // Wraps past the doubled length
        assert_eq!(track.item_at(21.0), Some((0, 1.0)));
    }

    #[test]
    fn test_placements_at_rest() {
        let track = Track::uniform(vec!["a", "b", "c"], 4.0, 1.0);
        let placed = track.placements(0.0, 12.0);

        let starts: Vec<_> = placed.iter().map(|p| p.start).collect();
        assert_eq!(starts, [0.0, 5.0, 10.0]);
        assert_eq!(placed[2].item, 2);
    }

    #[test]
    fn test_placements_translated() {
        let track = Track::uniform(vec!["a", "b", "c"], 4.0, 1.0);
        let placed = track.placements(-7.0, 10.0);

        // "b" is cut off on the left, "c" and the copy of "a" follow
        assert_eq!(placed[0].item, 1);
        assert_eq!(placed[0].start, -2.0);
        assert_eq!(placed[1].item, 2);
        assert_eq!(placed[2].item, 0);
        assert_eq!(placed[2].slot, 3);
        assert_eq!(placed[2].start, 8.0);
    }

    #[test]
    fn test_placements_identical_at_wrap_point() {
        // Offset -period and offset 0 must render the same frame
        let track = Track::uniform(certificates(4), 6.0, 2.0);
        let period = track.period().unwrap();

        let at_zero: Vec<_> = track
            .placements(0.0, 20.0)
            .iter()
            .map(|p| (p.item, p.start))
            .collect();
        let at_period: Vec<_> = track
            .placements(-period, 20.0)
            .iter()
            .map(|p| (p.item, p.start))
            .collect();
        assert_eq!(at_zero, at_period);
    }

    #[test]
    fn test_placements_fill_wide_viewport() {
        let track = Track::uniform(vec!["a"], 3.0, 1.0);
        let placed = track.placements(-0.5, 20.0);
        let last = placed.last().unwrap();
        assert!(last.end() >= 20.0 - 1.0);
        assert!(placed.len() >= 5);
    }
}
