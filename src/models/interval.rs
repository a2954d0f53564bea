//! Time interval primitives.
//!
//! Overlap and containment tests used by the availability checker and
//! the scheduling board.
//!
//! # Time Model
//! All times are milliseconds since the Unix epoch (UTC). Callers supply
//! already-parsed, comparable instants; nothing here parses or converts
//! time zones.
//!
//! # Interval Conventions
//! - Bookings are half-open `[start, end)`: two back-to-back bookings
//!   (`[9:00, 10:00)` and `[10:00, 11:00)`) do not overlap.
//! - Availability windows are closed `[start, end]`: a booking may end
//!   exactly at the close of the window.

use serde::{Deserialize, Serialize};

/// Whether two half-open intervals `[a_start, a_end)` and `[b_start, b_end)`
/// share any instant.
///
/// Symmetric: `overlaps(a, b) == overlaps(b, a)`.
///
/// ```
/// use u_fleet::models::overlaps;
///
/// assert!(overlaps(0, 100, 50, 150));
/// assert!(!overlaps(0, 100, 100, 200)); // touching
/// ```
#[inline]
pub fn overlaps(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> bool {
    a_start < b_end && b_start < a_end
}

/// Whether `point` lies within the closed window `[window_start, window_end]`.
#[inline]
pub fn within_window(point: i64, window_start: i64, window_end: i64) -> bool {
    point >= window_start && point <= window_end
}

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (ms, inclusive).
    pub start_ms: i64,
    /// Interval end (ms, exclusive).
    pub end_ms: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Duration of this window (ms).
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Whether the window is non-empty (`start < end`).
    #[inline]
    pub fn is_proper(&self) -> bool {
        self.start_ms < self.end_ms
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, time_ms: i64) -> bool {
        time_ms >= self.start_ms && time_ms < self.end_ms
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        overlaps(self.start_ms, self.end_ms, other.start_ms, other.end_ms)
    }

    /// Length of the intersection with another window (ms), 0 if disjoint.
    pub fn overlap_ms(&self, other: &Self) -> i64 {
        let start = self.start_ms.max(other.start_ms);
        let end = self.end_ms.min(other.end_ms);
        (end - start).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(100, 200);
        assert_eq!(w.duration_ms(), 100);
        assert!(w.contains(100));
        assert!(w.contains(199));
        assert!(!w.contains(200)); // exclusive end
        assert!(!w.contains(50));
        assert!(w.is_proper());
        assert!(!TimeWindow::new(200, 200).is_proper());
    }

    #[test]
    fn test_overlap_symmetry() {
        let cases = [
            (0, 100, 50, 150),
            (0, 100, 100, 200),
            (0, 100, 20, 30),
            (50, 60, 0, 10),
            (0, 10, 0, 10),
        ];
        for (a0, a1, b0, b1) in cases {
            assert_eq!(overlaps(a0, a1, b0, b1), overlaps(b0, b1, a0, a1));
        }
    }

    #[test]
    fn test_back_to_back_bookings_do_not_overlap() {
        // [9:00, 10:00) and [10:00, 11:00)
        assert!(!overlaps(9 * HOUR, 10 * HOUR, 10 * HOUR, 11 * HOUR));
        // [9:00, 10:00) and [9:30, 10:30)
        assert!(overlaps(9 * HOUR, 10 * HOUR, 9 * HOUR + HOUR / 2, 10 * HOUR + HOUR / 2));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = TimeWindow::new(0, 1000);
        let inner = TimeWindow::new(200, 300);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert_eq!(outer.overlap_ms(&inner), 100);
        assert_eq!(inner.overlap_ms(&TimeWindow::new(500, 600)), 0);
    }

    #[test]
    fn test_within_window_inclusive() {
        assert!(within_window(8 * HOUR, 8 * HOUR, 18 * HOUR));
        assert!(within_window(18 * HOUR, 8 * HOUR, 18 * HOUR));
        assert!(within_window(12 * HOUR, 8 * HOUR, 18 * HOUR));
        assert!(!within_window(18 * HOUR + 1, 8 * HOUR, 18 * HOUR));
        assert!(!within_window(7 * HOUR, 8 * HOUR, 18 * HOUR));
    }
}
