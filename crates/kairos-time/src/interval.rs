//! Half-open interval arithmetic over UTC instants.
//!
//! All set operations accept unsorted, possibly-overlapping input and
//! normalise first: empty intervals are dropped, the rest sorted by
//! `(start, end)`. Results are sorted ascending and pairwise disjoint.
//! Under the half-open convention `[start, end)`, intervals that merely
//! touch at an endpoint merge under union but do not overlap for
//! subtraction or intersection.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// An interval is empty when `start >= end`. Empty intervals are dropped
    /// by every operation in this module.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `other` lies entirely within `self`.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the instant falls inside `[start, end)`.
    pub fn contains_instant(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    /// Clip to `bounds`, returning `None` when nothing remains.
    pub fn clip(&self, bounds: &Interval) -> Option<Interval> {
        let clipped = Interval::new(self.start.max(bounds.start), self.end.min(bounds.end));
        (!clipped.is_empty()).then_some(clipped)
    }
}

/// Drop empties and sort by `(start, end)`.
fn normalize(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals
        .iter()
        .copied()
        .filter(|iv| !iv.is_empty())
        .collect();
    sorted.sort();
    sorted
}

/// Merge overlapping or touching intervals into a sorted disjoint union.
pub fn merge_intervals(intervals: &[Interval]) -> Vec<Interval> {
    let sorted = normalize(intervals);
    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for iv in sorted {
        if let Some(last) = merged.last_mut() {
            if iv.start <= last.end {
                // Overlapping or adjacent -- extend the current interval.
                last.end = last.end.max(iv.end);
                continue;
            }
        }
        merged.push(iv);
    }
    merged
}

/// Subtract the union of `sub` from the union of `from`.
///
/// A subtrahend that only shares an endpoint removes nothing. The result
/// never extends past the input and stays sorted ascending.
pub fn subtract_intervals(from: &[Interval], sub: &[Interval]) -> Vec<Interval> {
    let from = merge_intervals(from);
    let sub = merge_intervals(sub);

    let mut result = Vec::with_capacity(from.len());
    let mut si = 0;

    for iv in from {
        let mut cursor = iv.start;

        while si < sub.len() && sub[si].end <= cursor {
            si += 1;
        }

        let mut j = si;
        while j < sub.len() && sub[j].start < iv.end {
            if sub[j].start > cursor {
                result.push(Interval::new(cursor, sub[j].start));
            }
            cursor = cursor.max(sub[j].end);
            j += 1;
        }

        if cursor < iv.end {
            result.push(Interval::new(cursor, iv.end));
        }
    }

    result
}

/// Intersect the unions of `a` and `b`.
///
/// Two-pointer walk over the normalised lists: emit the overlap when
/// non-empty, then advance whichever interval ends first.
pub fn intersect_intervals(a: &[Interval], b: &[Interval]) -> Vec<Interval> {
    let a = merge_intervals(a);
    let b = merge_intervals(b);

    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let overlap = Interval::new(a[i].start.max(b[j].start), a[i].end.min(b[j].end));
        if !overlap.is_empty() {
            result.push(overlap);
        }
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }

    result
}
