use std::{cmp::Ordering, collections::BTreeSet, ops::Bound};

use log::warn;
use smallvec::SmallVec;

use crate::{events::SweepPoint, segments::Segment};

/// Internal representation used in the ordered set.
///
/// Holds a copy of the segment as it was when inserted. The rank of a
/// segment depends on its last visited point, so the copy keeps every
/// comparison inside the set consistent with the order the set was
/// built with. Updating a segment requires a remove followed by an
/// insert.
#[derive(Debug, Clone, Copy)]
pub struct ActiveSegment {
    key: usize,
    segment: Segment,
}

impl ActiveSegment {
    #[inline]
    pub fn new(key: usize, segment: Segment) -> Self {
        ActiveSegment { key, segment }
    }

    #[inline]
    pub fn key(&self) -> usize {
        self.key
    }

    #[inline]
    pub fn segment(&self) -> &Segment {
        &self.segment
    }
}

/// Equality based on key.
///
/// This is consistent with the `Ord` impl.
impl PartialEq for ActiveSegment {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ActiveSegment {}

impl PartialOrd for ActiveSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rank order of the segments, with the storage key breaking ties
/// between collinear segments.
impl Ord for ActiveSegment {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.key == other.key {
            return Ordering::Equal;
        }
        self.segment
            .cmp_rank(&other.segment)
            .then_with(|| self.key.cmp(&other.key))
    }
}

/// An active neighbor of a segment, and where they intersect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjacentIntersection {
    pub upper: usize,
    pub lower: usize,
    pub point: Option<SweepPoint>,
}

/// The line status: segments currently crossed by the sweep line,
/// ordered bottom to top.
#[derive(Debug, Default)]
pub struct LineStatus {
    active: BTreeSet<ActiveSegment>,
}

impl LineStatus {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Add the segment stored at `key`.
    ///
    /// Panics if the key is already active.
    pub fn insert(&mut self, key: usize, segment: Segment) {
        assert!(
            self.active.insert(ActiveSegment::new(key, segment)),
            "segment {} is already active",
            key
        );
    }

    /// Check that the segment stored at `key` is active. `segment` must
    /// be the state the segment was inserted with.
    #[inline]
    pub fn contains(&self, key: usize, segment: &Segment) -> bool {
        self.active.contains(&ActiveSegment::new(key, *segment))
    }

    /// Remove the segment stored at `key`. `segment` must be the state
    /// the segment was inserted with.
    ///
    /// Returns `false` if the segment was not active.
    pub fn remove(&mut self, key: usize, segment: &Segment) -> bool {
        if self.active.remove(&ActiveSegment::new(key, *segment)) {
            return true;
        }
        // Only reachable if floating point degeneracy broke the order.
        let before = self.active.len();
        self.active.retain(|a| a.key != key);
        if self.active.len() != before {
            warn!("segment {} was out of order in the line status", key);
            true
        } else {
            false
        }
    }

    /// The active segment directly below `key`.
    #[inline]
    pub fn prev(&self, key: usize, segment: &Segment) -> Option<&ActiveSegment> {
        let bound = ActiveSegment::new(key, *segment);
        self.active
            .range((Bound::Unbounded, Bound::Excluded(bound)))
            .next_back()
    }

    /// The active segment directly above `key`.
    #[inline]
    pub fn next(&self, key: usize, segment: &Segment) -> Option<&ActiveSegment> {
        let bound = ActiveSegment::new(key, *segment);
        self.active
            .range((Bound::Excluded(bound), Bound::Unbounded))
            .next()
    }

    /// Keys of the segments directly below and above `key`.
    pub fn neighbors(&self, key: usize, segment: &Segment) -> (Option<usize>, Option<usize>) {
        (
            self.prev(key, segment).map(ActiveSegment::key),
            self.next(key, segment).map(ActiveSegment::key),
        )
    }

    /// Intersect the segment at `key` with each of its existing
    /// neighbors, the one below first.
    pub fn adj_intersections(
        &self,
        key: usize,
        segment: &Segment,
    ) -> SmallVec<[AdjacentIntersection; 2]> {
        let mut found = SmallVec::new();
        if let Some(below) = self.prev(key, segment) {
            found.push(AdjacentIntersection {
                upper: key,
                lower: below.key,
                point: segment.intersects_with(below.segment()),
            });
        }
        if let Some(above) = self.next(key, segment) {
            found.push(AdjacentIntersection {
                upper: above.key,
                lower: key,
                point: segment.intersects_with(above.segment()),
            });
        }
        found
    }

    /// Keys of the active segments, bottom to top.
    pub(crate) fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.active.iter().map(ActiveSegment::key)
    }
}
