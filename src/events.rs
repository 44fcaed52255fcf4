use std::{
    cmp::Ordering,
    collections::{BTreeSet, BinaryHeap},
    fmt,
    ops::Bound,
};

use geo::Coordinate;

use crate::kernel::{approx_eq, round_coord, EPSILON};

/// Wraps a [`Coordinate`] to support lexicographic ordering.
///
/// The ordering is by `x` and then by `y`. Both components are
/// rounded with [`round_coord`] on construction, so the derived
/// equality and the ordering agree on every value that can be stored.
/// This is necessary to support insertion to ordered collections,
/// especially `BinaryHeap` and `BTreeSet` as required by the sweep.
#[derive(Clone, Copy, PartialEq)]
pub struct SweepPoint(Coordinate<f64>);

impl SweepPoint {
    /// Create a rounded point. Panics if a component is not finite.
    pub fn new(x: f64, y: f64) -> Self {
        assert!(x.is_finite(), "sweep point requires a finite x-coordinate");
        assert!(y.is_finite(), "sweep point requires a finite y-coordinate");
        SweepPoint(Coordinate {
            x: round_coord(x),
            y: round_coord(y),
        })
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.0.y
    }

    /// The wrapped coordinate.
    #[inline]
    pub fn coord(&self) -> Coordinate<f64> {
        self.0
    }

    /// Euclidean distance between two points.
    #[inline]
    pub fn distance_from(&self, other: &SweepPoint) -> f64 {
        (other.x() - self.x()).hypot(other.y() - self.y())
    }

    /// An unrounded point, used only as a bound in range queries.
    #[inline]
    fn bound(x: f64, y: f64) -> Self {
        SweepPoint(Coordinate { x, y })
    }

    /// Equality up to [`EPSILON`] in each component.
    #[inline]
    pub fn approx_eq(&self, other: &SweepPoint) -> bool {
        approx_eq(self.x(), other.x(), EPSILON) && approx_eq(self.y(), other.y(), EPSILON)
    }
}

impl fmt::Debug for SweepPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x(), self.y())
    }
}

/// Implement lexicographic ordering by `x` and then by `y`
/// coordinate.
impl PartialOrd for SweepPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SweepPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x()
            .total_cmp(&other.x())
            .then_with(|| self.y().total_cmp(&other.y()))
    }
}

/// Components are finite and rounded, so `==` is an equivalence.
impl Eq for SweepPoint {}

/// Create from `Coordinate` while checking the components are finite.
impl From<Coordinate<f64>> for SweepPoint {
    fn from(pt: Coordinate<f64>) -> Self {
        SweepPoint::new(pt.x, pt.y)
    }
}

impl From<(f64, f64)> for SweepPoint {
    fn from((x, y): (f64, f64)) -> Self {
        SweepPoint::new(x, y)
    }
}

/// Event type to associate with event.
///
/// The ordering of the variants is important for the algorithm. At a
/// common x-coordinate a segment must be registered before any
/// intersection involving it is handled, and it may only be removed
/// after every intersection at that x has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    StartPoint,
    Intersection,
    EndPoint,
}

impl EventType {
    #[inline]
    pub fn priority(self) -> u8 {
        match self {
            EventType::StartPoint => 0,
            EventType::Intersection => 1,
            EventType::EndPoint => 2,
        }
    }
}

/// Segments an event refers to, as keys into the sweep storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSegments {
    One(usize),
    Two { upper: usize, lower: usize },
}

/// A sweep event for sweep-line algorithms.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    pub point: SweepPoint,
    pub ty: EventType,
    pub segments: EventSegments,
}

impl Event {
    pub fn start(point: SweepPoint, segment_key: usize) -> Self {
        Event {
            point,
            ty: EventType::StartPoint,
            segments: EventSegments::One(segment_key),
        }
    }

    pub fn end(point: SweepPoint, segment_key: usize) -> Self {
        Event {
            point,
            ty: EventType::EndPoint,
            segments: EventSegments::One(segment_key),
        }
    }

    pub fn intersection(point: SweepPoint, upper: usize, lower: usize) -> Self {
        Event {
            point,
            ty: EventType::Intersection,
            segments: EventSegments::Two { upper, lower },
        }
    }

    /// Sweep order: by `x`, then by event type, then by `y`.
    fn sweep_cmp(&self, other: &Self) -> Ordering {
        self.point
            .x()
            .total_cmp(&other.point.x())
            .then_with(|| self.ty.priority().cmp(&other.ty.priority()))
            .then_with(|| self.point.y().total_cmp(&other.point.y()))
    }
}

/// Equality check for usage in ordered sets. Note that it ignores
/// the segment keys.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.sweep_cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

/// Ordering for use with a max-heap (`BinaryHeap`). Note that it
/// ignores the segment keys. This suffices for heap usage, where
/// repeated items are allowed.
impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sweep_cmp(other).reverse()
    }
}

/// Priority queue of pending sweep events, smallest first.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Event>,
}

impl EventQueue {
    pub fn with_capacity(size: usize) -> Self {
        EventQueue {
            heap: BinaryHeap::with_capacity(size),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, event: Event) {
        self.heap.push(event);
    }

    /// Schedule an intersection event at `point`.
    #[inline]
    pub fn push_intersection(&mut self, point: SweepPoint, upper: usize, lower: usize) {
        self.push(Event::intersection(point, upper, lower));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop()
    }

    #[inline]
    pub fn peek_point(&self) -> Option<SweepPoint> {
        self.heap.peek().map(|e| e.point)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

impl Extend<Event> for EventQueue {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, iter: I) {
        self.heap.extend(iter);
    }
}

/// Set of points with approximate membership.
///
/// Two points within [`EPSILON`] of each other in both components are
/// considered the same point.
#[derive(Debug, Default)]
pub struct PointSet {
    points: BTreeSet<SweepPoint>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stored point approximately equal to `point`, if any.
    ///
    /// Scans one run of equal x-coordinates at a time, seeking straight
    /// to the tolerance band in y within each run.
    pub fn get(&self, point: &SweepPoint) -> Option<SweepPoint> {
        let (y_low, y_high) = (point.y() - EPSILON, point.y() + EPSILON);
        let x_high = point.x() + EPSILON;

        let mut cursor = SweepPoint::bound(point.x() - EPSILON, y_low);
        while let Some(&found) = self.points.range(cursor..).next() {
            if found.x() > x_high {
                break;
            }
            if found.y() < y_low {
                cursor = SweepPoint::bound(found.x(), y_low);
                continue;
            }
            if found.approx_eq(point) {
                return Some(found);
            }
            cursor = SweepPoint::bound(found.x(), f64::INFINITY);
        }
        None
    }

    /// Check if a point approximately equal to `point` is present.
    #[inline]
    pub fn contains(&self, point: &SweepPoint) -> bool {
        self.get(point).is_some()
    }

    /// Insert `point` unless an approximately equal point is already
    /// present. Returns `true` if it was inserted.
    pub fn insert(&mut self, point: SweepPoint) -> bool {
        if self.contains(&point) {
            return false;
        }
        self.points.insert(point)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
