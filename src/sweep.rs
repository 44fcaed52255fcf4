use log::{debug, trace};
use slab::Slab;
use smallvec::SmallVec;

use crate::{
    active::LineStatus,
    events::{Event, EventQueue, EventSegments, EventType, PointSet, SweepPoint},
    kernel::EPSILON,
    segments::Segment,
};

/// Segments meeting at one intersection point.
type Bundle = SmallVec<[usize; 4]>;

/// Sweep algorithm for counting intersection points.
///
/// This implements the [Bentley-Ottman] sweep. Maintains a heap of
/// end-points and intersections, and the currently active segments.
/// Each distinct intersection point is counted once, however many
/// segments pass through it.
///
/// The sweep can be driven one event at a time with
/// [`Sweep::step`], or to completion with [`Sweep::run`].
///
/// [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
#[derive(Debug)]
pub struct Sweep {
    segments: Slab<Segment>,
    events: EventQueue,
    status: LineStatus,
    seen: PointSet,
    swept: PointSet,
    position: Option<SweepPoint>,
    count: usize,
}

impl FromIterator<Segment> for Sweep {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        Sweep::new(iter)
    }
}

impl Sweep {
    /// Create a sweep over `segments`, scheduling two events per
    /// segment.
    pub fn new<I: IntoIterator<Item = Segment>>(segments: I) -> Self {
        let iter = segments.into_iter();
        let size = {
            let (min_size, max_size) = iter.size_hint();
            max_size.unwrap_or(min_size)
        };

        let mut sweep = Sweep {
            segments: Slab::with_capacity(size),
            events: EventQueue::with_capacity(2 * size),
            status: LineStatus::new(),
            seen: PointSet::new(),
            swept: PointSet::new(),
            position: None,
            count: 0,
        };
        for segment in iter {
            sweep.create_segment(segment);
        }
        trace!("created sweep over {} segments", sweep.segments.len());

        sweep
    }

    /// Store a segment, and add its events into the heap.
    fn create_segment(&mut self, segment: Segment) -> usize {
        let entry = self.segments.vacant_entry();
        let key = entry.key();
        self.events.extend(segment.events(key));
        entry.insert(segment);
        key
    }

    /// Number of distinct intersection points found so far.
    #[inline]
    pub fn result(&self) -> usize {
        self.count
    }

    /// Check if every event has been processed.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of segments currently crossed by the sweep line.
    #[inline]
    pub fn active_len(&self) -> usize {
        self.status.len()
    }

    /// Peek and return the next point in the sweep.
    #[inline]
    pub fn peek_point(&self) -> Option<SweepPoint> {
        self.events.peek_point()
    }

    /// Process the next event in the heap and return its point.
    ///
    /// Returns `None` once the sweep is done. The sweep may be
    /// abandoned between any two steps.
    pub fn step(&mut self) -> Option<SweepPoint> {
        self.events.pop().map(|event| {
            let pt = event.point;
            self.handle_event(event);

            pt
        })
    }

    /// Process all remaining events.
    pub fn run(mut self) -> Self {
        while self.step().is_some() {}
        debug!(
            "sweep done: {} intersection points, {} scheduled",
            self.count,
            self.seen.len()
        );
        self
    }

    /// Schedule an intersection event at `point` unless that point was
    /// already scheduled.
    ///
    /// Returns `true` if an event was pushed.
    pub(crate) fn schedule_intersection(&mut self, point: SweepPoint, upper: usize, lower: usize) -> bool {
        if let Some(pos) = self.position {
            if point.x() < pos.x() - EPSILON {
                debug!(
                    "ignoring intersection {:?} of {} and {} behind the sweep at {:?}",
                    point, upper, lower, pos
                );
                return false;
            }
        }
        if !self.seen.insert(point) {
            trace!("intersection {:?} already scheduled", point);
            return false;
        }
        debug!("scheduling intersection {:?} of {} and {}", point, upper, lower);
        self.events.push_intersection(point, upper, lower);
        true
    }

    /// Schedule the intersections of the segment at `key` with its
    /// neighbors.
    fn schedule_adjacent(&mut self, key: usize) {
        let segment = self.segments[key];
        for adj in self.status.adj_intersections(key, &segment) {
            if let Some(point) = adj.point {
                self.schedule_intersection(point, adj.upper, adj.lower);
            }
        }
    }

    /// Collect the active segments passing through `point`, starting
    /// from the segments of an intersection event. These are contiguous
    /// in the line status; each run is returned bottom to top.
    fn bundle_through(&self, point: &SweepPoint, upper: usize, lower: usize) -> Bundle {
        let mut bundle = Bundle::new();
        for &key in [upper, lower].iter() {
            if bundle.contains(&key) || !self.status.contains(key, &self.segments[key]) {
                continue;
            }
            let mut run = Bundle::new();
            run.push(key);

            let mut below = key;
            while let Some(adj) = self.status.prev(below, &self.segments[below]) {
                below = adj.key();
                if !adj.segment().passes_through(point)
                    || run.contains(&below)
                    || bundle.contains(&below)
                {
                    break;
                }
                run.insert(0, below);
            }
            let mut above = key;
            while let Some(adj) = self.status.next(above, &self.segments[above]) {
                above = adj.key();
                if !adj.segment().passes_through(point)
                    || run.contains(&above)
                    || bundle.contains(&above)
                {
                    break;
                }
                run.push(above);
            }
            bundle.extend(run);
        }
        bundle
    }

    /// Schedule the intersection of two segments that just became
    /// adjacent.
    fn schedule_pair(&mut self, below: Option<usize>, above: Option<usize>) {
        if let (Some(lower), Some(upper)) = (below, above) {
            if let Some(point) = self.segments[upper].intersects_with(&self.segments[lower]) {
                self.schedule_intersection(point, upper, lower);
            }
        }
    }

    /// Handle one event.
    fn handle_event(&mut self, event: Event) {
        trace!("handling event: {:?}", event);
        self.position = Some(event.point);

        match (event.ty, event.segments) {
            (EventType::StartPoint, EventSegments::One(key)) => {
                let segment = &mut self.segments[key];
                // Starting on an intersection point that was already
                // handled: order it as the segments leaving that point.
                if let Some(point) = self.swept.get(&segment.start()) {
                    segment.set_last_visited(point);
                    if segment.is_exhausted() {
                        return;
                    }
                }
                self.status.insert(key, *segment);
                self.schedule_adjacent(key);
            }
            (EventType::EndPoint, EventSegments::One(key)) => {
                let segment = self.segments[key];
                if segment.is_exhausted() {
                    trace!("segment {} already left at an intersection", key);
                    return;
                }
                let (below, above) = self.status.neighbors(key, &segment);
                let removed = self.status.remove(key, &segment);
                debug_assert!(removed, "ended segment {} was not active", key);

                // The neighbors become adjacent.
                self.schedule_pair(below, above);
            }
            (EventType::Intersection, EventSegments::Two { upper, lower }) => {
                self.count += 1;
                let point = event.point;
                self.swept.insert(point);

                let bundle = self.bundle_through(&point, upper, lower);
                debug!("intersection {:?} through segments {:?}", point, bundle);
                let (first, last) = match (bundle.first(), bundle.last()) {
                    (Some(&first), Some(&last)) => (first, last),
                    _ => return,
                };
                let below = self
                    .status
                    .prev(first, &self.segments[first])
                    .map(|adj| adj.key())
                    .filter(|key| !bundle.contains(key));
                let above = self
                    .status
                    .next(last, &self.segments[last])
                    .map(|adj| adj.key())
                    .filter(|key| !bundle.contains(key));

                // The rank depends on the last visited point: take every
                // segment out before updating any of them. Segments
                // ending here are not put back.
                for &key in bundle.iter() {
                    let removed = self.status.remove(key, &self.segments[key]);
                    debug_assert!(removed, "crossing segment {} was not active", key);
                }
                let mut continuing = Bundle::new();
                for &key in bundle.iter() {
                    let segment = &mut self.segments[key];
                    segment.set_last_visited(point);
                    if !segment.is_exhausted() {
                        self.status.insert(key, *segment);
                        continuing.push(key);
                    }
                }

                if continuing.is_empty() {
                    self.schedule_pair(below, above);
                }
                for &key in continuing.iter() {
                    self.schedule_adjacent(key);
                }
            }
            _ => unreachable!("malformed event: {:?}", event),
        }
    }
}

/// Count the distinct intersection points of `segments`.
pub fn count_intersections<I: IntoIterator<Item = Segment>>(segments: I) -> usize {
    Sweep::new(segments).run().result()
}
