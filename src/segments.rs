use std::{cmp::Ordering, error::Error, fmt};

use geo::{Coordinate, Line};

use crate::{
    events::{Event, SweepPoint},
    kernel::{approx_eq, orientation, round_coord, Sign, EPSILON},
};

/// Reasons a pair of points cannot form a sweepable segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentError {
    /// A coordinate is `NaN` or infinite.
    NonFinite,
    /// Both end points are the same point.
    Degenerate { x: f64, y: f64 },
    /// Both end points share an x-coordinate; the sweep has no
    /// well-defined y-value for such a segment.
    Vertical { x: f64 },
}

impl fmt::Display for SegmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentError::NonFinite => write!(f, "segment has a non-finite coordinate"),
            SegmentError::Degenerate { x, y } => {
                write!(f, "segment has zero length at ({}, {})", x, y)
            }
            SegmentError::Vertical { x } => write!(f, "vertical segment at x = {}", x),
        }
    }
}

impl Error for SegmentError {}

/// A non-vertical line segment taking part in the sweep.
///
/// The end points are ordered (see [`SweepPoint`]) so that
/// `start < end`, regardless of the order they were given in.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    start: SweepPoint,
    end: SweepPoint,
    slope: f64,
    visited: Option<SweepPoint>,
}

impl Segment {
    /// Create a segment between two points.
    ///
    /// Fails on non-finite coordinates, on zero-length segments and on
    /// vertical segments.
    pub fn new(p: Coordinate<f64>, q: Coordinate<f64>) -> Result<Self, SegmentError> {
        if !(p.x.is_finite() && p.y.is_finite() && q.x.is_finite() && q.y.is_finite()) {
            return Err(SegmentError::NonFinite);
        }
        let (p, q) = (SweepPoint::from(p), SweepPoint::from(q));
        let (start, end) = match p.cmp(&q) {
            Ordering::Less => (p, q),
            Ordering::Greater => (q, p),
            Ordering::Equal => {
                return Err(SegmentError::Degenerate { x: p.x(), y: p.y() });
            }
        };
        if start.x() == end.x() {
            return Err(SegmentError::Vertical { x: start.x() });
        }

        let slope = round_coord((end.y() - start.y()) / (end.x() - start.x()));
        Ok(Segment {
            start,
            end,
            slope,
            visited: None,
        })
    }

    /// Create a segment from the four coordinates `x1 y1 x2 y2`.
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, SegmentError> {
        Segment::new(Coordinate { x: x1, y: y1 }, Coordinate { x: x2, y: y2 })
    }

    #[inline]
    pub fn start(&self) -> SweepPoint {
        self.start
    }

    #[inline]
    pub fn end(&self) -> SweepPoint {
        self.end
    }

    /// Slope rounded to the kernel precision.
    #[inline]
    pub fn slope(&self) -> f64 {
        self.slope
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.start.y() == self.end.y()
    }

    /// The segment as a geo [`Line`] from `start` to `end`.
    pub fn line(&self) -> Line<f64> {
        Line::new(self.start.coord(), self.end.coord())
    }

    /// The sweep position at which the order of this segment was last
    /// fixed. This is the start point until the segment takes part in
    /// an intersection.
    #[inline]
    pub fn last_visited(&self) -> SweepPoint {
        self.visited.unwrap_or(self.start)
    }

    /// Record that the sweep passed through `point` on this segment.
    ///
    /// This changes the rank of the segment: it must not be called
    /// while the segment is stored in a line status.
    #[inline]
    pub(crate) fn set_last_visited(&mut self, point: SweepPoint) {
        self.visited = Some(point);
    }

    /// The y-value of the segment's line at `x`.
    pub fn y_at(&self, x: f64) -> f64 {
        if self.is_horizontal() {
            return self.start.y();
        }
        let (p, q) = (self.start, self.end);
        p.y() + (q.y() - p.y()) * (x - p.x()) / (q.x() - p.x())
    }

    /// Check that `point` lies between the end points, using the
    /// triangle equality `|s e| = |s p| + |p e|` up to [`EPSILON`].
    pub fn contains_point(&self, point: &SweepPoint) -> bool {
        let through = self.start.distance_from(point) + point.distance_from(&self.end);
        approx_eq(self.start.distance_from(&self.end), through, EPSILON)
    }

    /// Check that the segment passes through `point` within the sweep
    /// tolerance: `point` is collinear under [`orientation`] and inside
    /// the x-range of the segment.
    pub fn passes_through(&self, point: &SweepPoint) -> bool {
        point.x() >= self.start.x() - EPSILON
            && point.x() <= self.end.x() + EPSILON
            && orientation(&self.start, &self.end, point) == Sign::Zero
    }

    /// Check that the sweep has visited this segment at its end point.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.visited.map_or(false, |p| p.approx_eq(&self.end))
    }

    /// Intersect with another segment.
    ///
    /// Returns the crossing point of a proper crossing, or the smallest
    /// end point (in sweep order) of either segment that lies on the
    /// other one when the segments touch or overlap. The result does
    /// not depend on the order of the two segments.
    pub fn intersects_with(&self, other: &Segment) -> Option<SweepPoint> {
        let o1 = orientation(&self.start, &self.end, &other.start);
        let o2 = orientation(&self.start, &self.end, &other.end);
        let o3 = orientation(&other.start, &other.end, &self.start);
        let o4 = orientation(&other.start, &other.end, &self.end);

        let straddles = |a: Sign, b: Sign| a != Sign::Zero && b != Sign::Zero && a != b;
        if straddles(o1, o2) && straddles(o3, o4) {
            return Some(self.crossing_point(other));
        }

        [
            (o1, self, other.start),
            (o2, self, other.end),
            (o3, other, self.start),
            (o4, other, self.end),
        ]
        .iter()
        .filter(|(o, seg, pt)| *o == Sign::Zero && seg.contains_point(pt))
        .map(|&(_, _, pt)| pt)
        .min()
    }

    /// Crossing point of the supporting lines of two properly crossing
    /// segments.
    fn crossing_point(&self, other: &Segment) -> SweepPoint {
        let (p, r) = (self.start, self.end);
        let (q, s) = (other.start, other.end);
        let (rx, ry) = (r.x() - p.x(), r.y() - p.y());
        let (sx, sy) = (s.x() - q.x(), s.y() - q.y());
        let denom = rx * sy - ry * sx;
        debug_assert!(denom != 0., "crossing segments can't be parallel");

        let t = ((q.x() - p.x()) * sy - (q.y() - p.y()) * sx) / denom;
        let x = p.x() + t * rx;
        let y = if self.is_horizontal() {
            p.y()
        } else if other.is_horizontal() {
            q.y()
        } else {
            p.y() + t * ry
        };
        SweepPoint::new(x, y)
    }

    /// Compare the ranks of two active segments.
    ///
    /// Only the part of each segment right of its last visited point
    /// takes part. The segment whose part starts later is placed above
    /// or below the other by [`orientation`]. If it starts on the other
    /// one, the two meet there, and their slopes decide: segments both
    /// visited at that very point are ordered as just right of it
    /// (smaller slope below), others as just left of it (larger slope
    /// below). Returns `Equal` only for collinear segments.
    ///
    /// The parts must overlap in x, as they do for segments active at
    /// the same time.
    pub fn cmp_rank(&self, other: &Segment) -> Ordering {
        if self.last_visited() > other.last_visited() {
            return other.cmp_rank(self).reverse();
        }
        let (p, q) = (self.last_visited(), self.end);
        let above = |sign: Sign| match sign {
            Sign::Positive => Ordering::Less,
            Sign::Negative => Ordering::Greater,
            Sign::Zero => Ordering::Equal,
        };

        match orientation(&p, &q, &other.last_visited()) {
            Sign::Zero => {
                let right_of_meeting = above(orientation(&p, &q, &other.end));
                match (self.visited, other.visited) {
                    (Some(v), Some(w)) if v == w => right_of_meeting,
                    _ => right_of_meeting.reverse(),
                }
            }
            sign => above(sign),
        }
    }

    /// Start and end events of this segment stored at `key`.
    pub(crate) fn events(&self, key: usize) -> [Event; 2] {
        [Event::start(self.start, key), Event::end(self.end, key)]
    }
}

/// Convert from a [`Line`] ensuring end point ordering.
impl TryFrom<Line<f64>> for Segment {
    type Error = SegmentError;

    fn try_from(line: Line<f64>) -> Result<Self, Self::Error> {
        Segment::new(line.start, line.end)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::from_coords(x1, y1, x2, y2).unwrap()
    }

    fn pt(x: f64, y: f64) -> SweepPoint {
        SweepPoint::new(x, y)
    }

    #[test]
    fn test_canonical_end_points() {
        let s = seg(4., 0., 0., 4.);
        assert_eq!(s.start(), pt(0., 4.));
        assert_eq!(s.end(), pt(4., 0.));
        assert_eq!(s.slope(), -1.);
        assert_eq!(s.last_visited(), s.start());

        let third = seg(0., 0., 3., 1.);
        assert_eq!(third.slope(), 0.333333333);
    }

    #[test]
    fn test_rejects_invalid_segments() {
        assert_eq!(
            Segment::from_coords(1., 0., 1., 5.).unwrap_err(),
            SegmentError::Vertical { x: 1. }
        );
        assert_eq!(
            Segment::from_coords(2., 3., 2., 3.).unwrap_err(),
            SegmentError::Degenerate { x: 2., y: 3. }
        );
        assert_eq!(
            Segment::from_coords(f64::NAN, 0., 1., 1.).unwrap_err(),
            SegmentError::NonFinite
        );
        assert_eq!(
            Segment::try_from(Line::from([(0., 0.), (0., 1.)])).unwrap_err(),
            SegmentError::Vertical { x: 0. }
        );
    }

    #[test]
    fn test_y_at() {
        let s = seg(0., 1., 4., 3.);
        assert_relative_eq!(s.y_at(0.), 1.);
        assert_relative_eq!(s.y_at(2.), 2.);
        assert_relative_eq!(s.y_at(4.), 3.);
        assert_eq!(seg(-1., 7., 5., 7.).y_at(3.), 7.);
    }

    #[test]
    fn test_contains_point() {
        let s = seg(0., 0., 4., 4.);
        assert!(s.contains_point(&pt(1., 1.)));
        assert!(s.contains_point(&pt(0.1, 0.1)));
        assert!(s.contains_point(&pt(4., 4.)));
        assert!(!s.contains_point(&pt(5., 5.)));
        assert!(!s.contains_point(&pt(1., 2.)));
        assert!(s.passes_through(&pt(1. / 3., 1. / 3.)));
        assert!(s.passes_through(&pt(2., 2. + 1e-7)));
        assert!(!s.passes_through(&pt(2., 2.1)));
        assert!(!s.passes_through(&pt(5., 5.)));
    }

    #[test]
    fn test_touch_within_tolerance() {
        // The start of `a` is on `c` up to the rounding of the thirds.
        let a = seg(1. / 3., 10. / 3., 1., 5. / 3.);
        let c = seg(0., 4., 2., 0.);
        assert!(c.passes_through(&a.start()));
        assert_eq!(a.intersects_with(&c), Some(a.start()));
        assert_eq!(c.intersects_with(&a), Some(a.start()));
    }

    #[test]
    fn test_proper_crossing() {
        let a = seg(0., 0., 4., 4.);
        let b = seg(0., 4., 4., 0.);
        assert_eq!(a.intersects_with(&b), Some(pt(2., 2.)));
        assert_eq!(b.intersects_with(&a), Some(pt(2., 2.)));

        let h = seg(-1., 1.5, 5., 1.5);
        assert_eq!(a.intersects_with(&h), Some(pt(1.5, 1.5)));
        assert_eq!(h.intersects_with(&a), Some(pt(1.5, 1.5)));

        let c = seg(0., 2., 10., 3.);
        let d = seg(0., 0., 10., 10.);
        let p = c.intersects_with(&d).unwrap();
        assert_relative_eq!(p.x(), 20. / 9., epsilon = 1e-8);
        assert_relative_eq!(p.y(), 20. / 9., epsilon = 1e-8);
        assert_eq!(d.intersects_with(&c), Some(p));
    }

    #[test]
    fn test_touching_and_overlap() {
        // Shared end point.
        let a = seg(0., 0., 2., 2.);
        let b = seg(2., 2., 4., 0.);
        assert_eq!(a.intersects_with(&b), Some(pt(2., 2.)));

        // T-junction.
        let c = seg(0., 0., 4., 0.);
        let d = seg(2., 0., 3., 5.);
        assert_eq!(c.intersects_with(&d), Some(pt(2., 0.)));
        assert_eq!(d.intersects_with(&c), Some(pt(2., 0.)));

        // Collinear overlap yields the leftmost shared end point.
        let e = seg(2., 0., 6., 0.);
        assert_eq!(c.intersects_with(&e), Some(pt(2., 0.)));
        assert_eq!(e.intersects_with(&c), Some(pt(2., 0.)));
    }

    #[test]
    fn test_no_intersection() {
        let a = seg(0., 0., 1., 0.);
        let b = seg(2., 0., 3., 0.);
        assert_eq!(a.intersects_with(&b), None);

        let c = seg(0., 1., 4., 2.);
        let d = seg(0., 0., 4., 1.);
        assert_eq!(c.intersects_with(&d), None);

        let e = seg(0., 0., 1., 1.);
        let f = seg(2., 0., 3., -5.);
        assert_eq!(e.intersects_with(&f), None);
    }

    #[test]
    fn test_rank_by_height() {
        let low = seg(0., 0., 10., 1.);
        let high = seg(2., 5., 8., 4.);
        assert_eq!(low.cmp_rank(&high), Ordering::Less);
        assert_eq!(high.cmp_rank(&low), Ordering::Greater);
    }

    #[test]
    fn test_rank_flips_at_visited_crossing() {
        let mut a = seg(0., 0., 4., 4.);
        let mut b = seg(1., 3., 4., 0.);
        // Before the crossing `a` is below `b`.
        assert_eq!(a.cmp_rank(&b), Ordering::Less);

        let p = a.intersects_with(&b).unwrap();
        assert_eq!(p, pt(2., 2.));
        a.set_last_visited(p);
        b.set_last_visited(p);
        assert_eq!(a.last_visited(), p);
        assert_eq!(a.cmp_rank(&b), Ordering::Greater);
        assert_eq!(b.cmp_rank(&a), Ordering::Less);
    }

    #[test]
    fn test_rank_at_shared_start() {
        // Both start at the same point: ordered as left of it until the
        // intersection there has been visited.
        let mut up = seg(0., 0., 4., 4.);
        let mut down = seg(0., 0., 4., -4.);
        assert_eq!(up.cmp_rank(&down), Ordering::Less);

        let origin = pt(0., 0.);
        up.set_last_visited(origin);
        down.set_last_visited(origin);
        assert_eq!(up.cmp_rank(&down), Ordering::Greater);
    }

    #[test]
    fn test_rank_starting_on_another() {
        let mut a = seg(1. / 3., 10. / 3., 1., 5. / 3.);
        let mut c = seg(0., 4., 2., 0.);
        // `a` leaves `c` downwards, so it is above `c` on the left.
        assert_eq!(a.cmp_rank(&c), Ordering::Greater);
        assert_eq!(c.cmp_rank(&a), Ordering::Less);

        let p = a.start();
        a.set_last_visited(p);
        c.set_last_visited(p);
        assert_eq!(a.cmp_rank(&c), Ordering::Less);
        assert_eq!(c.cmp_rank(&a), Ordering::Greater);

        // A segment entirely above is unaffected by the visit.
        let high = seg(0., 8., 3., 7.);
        assert_eq!(a.cmp_rank(&high), Ordering::Less);
        assert_eq!(high.cmp_rank(&c), Ordering::Greater);
    }

    #[test]
    fn test_exhausted_at_end() {
        let mut s = seg(0., 0., 2., 2.);
        assert!(!s.is_exhausted());
        s.set_last_visited(pt(1., 1.));
        assert!(!s.is_exhausted());
        s.set_last_visited(pt(2., 2.));
        assert!(s.is_exhausted());
    }

    #[test]
    fn test_rank_collinear_is_equal() {
        let a = seg(0., 0., 4., 0.);
        let b = seg(2., 0., 6., 0.);
        assert_eq!(a.cmp_rank(&b), Ordering::Equal);
    }
}
