//! Counts the distinct intersection points of a collection of line
//! segments with a plane sweep.
//!
//! This is an implementation of the [Bentley-Ottman] algorithm. A
//! vertical sweep line moves left to right over the plane, stopping at
//! segment end-points and at intersections discovered between segments
//! that are adjacent on the sweep line. Each distinct point where two
//! or more segments meet is counted exactly once, however many
//! segments pass through it.
//!
//! ## Usage
//!
//! Construct [`Segment`]s from their end-points, and pass them to
//! [`count_intersections`]. For finer control over the sweep, drive a
//! [`Sweep`] one event at a time.
//!
//! ```rust
//! use segment_sweep::{count_intersections, Segment};
//! let input = vec![
//!     Segment::from_coords(1., 0., 0., 1.).unwrap(),
//!     Segment::from_coords(0., 0.25, 1., 0.25).unwrap(),
//!     Segment::from_coords(0., 0., 1., 1.).unwrap(),
//! ];
//! // All pairs intersect, at three distinct points
//! assert_eq!(count_intersections(input), 3);
//! ```
//!
//! Segments must not be vertical or degenerate. Touching end-points
//! and collinear overlaps count as intersections; an overlap is
//! counted once, at its leftmost shared end-point.
//!
//! The [`parser`] module reads the plain text test-case format used by
//! the `count-crossings` binary.
//!
//! [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
pub mod kernel;
pub use kernel::{orientation, round_coord, Sign};

mod events;
pub use events::{Event, EventQueue, EventSegments, EventType, PointSet, SweepPoint};

mod segments;
pub use segments::{Segment, SegmentError};

mod active;
pub use active::{ActiveSegment, AdjacentIntersection, LineStatus};

mod sweep;
pub use sweep::{count_intersections, Sweep};

pub mod parser;
pub use parser::{parse_test_cases, read_test_cases, ParseError};

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;
