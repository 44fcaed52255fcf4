//! Fixed-precision geometric predicates.
//!
//! All values that take part in equality or set-membership tests
//! (coordinates, slopes, determinants) pass through [`round_coord`],
//! and every approximate comparison uses the single tolerance
//! [`EPSILON`].
use std::cmp::Ordering;

use crate::events::SweepPoint;

/// Number of decimal places kept by [`round_coord`].
pub const PRECISION: i32 = 9;

/// Absolute tolerance of the sweep, as a distance in the plane.
///
/// Points closer than this in both coordinates are the same point, and
/// a point closer than this to a line lies on it.
pub const EPSILON: f64 = 1e-6;

/// Round `value` to [`PRECISION`] decimal places.
///
/// Negative zero is normalized to positive zero so that rounded values
/// compare consistently under `f64::total_cmp`.
#[inline]
pub fn round_coord(value: f64) -> f64 {
    let scale = 10f64.powi(PRECISION);
    (value * scale).round() / scale + 0.
}

/// Check that `a` and `b` are within `tolerance` of each other.
#[inline]
pub(crate) fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Sign of a rounded determinant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    /// Sign of `value`; `NaN` is treated as zero.
    pub fn of(value: f64) -> Sign {
        if value > 0. {
            Sign::Positive
        } else if value < 0. {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    /// Integer value of the sign, used for the total order.
    #[inline]
    pub fn signum(self) -> i8 {
        match self {
            Sign::Negative => -1,
            Sign::Zero => 0,
            Sign::Positive => 1,
        }
    }

    /// Total order `Negative < Zero < Positive`.
    #[inline]
    pub fn total_cmp(self, other: Sign) -> Ordering {
        self.signum().cmp(&other.signum())
    }

    #[inline]
    pub fn reverse(self) -> Sign {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
            Sign::Positive => Sign::Negative,
        }
    }
}

/// Orientation of the ordered triangle `(p1, p2, p3)`.
///
/// Computes twice the signed area and rounds it before taking the
/// sign. `Positive` is a left (counter-clockwise) turn, `Negative` a
/// right turn and `Zero` means the points are collinear: the area is
/// within [`EPSILON`] times the longest side, so one point is within
/// [`EPSILON`] of the line through the other two.
pub fn orientation(p1: &SweepPoint, p2: &SweepPoint, p3: &SweepPoint) -> Sign {
    let det = round_coord(
        (p2.x() - p1.x()) * (p3.y() - p1.y()) - (p2.y() - p1.y()) * (p3.x() - p1.x()),
    );
    let longest = p1
        .distance_from(p2)
        .max(p2.distance_from(p3))
        .max(p3.distance_from(p1));
    if det.abs() <= EPSILON * longest {
        Sign::Zero
    } else {
        Sign::of(det)
    }
}
