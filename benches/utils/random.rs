#![allow(dead_code)]

use geo::{Coordinate, Line, Rect};

use rand::Rng;
use rand_distr::Standard;

#[inline]
pub fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let coords: [f64; 2] = rng.sample(Standard);
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * coords[0],
        y: bounds.min().y + dims.y * coords[1],
    }
}

/// A random line inside `bounds` whose end points are at least
/// `min_dx` apart horizontally.
pub fn non_vertical_line<R: Rng>(rng: &mut R, bounds: Rect<f64>, min_dx: f64) -> Line<f64> {
    loop {
        let line = Line::new(uniform_point(rng, bounds), uniform_point(rng, bounds));
        if (line.end.x - line.start.x).abs() >= min_dx {
            return line;
        }
    }
}

/// `count` random non-vertical lines in the square `[0, size]^2`.
pub fn non_vertical_lines<R: Rng>(rng: &mut R, count: usize, size: f64) -> Vec<Line<f64>> {
    let bounds = Rect::new([0., 0.], [size, size]);
    (0..count)
        .map(|_| non_vertical_line(rng, bounds, size / 100.))
        .collect()
}

/// `count` random lines of the given horizontal extent in the square
/// `[0, size]^2`. Short lines have far fewer crossings.
pub fn short_lines<R: Rng>(rng: &mut R, count: usize, size: f64, length: f64) -> Vec<Line<f64>> {
    let bounds = Rect::new([0., 0.], [size - length, size]);
    (0..count)
        .map(|_| {
            let start = uniform_point(rng, bounds);
            let rise: f64 = rng.sample::<f64, _>(Standard) * 2. - 1.;
            Line::new(
                start,
                start
                    + Coordinate {
                        x: length,
                        y: rise * length,
                    },
            )
        })
        .collect()
}
