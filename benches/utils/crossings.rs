#![allow(dead_code)]

use geo::{line_intersection::line_intersection, Line};
use rstar::{RTree, RTreeObject, AABB};
use segment_sweep::{count_intersections, Segment};

struct IndexedLine(Line<f64>, usize);

impl RTreeObject for IndexedLine {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let Line { start, end } = self.0;
        AABB::from_corners([start.x, start.y], [end.x, end.y])
    }
}

pub fn to_segments(lines: &[Line<f64>]) -> Vec<Segment> {
    lines
        .iter()
        .map(|l| Segment::try_from(*l).expect("random lines are not vertical"))
        .collect()
}

pub fn count_sweep(segments: &[Segment]) -> usize {
    count_intersections(segments.iter().copied())
}

pub fn count_brute(lines: &[Line<f64>]) -> usize {
    let mut count = 0;
    for (i, l1) in lines.iter().enumerate() {
        for l2 in lines[i + 1..].iter() {
            if line_intersection(*l1, *l2).is_some() {
                count += 1;
            }
        }
    }
    count
}

pub fn count_rtree(lines: &[Line<f64>]) -> usize {
    let lines: Vec<_> = lines
        .iter()
        .enumerate()
        .map(|(i, l)| IndexedLine(*l, i))
        .collect();

    let tree = RTree::bulk_load(lines);
    tree.intersection_candidates_with_other_tree(&tree)
        .filter_map(|(l1, l2)| {
            if l1.1 >= l2.1 {
                None
            } else {
                line_intersection(l1.0, l2.0)
            }
        })
        .count()
}
