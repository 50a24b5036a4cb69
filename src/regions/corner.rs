//! Near-intersections between segment pairs.

use log::warn;

use crate::types::{Point, Segment};

/// A near-intersection of two segments, oriented so that walking
/// `a -> b -> c` turns consistently; `b` is the intersection of the
/// supporting lines, `a` and `c` the far endpoints of the originating
/// segments. Segments are referenced by index into the caller's slice.
#[derive(Clone, Debug)]
pub(crate) struct Corner {
    pub s1: usize,
    pub s2: usize,
    pub a: Point,
    pub b: Point,
    pub c: Point,
}

/// Intersection of the supporting lines of two segments.
///
/// Parallel or coincident lines yield infinite coordinates; callers never
/// test for that case directly because an infinite point fails every
/// distance gate downstream.
pub(crate) fn intersection(s1: &Segment, s2: &Segment) -> Point {
    let t = s1.direction();
    let u = s2.direction();

    let denom = t.perp(&u);
    if denom == 0.0 {
        return Point::new(f64::INFINITY, f64::INFINITY);
    }

    // Cramer's rule on the two line equations.
    let pa = t.perp(&s1.a);
    let qc = u.perp(&s2.a);
    (u * pa - t * qc) / denom
}

/// Endpoint of `s` farther from `p`.
fn farthest(p: Point, s: &Segment) -> Point {
    if (p - s.a).norm_squared() > (p - s.b).norm_squared() {
        s.a
    } else {
        s.b
    }
}

/// Distance from `p` to the nearer endpoint of `s`, squared.
fn near_distance_squared(p: Point, s: &Segment) -> f64 {
    (p - s.a).norm_squared().min((p - s.b).norm_squared())
}

/// Collect a corner for every unordered segment pair whose supporting
/// lines intersect within `max_gap` of both segments' near endpoints.
///
/// The pair is ordered by the sign of the turn at the intersection, so a
/// chain of corners built on shared segments is convex by construction.
pub(crate) fn find_corners(segments: &[Segment], max_gap: f64) -> Vec<Corner> {
    let max_gap_squared = max_gap * max_gap;
    let mut corners = Vec::new();

    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let p = intersection(&segments[i], &segments[j]);

            if near_distance_squared(p, &segments[i]) > max_gap_squared {
                continue;
            }
            if near_distance_squared(p, &segments[j]) > max_gap_squared {
                continue;
            }

            let a = farthest(p, &segments[i]);
            let c = farthest(p, &segments[j]);

            let sine = (c - p).perp(&(a - p));
            let (s1, s2, a, c) = if sine > 0.0 {
                (i, j, a, c)
            } else {
                (j, i, c, a)
            };
            if sine == 0.0 {
                warn!("degenerate corner orientation at ({:.1}, {:.1})", p.x, p.y);
            }
            corners.push(Corner { s1, s2, a, b: p, c });
        }
    }

    corners
}
