//! Convex polyline assembly and bounding-box emission.

use std::collections::VecDeque;

use crate::types::{Point, Region, Segment};

use super::corner::{find_corners, Corner};

/// Chain one polyline out of the working corner pool and emit its
/// bounding box.
///
/// Corners glue through their originating segments: a corner extends the
/// chain's front when its second segment is the front's first, and the
/// back symmetrically. The chain is closed (a convex polygon) when the
/// outermost segments meet; open chains additionally contribute their
/// dangling far endpoints to the box. A corner that chains with nothing
/// is dropped without emitting.
fn find_next_region(corners: &mut Vec<Corner>) -> Option<Region> {
    let mut polyline: VecDeque<Corner> = VecDeque::new();
    polyline.push_back(corners.pop()?);

    // Grow the front, rescanning after every move.
    let mut i = 0;
    while i < corners.len() {
        if corners[i].s2 == polyline.front().map(|c| c.s1)? {
            let corner = corners.swap_remove(i);
            polyline.push_front(corner);
            i = 0;
        } else {
            i += 1;
        }
    }

    // Then the back.
    let mut i = 0;
    while i < corners.len() {
        if corners[i].s1 == polyline.back().map(|c| c.s2)? {
            let corner = corners.swap_remove(i);
            polyline.push_back(corner);
            i = 0;
        } else {
            i += 1;
        }
    }

    if polyline.len() == 1 {
        return None;
    }

    let front = polyline.front()?;
    let back = polyline.back()?;
    let is_open = front.s1 != back.s2;

    let (mut min, mut max) = if is_open {
        (front.a, front.a)
    } else {
        (
            Point::new(f64::INFINITY, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        )
    };

    for corner in &polyline {
        min = min.inf(&corner.b);
        max = max.sup(&corner.b);
    }
    if is_open {
        min = min.inf(&back.c);
        max = max.sup(&back.c);
    }

    Some(Region::from_bounds(min, max))
}

/// Group fused segments into convex polylines and return one bounding box
/// per polyline. The result is unsorted; see
/// [`super::sort_reading_order`].
pub fn find_regions(segments: &[Segment], max_gap: f64) -> Vec<Region> {
    let mut corners = find_corners(segments, max_gap);
    let mut regions = Vec::new();
    while !corners.is_empty() {
        if let Some(region) = find_next_region(&mut corners) {
            regions.push(region);
        }
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle_segments() -> Vec<Segment> {
        vec![
            Segment::new(10.0, 10.0, 50.0, 10.0),
            Segment::new(50.0, 10.0, 50.0, 40.0),
            Segment::new(50.0, 40.0, 10.0, 40.0),
            Segment::new(10.0, 40.0, 10.0, 10.0),
        ]
    }

    #[test]
    fn rectangle_yields_one_closed_region() {
        let regions = find_regions(&rectangle_segments(), 2.0);
        assert_eq!(regions.len(), 1);
        let r = regions[0];
        assert!((r.x - 10.0).abs() < 1e-9);
        assert!((r.y - 10.0).abs() < 1e-9);
        assert!((r.w - 40.0).abs() < 1e-9);
        assert!((r.h - 30.0).abs() < 1e-9);
    }

    #[test]
    fn region_contains_every_corner_point() {
        let segments = rectangle_segments();
        let corners = find_corners(&segments, 2.0);
        let regions = find_regions(&segments, 2.0);
        assert_eq!(regions.len(), 1);
        for corner in &corners {
            assert!(regions[0].contains(corner.b));
        }
    }

    #[test]
    fn open_polyline_includes_dangling_endpoints() {
        // A U shape: three sides of the rectangle, top missing.
        let segments = vec![
            Segment::new(10.0, 10.0, 10.0, 40.0),
            Segment::new(10.0, 40.0, 50.0, 40.0),
            Segment::new(50.0, 40.0, 50.0, 10.0),
        ];
        let regions = find_regions(&segments, 2.0);
        assert_eq!(regions.len(), 1);
        let r = regions[0];
        // The dangling tips at y=10 stretch the box beyond the two corners.
        assert!((r.x - 10.0).abs() < 1e-9);
        assert!((r.y - 10.0).abs() < 1e-9);
        assert!((r.w - 40.0).abs() < 1e-9);
        assert!((r.h - 30.0).abs() < 1e-9);
    }

    #[test]
    fn lone_corner_emits_nothing() {
        let segments = vec![
            Segment::new(1.0, 0.0, 10.0, 0.0),
            Segment::new(0.0, 1.0, 0.0, 10.0),
        ];
        assert!(find_regions(&segments, 2.0).is_empty());
    }

    #[test]
    fn two_separate_rectangles_produce_two_regions() {
        let mut segments = rectangle_segments();
        segments.extend(
            rectangle_segments()
                .iter()
                .map(|s| Segment::new(s.a.x + 100.0, s.a.y, s.b.x + 100.0, s.b.y)),
        );
        let mut regions = find_regions(&segments, 2.0);
        regions.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert_eq!(regions.len(), 2);
        assert!((regions[0].x - 10.0).abs() < 1e-9);
        assert!((regions[1].x - 110.0).abs() < 1e-9);
    }

    #[test]
    fn no_segments_no_regions() {
        assert!(find_regions(&[], 10.0).is_empty());
        assert!(find_regions(&[Segment::new(0.0, 0.0, 10.0, 0.0)], 10.0).is_empty());
    }
}
