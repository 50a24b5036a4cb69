//! Fusion of collinear segments emitted by the scoreboard.
//!
//! The transform tends to report one ruling as several fragments: runs
//! split by scratches or dropped ink, and parallel strips a pixel or two
//! apart where the stroke is thicker than the scan channel. Fusion merges
//! a fragment into a base segment when the fragment lies inside the base's
//! channel and their projections onto the base overlap, or nearly touch
//! within the caller's gap tolerance.

use log::trace;

use crate::types::{rot90, Point, Segment};

/// Perpendicular reach of the fusion channel in pixels. Fixed and wider
/// than the default scan channel so strips produced by thick strokes
/// (which sit up to two pixels apart) still merge.
const CHANNEL_WIDTH: f64 = 5.0;
const CHANNEL_RADIUS: f64 = (CHANNEL_WIDTH - 1.0) / 2.0;

/// Unit normal and offset of the line supporting `s`.
fn channel_of(s: &Segment) -> (Point, f64) {
    let n = rot90(s.direction()).normalize();
    (n, n.dot(&s.a))
}

/// Both endpoints of `t` within the channel `[r - radius, r + radius]`.
fn in_channel(t: &Segment, n: &Point, r: f64) -> bool {
    let lo = r - CHANNEL_RADIUS;
    let hi = r + CHANNEL_RADIUS;

    let r1 = n.dot(&t.a);
    if r1 < lo || r1 > hi {
        return false;
    }
    let r2 = n.dot(&t.b);
    if r2 < lo || r2 > hi {
        return false;
    }
    true
}

/// Absorb `t` into `s` when their projections onto `s` overlap or sit
/// within `max_gap` pixels of touching. On success `s` is extended to
/// cover both; rejection leaves `s` untouched.
fn fuse(s: &mut Segment, t: &Segment, max_gap: f64) -> bool {
    let v = s.direction();
    let vv = v.dot(&v);
    if vv == 0.0 {
        return false;
    }

    // Relative positions of t's endpoints along s: 0 at s.a, 1 at s.b.
    let mut z0 = v.dot(&(t.a - s.a)) / vv;
    let mut z1 = v.dot(&(t.b - s.a)) / vv;
    if z0 > z1 {
        std::mem::swap(&mut z0, &mut z1);
    }

    let slack = max_gap / vv.sqrt();
    if z1 < -slack || z0 > 1.0 + slack {
        return false;
    }

    let origin = s.a;
    let z_lo = z0.min(0.0);
    let z_hi = z1.max(1.0);
    s.a = origin + v * z_lo;
    s.b = origin + v * z_hi;
    true
}

/// Repeatedly fuse segment pairs until a full pass makes no change.
///
/// Absorbed segments are removed with a swap from the tail; each fusion
/// restarts the scan, and convergence follows because every fusion
/// shrinks the collection by one.
pub fn fuse_segments(segments: &mut Vec<Segment>, max_gap: f64) {
    let before = segments.len();
    let mut changed = true;
    while changed {
        changed = false;
        'scan: for i in 0..segments.len() {
            let (n, r) = channel_of(&segments[i]);
            for j in 0..segments.len() {
                if j == i {
                    continue;
                }
                let t = segments[j];
                if !in_channel(&t, &n, r) {
                    continue;
                }
                let mut s = segments[i];
                if fuse(&mut s, &t, max_gap) {
                    segments[i] = s;
                    segments.swap_remove(j);
                    changed = true;
                    break 'scan;
                }
            }
        }
    }
    if segments.len() != before {
        trace!("fused {} segments into {}", before, segments.len());
    }
}
