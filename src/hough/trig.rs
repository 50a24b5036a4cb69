//! Precomputed direction table for the vote sweep.

use std::sync::OnceLock;

use crate::types::Point;

/// Number of angle bins. Must be a power of two; raising it increases both
/// startup cost and accumulator memory.
pub const MAX_THETA: usize = 2048;

static TABLE: OnceLock<Vec<Point>> = OnceLock::new();

/// `(cos, sin)` of `pi * 2i / MAX_THETA` for every angle index.
///
/// The sweep covers the full circle rather than the half-circle a line
/// parameterization needs: the redundant half makes `r < 0` the cheap
/// test for a normal pointing away from the origin.
pub fn table() -> &'static [Point] {
    TABLE.get_or_init(|| {
        let scale = 2.0 * std::f64::consts::PI / MAX_THETA as f64;
        (0..MAX_THETA)
            .map(|i| {
                let angle = scale * i as f64;
                Point::new(angle.cos(), angle.sin())
            })
            .collect()
    })
}
