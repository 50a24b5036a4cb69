//! High-level extraction entry points.

use log::debug;
use rand::RngCore;

use crate::error::Error;
use crate::hough::Scoreboard;
use crate::params::UserParameters;
use crate::postprocess::fuse_segments;
use crate::raster::ImageU8;
use crate::regions::{find_regions, sort_reading_order};
use crate::types::{Region, Segment};

/// Find line segments in a grayscale raster: drain the Hough scoreboard,
/// then fuse collinear fragments.
pub fn extract_segments(image: ImageU8<'_>, params: &UserParameters) -> Result<Vec<Segment>, Error> {
    extract_segments_with_seed(image, params, rand::thread_rng().next_u64())
}

/// [`extract_segments`] with a fixed RNG seed; identical input and seed
/// reproduce the exact output sequence.
pub fn extract_segments_with_seed(
    image: ImageU8<'_>,
    params: &UserParameters,
    seed: u64,
) -> Result<Vec<Segment>, Error> {
    let scoreboard = Scoreboard::with_seed(image, params, seed)?;
    let mut segments: Vec<Segment> = scoreboard.collect();
    debug!("scoreboard emitted {} segments", segments.len());

    fuse_segments(&mut segments, f64::from(params.max_gap.max(0)));
    Ok(segments)
}

/// Find convex polygonal regions: extract segments, group them into
/// polylines, and return the bounding boxes in reading order.
pub fn extract_regions(image: ImageU8<'_>, params: &UserParameters) -> Result<Vec<Region>, Error> {
    extract_regions_with_seed(image, params, rand::thread_rng().next_u64())
}

/// [`extract_regions`] with a fixed RNG seed.
pub fn extract_regions_with_seed(
    image: ImageU8<'_>,
    params: &UserParameters,
    seed: u64,
) -> Result<Vec<Region>, Error> {
    let segments = extract_segments_with_seed(image, params, seed)?;

    let mut regions = find_regions(&segments, f64::from(params.max_gap.max(0)));
    sort_reading_order(&mut regions);
    debug!("{} segments grouped into {} regions", segments.len(), regions.len());
    Ok(regions)
}
