//! From fused segments to reading-ordered boxes.
//!
//! Segment pairs whose supporting lines nearly meet become oriented
//! corners; corners chain into convex polylines through their shared
//! segments; each polyline collapses to its axis-aligned bounding box;
//! and the boxes are finally arranged the way a reader scans a page.

mod assemble;
mod corner;
mod order;

pub use assemble::find_regions;
pub use order::sort_reading_order;
