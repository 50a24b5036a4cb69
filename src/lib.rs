#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod error;
pub mod hough;
pub mod params;
pub mod postprocess;
pub mod raster;
pub mod regions;
pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::analysis::{
    extract_regions, extract_regions_with_seed, extract_segments, extract_segments_with_seed,
};
pub use crate::error::Error;
pub use crate::hough::Scoreboard;
pub use crate::params::{parameter_names, UserParameters};
pub use crate::raster::ImageU8;
pub use crate::types::{Point, Region, Segment};

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::raster::ImageU8;
    pub use crate::{extract_regions, extract_segments, UserParameters};
}
