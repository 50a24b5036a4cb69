//! Progressive probabilistic Hough transform.
//!
//! The transform samples above-threshold pixels in random order. Every
//! sample casts one vote per angle bin into the `(rho, theta)` accumulator,
//! and the running peak is tested against a Poisson model of uniform noise;
//! only peaks that are improbable under that model trigger a channel scan.
//! The scan walks the candidate line with a configurable perpendicular
//! radius, claims supporting pixels, and commits the longest contiguous
//! run as a segment. Committed pixels retire and their votes are
//! withdrawn, so the accumulator always reflects the surviving evidence.
//!
//! State lives in four pieces: the [`status::StatusGrid`] pixel lifecycle,
//! the vote accumulator, the process-wide trig table, and the per-scan
//! claim guard. The [`Scoreboard`] owns all of them and is itself the
//! lazy segment iterator.

pub(crate) mod accumulator;
pub(crate) mod point_set;
pub mod status;
pub(crate) mod trig;

mod scoreboard;

pub use scoreboard::Scoreboard;
pub use status::CellStatus;
