//! Progressive probabilistic Hough transform driver.

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Error;
use crate::params::UserParameters;
use crate::raster::ImageU8;
use crate::types::{rot90, Point, Segment};

use super::accumulator::Accumulator;
use super::point_set::ChannelClaims;
use super::status::{CellStatus, StatusGrid};
use super::trig;

/// Log-probability of observing `n` votes in one cell under the Poisson
/// noise model with per-cell mean `lambda`:
/// `ln p = n*ln(lambda) - ln((n)!) - lambda`.
///
/// `lgamma` keeps the factorial term stable for large counts.
#[inline]
pub(crate) fn ln_poisson_pmf(n: u16, lambda: f64) -> f64 {
    f64::from(n) * lambda.ln() - libm::lgamma(f64::from(n) + 1.0) - lambda
}

/// Parametric range `[z_lo, z_hi]` over which `p0 + z*delta` stays inside
/// the rectangle `[0, width] x [0, height]`.
///
/// Each rectangle edge contributes one axis intercept; intercepts falling
/// outside the rectangle (or at infinity, for a channel parallel to an
/// edge) are ignored. The surviving range is floored/ceiled outward so the
/// walk covers whole steps; positions pushed past the border are caught by
/// the claim bounds check. An empty intersection yields
/// `(+inf, -inf)`, which no walk iterates.
pub(crate) fn find_range(width: usize, height: usize, p0: Point, delta: Point) -> (f64, f64) {
    let (w, h) = (width as f64, height as f64);
    let intercepts = [
        (0.0 - p0.x) / delta.x,
        (0.0 - p0.y) / delta.y,
        (w - p0.x) / delta.x,
        (h - p0.y) / delta.y,
    ];

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for z in intercepts {
        if !z.is_finite() {
            continue;
        }
        let p = p0 + delta * z;
        if p.x >= 0.0 && p.x <= w && p.y >= 0.0 && p.y <= h {
            lo = lo.min(z);
            hi = hi.max(z);
        }
    }

    (lo.floor(), hi.ceil())
}

/// Randomized Hough voting engine with a Poisson-noise acceptance test.
///
/// Construction classifies every raster pixel; afterwards the raster is no
/// longer needed. The scoreboard is itself the lazy segment sequence:
/// iterate it to drain segments, drop it at any point to stop. The
/// sequence is finite and not restartable; draining it consumes the
/// pending queue and retires the pixels of every emitted segment.
pub struct Scoreboard {
    status: StatusGrid,
    accumulator: Accumulator,
    queue: Vec<(u16, u16)>,
    rng: StdRng,
    /// Sampled pixels whose votes are currently counted.
    voted: u64,
    threshold_lnp: f64,
    min_length_squared: f64,
    max_gap: i64,
    channel_radius: i64,
}

impl Scoreboard {
    /// Build with an entropy-seeded generator.
    pub fn new(image: ImageU8<'_>, params: &UserParameters) -> Result<Self, Error> {
        Self::build(image, params, StdRng::from_entropy())
    }

    /// Build with a fixed seed for reproducible extraction.
    pub fn with_seed(image: ImageU8<'_>, params: &UserParameters, seed: u64) -> Result<Self, Error> {
        Self::build(image, params, StdRng::seed_from_u64(seed))
    }

    fn build(image: ImageU8<'_>, params: &UserParameters, rng: StdRng) -> Result<Self, Error> {
        const MAX_DIM: usize = u16::MAX as usize;
        if image.w > MAX_DIM || image.h > MAX_DIM {
            return Err(Error::InvalidImageFormat {
                width: image.w,
                height: image.h,
            });
        }

        let diagonal = (image.w as f64).hypot(image.h as f64).ceil();
        let (status, queue) = StatusGrid::from_image(&image);
        debug!(
            "scoreboard over {}x{} raster: {} pending pixels",
            image.w,
            image.h,
            queue.len()
        );

        Ok(Self {
            status,
            accumulator: Accumulator::new(diagonal),
            queue,
            rng,
            voted: 0,
            threshold_lnp: params.threshold_lnp(),
            min_length_squared: params.min_length_squared(),
            max_gap: params.max_gap(),
            channel_radius: params.channel_radius(),
        })
    }

    /// Cast the full vote sweep for a sampled point and test the resulting
    /// peak against the noise model. Returns the `(theta, rho)` of one
    /// uniformly chosen tied peak when the null hypothesis is rejected.
    fn vote(&mut self, x: f64, y: f64) -> Option<(usize, usize)> {
        let point = Point::new(x, y);
        let mut peaks: Vec<(u16, u16)> = Vec::new();
        let mut n: u16 = 0;

        for (theta, cs) in trig::table().iter().enumerate() {
            let r = point.dot(cs);
            if r < 0.0 {
                continue;
            }
            let Some(rho) = self.accumulator.bin_for(r) else {
                continue;
            };
            let count = self.accumulator.increment(rho, theta);
            if n < count {
                peaks.clear();
                n = count;
            }
            if n == count {
                peaks.push((theta as u16, rho as u16));
            }
        }

        self.voted += 1;

        if peaks.is_empty() {
            return None;
        }

        // Each vote lands on one cell per theta column, so under the null
        // hypothesis of uniform noise every cell's expected count is the
        // voter total over the number of rho rows.
        let lambda = self.voted as f64 / self.accumulator.rho_bins() as f64;
        let lnp = ln_poisson_pmf(n, lambda);
        if lnp >= self.threshold_lnp {
            return None;
        }

        let (theta, rho) = peaks[self.rng.gen_range(0..peaks.len())];
        Some((theta as usize, rho as usize))
    }

    /// Withdraw a retired pixel's sweep, mirroring [`Self::vote`] cell by
    /// cell so later peaks are not biased by consumed evidence.
    fn unvote(&mut self, x: f64, y: f64) {
        let point = Point::new(x, y);
        for (theta, cs) in trig::table().iter().enumerate() {
            let r = point.dot(cs);
            if r < 0.0 {
                continue;
            }
            let Some(rho) = self.accumulator.bin_for(r) else {
                continue;
            };
            self.accumulator.decrement(rho, theta);
        }
        self.voted -= 1;
    }

    /// Walk the channel of the line `(theta, rho)` across the raster,
    /// claiming supporting pixels, and commit the longest run found.
    ///
    /// Returns the committed segment and the claimed points whose votes
    /// must be withdrawn; `None` when the channel held no pixels at all.
    fn scan_channel(&mut self, theta: usize, rho: f64) -> Option<(Segment, Vec<(u16, u16)>)> {
        let normal = trig::table()[theta];
        let p0 = normal * rho;
        // Step vector along the line, scaled so each step advances one
        // pixel on the dominant axis.
        let delta = rot90(normal) / normal.amax();

        let (z_lo, z_hi) = find_range(self.status.width(), self.status.height(), p0, delta);
        trace!("channel scan theta={theta} rho={rho:.2} z=[{z_lo}, {z_hi}]");

        let offsets: Vec<Point> = (-self.channel_radius..=self.channel_radius)
            .map(|c| normal * c as f64)
            .collect();

        let mut claims = ChannelClaims::new(&mut self.status);
        let mut gap: i64 = 0;

        let mut z = z_lo;
        while z <= z_hi {
            let p = p0 + delta * z;

            let mut hit = false;
            for q in &offsets {
                let r = p + q;
                if claims.add(r.x.round() as i64, r.y.round() as i64) {
                    hit = true;
                }
            }

            if hit {
                claims.extend(p.x, p.y);
                gap = 0;
            } else {
                gap += 1;
                if gap >= self.max_gap && !claims.current_is_empty() {
                    claims.finish_run();
                }
            }

            z += 1.0;
        }

        claims.commit_longest()
    }

    /// Advance the transform until a segment of acceptable length is found
    /// or the pending queue is exhausted.
    fn next_segment(&mut self) -> Option<Segment> {
        while !self.queue.is_empty() {
            let pick = self.rng.gen_range(0..self.queue.len());
            let (x, y) = self.queue.swap_remove(pick);

            if self.status.get(x as usize, y as usize) != CellStatus::Pending {
                continue;
            }
            self.status.set(x as usize, y as usize, CellStatus::Voted);

            let Some((theta, rho_bin)) = self.vote(f64::from(x), f64::from(y)) else {
                continue;
            };
            let rho = rho_bin as f64 / self.accumulator.rho_scale();

            let Some((segment, committed)) = self.scan_channel(theta, rho) else {
                continue;
            };
            for &(px, py) in &committed {
                self.unvote(f64::from(px), f64::from(py));
            }

            if segment.length_squared() >= self.min_length_squared {
                debug!(
                    "emit segment ({:.1}, {:.1})-({:.1}, {:.1})",
                    segment.a.x, segment.a.y, segment.b.x, segment.b.y
                );
                return Some(segment);
            }
        }
        None
    }

    #[cfg(test)]
    pub(crate) fn status(&self) -> &StatusGrid {
        &self.status
    }

    #[cfg(test)]
    pub(crate) fn counted_votes(&self) -> (u64, u64) {
        (self.voted, self.accumulator.total())
    }
}

impl Iterator for Scoreboard {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        self.next_segment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> UserParameters {
        UserParameters {
            sensitivity: 5,
            max_gap: 2,
            min_segment_length: 10,
            channel_width: 3,
        }
    }

    #[test]
    fn oversized_raster_is_rejected() {
        let data = vec![0u8; 4];
        let img = ImageU8 {
            w: 70_000,
            h: 2,
            stride: 0,
            data: &data,
        };
        assert!(matches!(
            Scoreboard::new(img, &params()),
            Err(Error::InvalidImageFormat { width: 70_000, .. })
        ));
    }

    #[test]
    fn poisson_pmf_matches_closed_form_for_small_n() {
        // ln p(2) = 2 ln l - ln 2 - l
        let lambda: f64 = 0.25;
        let expected = 2.0 * lambda.ln() - 2.0f64.ln() - lambda;
        assert!((ln_poisson_pmf(2, lambda) - expected).abs() < 1e-12);
    }

    #[test]
    fn poisson_pmf_decreases_with_larger_peaks_in_sparse_tables() {
        let lambda = 0.01;
        let mut prev = ln_poisson_pmf(1, lambda);
        for n in 2..10 {
            let next = ln_poisson_pmf(n, lambda);
            assert!(next < prev, "peak count {n} should be less probable");
            prev = next;
        }
    }

    #[test]
    fn find_range_clips_an_axis_aligned_channel() {
        // Horizontal line y = 32 in a 64x64 raster, walking -x.
        let p0 = Point::new(0.0, 32.0);
        let delta = Point::new(-1.0, 0.0);
        let (lo, hi) = find_range(64, 64, p0, delta);
        assert_eq!((lo, hi), (-64.0, 0.0));
    }

    #[test]
    fn find_range_handles_oblique_lines() {
        let p0 = Point::new(10.0, 0.0);
        let delta = Point::new(1.0, 1.0);
        let (lo, hi) = find_range(64, 64, p0, delta);
        assert_eq!((lo, hi), (0.0, 54.0));
        // Interior steps stay inside the rectangle.
        for z in [lo, (lo + hi) / 2.0, hi] {
            let p = p0 + delta * z;
            assert!(p.x >= 0.0 && p.x <= 64.0 && p.y >= 0.0 && p.y <= 64.0);
        }
    }

    #[test]
    fn find_range_misses_yield_an_empty_walk() {
        // Line entirely outside the rectangle.
        let p0 = Point::new(-100.0, -100.0);
        let delta = Point::new(0.0, 1.0);
        let (lo, hi) = find_range(64, 64, p0, delta);
        assert!(lo > hi, "empty range must not iterate");
    }

    #[test]
    fn draining_leaves_no_pending_or_marked_cells() {
        // A short diagonal plus scattered dust.
        let mut data = vec![0u8; 32 * 32];
        for i in 0..12 {
            data[(5 + i) * 32 + (5 + i)] = 255;
        }
        data[3] = 255;
        data[31 * 32 + 7] = 255;

        let img = ImageU8 {
            w: 32,
            h: 32,
            stride: 32,
            data: &data,
        };
        let mut sb = Scoreboard::with_seed(img, &params(), 7).unwrap();
        while sb.next().is_some() {}

        let grid = sb.status();
        assert_eq!(grid.count(CellStatus::Pending), 0);
        assert_eq!(grid.count(CellStatus::MarkedPending), 0);
        assert_eq!(grid.count(CellStatus::MarkedVoted), 0);
    }

    #[test]
    fn emitted_segments_respect_the_length_floor() {
        let mut data = vec![0u8; 64 * 64];
        for x in 10..54 {
            data[32 * 64 + x] = 255;
        }
        let img = ImageU8 {
            w: 64,
            h: 64,
            stride: 64,
            data: &data,
        };
        let sb = Scoreboard::with_seed(img, &params(), 42).unwrap();
        for segment in sb {
            assert!(segment.length_squared() >= 100.0);
        }
    }

    #[test]
    fn blank_raster_emits_nothing() {
        let data = vec![0u8; 16 * 16];
        let img = ImageU8 {
            w: 16,
            h: 16,
            stride: 16,
            data: &data,
        };
        let mut sb = Scoreboard::with_seed(img, &params(), 1).unwrap();
        assert!(sb.next().is_none());
        let (voted, total) = sb.counted_votes();
        assert_eq!(voted, 0);
        assert_eq!(total, 0);
    }
}
