//! The `(rho, theta)` vote table.

use super::trig::MAX_THETA;

/// 2-D vote counters indexed by `(rho, theta)`.
///
/// `rho` is scaled so its resolution tracks the angular resolution: a
/// raster with a larger diagonal gets coarser `rho` bins, keeping the
/// table near `MAX_THETA` rows regardless of image size.
pub struct Accumulator {
    rho_bins: usize,
    rho_scale: f64,
    counts: Vec<u16>,
}

impl Accumulator {
    /// `diagonal` is the ceiling of the raster diagonal in pixels.
    pub fn new(diagonal: f64) -> Self {
        let rho_scale = ((MAX_THETA as f64).log2() - diagonal.log2()).round().exp2();
        let rho_bins = (rho_scale * diagonal).ceil() as usize;
        Self {
            rho_bins,
            rho_scale,
            counts: vec![0; rho_bins * MAX_THETA],
        }
    }

    #[inline]
    pub fn rho_bins(&self) -> usize {
        self.rho_bins
    }

    #[inline]
    pub fn rho_scale(&self) -> f64 {
        self.rho_scale
    }

    /// Bin index for a non-negative line offset, or `None` when the offset
    /// rounds past the table.
    #[inline]
    pub fn bin_for(&self, r: f64) -> Option<usize> {
        let rho = (r * self.rho_scale).round() as usize;
        (rho < self.rho_bins).then_some(rho)
    }

    /// Increment one cell and return the new count.
    #[inline]
    pub fn increment(&mut self, rho: usize, theta: usize) -> u16 {
        let cell = &mut self.counts[rho * MAX_THETA + theta];
        *cell += 1;
        *cell
    }

    /// Withdraw one previously-cast vote.
    #[inline]
    pub fn decrement(&mut self, rho: usize, theta: usize) {
        let cell = &mut self.counts[rho * MAX_THETA + theta];
        debug_assert!(*cell > 0, "vote withdrawn from an empty cell");
        *cell -= 1;
    }

    #[cfg(test)]
    pub(crate) fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rho_scale_is_a_power_of_two_near_the_ratio() {
        // 64x64 raster: diagonal ceil(90.51) = 91, 2048/91 ~ 22.5 -> 16.
        let acc = Accumulator::new(91.0);
        assert_eq!(acc.rho_scale(), 16.0);
        assert_eq!(acc.rho_bins(), 91 * 16);

        // 128x128: diagonal 182, 2048/182 ~ 11.3 -> 8.
        let acc = Accumulator::new(182.0);
        assert_eq!(acc.rho_scale(), 8.0);
        assert_eq!(acc.rho_bins(), 182 * 8);
    }

    #[test]
    fn bin_for_rejects_out_of_table_offsets() {
        let acc = Accumulator::new(91.0);
        assert_eq!(acc.bin_for(0.0), Some(0));
        assert_eq!(acc.bin_for(32.0), Some(512));
        assert_eq!(acc.bin_for(1e6), None);
    }

    #[test]
    fn increment_and_decrement_are_symmetric() {
        let mut acc = Accumulator::new(91.0);
        assert_eq!(acc.increment(5, 7), 1);
        assert_eq!(acc.increment(5, 7), 2);
        acc.decrement(5, 7);
        acc.decrement(5, 7);
        assert_eq!(acc.total(), 0);
    }
}
