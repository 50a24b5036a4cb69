//! Per-pixel bookkeeping for the progressive transform.

use crate::raster::ImageU8;

/// Intensity at or above which a pixel participates in the transform.
pub const INTENSITY_THRESHOLD: u8 = 128;

/// Lifecycle of a pixel during extraction.
///
/// `Pending` pixels may be sampled to cast votes; `Pending` and `Voted`
/// pixels may be provisionally claimed by a channel scan (`Marked*`);
/// committed claims retire as `Done`. `Unset` pixels never participate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStatus {
    Unset,
    Pending,
    Voted,
    Done,
    MarkedPending,
    MarkedVoted,
}

/// Mutable grid of [`CellStatus`], one cell per raster pixel.
///
/// Exclusively owned by a [`super::Scoreboard`]; channel scans borrow it
/// through a claim guard that restores marked cells on abandonment.
pub struct StatusGrid {
    width: usize,
    height: usize,
    cells: Vec<CellStatus>,
}

impl StatusGrid {
    /// Classify every raster pixel and collect the pending queue.
    ///
    /// Traversal order is irrelevant; the queue is sampled uniformly at
    /// random, never front-to-back.
    pub fn from_image(image: &ImageU8<'_>) -> (Self, Vec<(u16, u16)>) {
        let mut cells = vec![CellStatus::Unset; image.w * image.h];
        let mut queue = Vec::new();

        for y in 0..image.h {
            let row = image.row(y);
            for (x, &value) in row.iter().enumerate() {
                if value >= INTENSITY_THRESHOLD {
                    cells[y * image.w + x] = CellStatus::Pending;
                    queue.push((x as u16, y as u16));
                }
            }
        }

        (
            Self {
                width: image.w,
                height: image.h,
                cells,
            },
            queue,
        )
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> CellStatus {
        self.cells[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, status: CellStatus) {
        self.cells[y * self.width + x] = status;
    }

    /// True if `(x, y)` lies inside the grid.
    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[cfg(test)]
    pub(crate) fn count(&self, status: CellStatus) -> usize {
        self.cells.iter().filter(|&&c| c == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholding_splits_pending_from_unset() {
        let data = [0u8, 127, 128, 255, 10, 200];
        let img = ImageU8 {
            w: 3,
            h: 2,
            stride: 3,
            data: &data,
        };
        let (grid, queue) = StatusGrid::from_image(&img);

        assert_eq!(grid.get(0, 0), CellStatus::Unset);
        assert_eq!(grid.get(1, 0), CellStatus::Unset);
        assert_eq!(grid.get(2, 0), CellStatus::Pending);
        assert_eq!(grid.get(0, 1), CellStatus::Pending);
        assert_eq!(grid.get(2, 1), CellStatus::Pending);
        assert_eq!(queue, vec![(2, 0), (0, 1), (2, 1)]);
    }

    #[test]
    fn bounds_check_rejects_negatives_and_overflow() {
        let data = [255u8; 4];
        let img = ImageU8 {
            w: 2,
            h: 2,
            stride: 2,
            data: &data,
        };
        let (grid, _) = StatusGrid::from_image(&img);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(1, 1));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, 2));
    }
}
