//! Read-only raster view supplied by the caller.
//!
//! The detector neither owns nor mutates image memory; it borrows a
//! single-channel 8-bit buffer for the duration of scoreboard
//! construction and never touches it again.

/// Borrowed 8-bit grayscale view, row-major with an explicit stride.
///
/// `stride` is the number of bytes between the starts of consecutive
/// rows and must be at least `w`.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Wrap a contiguous buffer (`stride == w`).
    pub fn from_slice(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// One row of valid pixels, excluding stride padding.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strided_rows_skip_padding() {
        let data: Vec<u8> = (0..12).collect();
        let img = ImageU8 {
            w: 3,
            h: 3,
            stride: 4,
            data: &data,
        };
        assert_eq!(img.row(0), &[0, 1, 2]);
        assert_eq!(img.row(2), &[8, 9, 10]);
        assert_eq!(img.get(1, 1), 5);
    }
}
