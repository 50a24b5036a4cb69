use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Blank `width x height` grayscale buffer.
pub fn blank(width: usize, height: usize) -> Vec<u8> {
    vec![0u8; width * height]
}

/// Draw a horizontal run of bright pixels on row `y`, `x0..=x1` inclusive.
pub fn draw_hline(img: &mut [u8], width: usize, y: usize, x0: usize, x1: usize) {
    for x in x0..=x1 {
        img[y * width + x] = 255;
    }
}

/// Draw a vertical run of bright pixels in column `x`, `y0..=y1` inclusive.
pub fn draw_vline(img: &mut [u8], width: usize, x: usize, y0: usize, y1: usize) {
    for y in y0..=y1 {
        img[y * width + x] = 255;
    }
}

/// Rectangle outline with the given border thickness; `(x0, y0)` and
/// `(x1, y1)` are the outer corners, inclusive.
pub fn draw_rect_outline(
    img: &mut [u8],
    width: usize,
    (x0, y0): (usize, usize),
    (x1, y1): (usize, usize),
    thickness: usize,
) {
    for t in 0..thickness {
        draw_hline(img, width, y0 + t, x0, x1);
        draw_hline(img, width, y1 - t, x0, x1);
        draw_vline(img, width, x0 + t, y0, y1);
        draw_vline(img, width, x1 - t, y0, y1);
    }
}

/// Set `fraction` of all pixels to 255 uniformly at random.
pub fn salt_noise(img: &mut [u8], fraction: f64, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for px in img.iter_mut() {
        if rng.gen::<f64>() < fraction {
            *px = 255;
        }
    }
}
