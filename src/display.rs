//! Flip-dot style output: abstract colors to 0RGB pixels.
//!
//! Every dot is either off or on; the pattern colors pick one of the two per
//! dot from its grid parity, so a stretched dot shows up as a solid block.

use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::renderer::Color;

pub const DOT_OFF: u32 = 0x0000_0000;
pub const DOT_ON: u32 = 0x00FF_FFFF;

/// Resolve a color at dot `(x, y)` to an on/off pixel value.
#[inline]
pub fn dot_pixel(color: Color, x: usize, y: usize) -> u32 {
    let on = match color {
        Color::Black => false,
        Color::White => true,
        Color::VerticalStripe => x % 2 == 1,
        Color::HorizontalStripe => y % 2 == 1,
        Color::Alternating => (x % 2) != (y % 2),
    };
    if on { DOT_ON } else { DOT_OFF }
}

/// Precomputed mapping from window pixels to source dots (nearest neighbour).
pub struct DotLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl DotLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_y: Vec::new(),
        }
    }

    #[inline]
    pub fn dst_width(&self) -> usize {
        self.src_x.len()
    }

    #[inline]
    pub fn dst_height(&self) -> usize {
        self.src_y.len()
    }
}

pub fn build_dot_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> DotLut {
    DotLut {
        src_x: axis_map(dst_w, src_w),
        src_y: axis_map(dst_h, src_h),
    }
}

fn axis_map(dst: usize, src: usize) -> Vec<usize> {
    if src == 0 {
        return vec![0; dst];
    }
    (0..dst).map(|d| (d * src / dst).min(src - 1)).collect()
}

/// Stretch the dot buffer over `dst`, rows in parallel.
///
/// `dst` rows beyond the LUT height, and columns beyond its width, are left
/// untouched.
pub fn blit_dots(dst: &mut [u32], dw: usize, src: &[Color], sw: usize, lut: &DotLut) {
    if dw == 0 || sw == 0 {
        return;
    }
    dst.par_chunks_mut(dw)
        .take(lut.dst_height())
        .enumerate()
        .for_each(|(y, dst_row)| {
            let sy = lut.src_y[y];
            let row = &src[sy * sw..(sy + 1) * sw];
            for (px, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
                *px = dot_pixel(row[sx], sx, sy);
            }
        });
}
