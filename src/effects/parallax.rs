use rayon::prelude::*;

use crate::animation::ease::eased_progress;
use crate::foundation::core::Frame;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::normalized_radial_distance;

/// Horizontal travel of the nearest (center) pixel over a scene, in pixels.
pub const DEFAULT_PARALLAX_SHIFT_PX: f64 = 10.0;

/// Synthetic depth: `1.0` at the image center falling to `0.0` at the farthest corner.
pub fn depth_proxy(width: u32, height: u32) -> Vec<f32> {
    normalized_radial_distance(width, height)
        .into_iter()
        .map(|d| 1.0 - d)
        .collect()
}

/// Parallax synthesizer for one still image.
///
/// Each output pixel `(x, y)` samples the source at `(x + depth * shift, y)` where `shift` grows
/// with eased time. Sampling is linear, borders reflect.
#[derive(Debug)]
pub struct Parallax<'a> {
    image: &'a Frame,
    depth: Vec<f32>,
    max_shift_px: f64,
    frame_count: u64,
}

impl<'a> Parallax<'a> {
    /// Build a synthesizer; the depth map is computed once here.
    pub fn new(image: &'a Frame, max_shift_px: f64, frame_count: u64) -> ReelResult<Self> {
        if !max_shift_px.is_finite() || max_shift_px < 0.0 {
            return Err(ReelError::configuration(format!(
                "parallax shift must be finite and >= 0, got {max_shift_px}"
            )));
        }
        Ok(Self {
            image,
            depth: depth_proxy(image.width(), image.height()),
            max_shift_px,
            frame_count,
        })
    }

    /// Number of frames this synthesizer produces.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Shift applied to a depth-1 pixel in frame `i`.
    pub fn shift_at(&self, i: u64) -> f64 {
        self.max_shift_px * eased_progress(i, self.frame_count, 0.0)
    }

    /// Render frame `i`.
    pub fn render_frame(&self, i: u64) -> Frame {
        let shift = self.shift_at(i) as f32;
        if shift == 0.0 {
            return self.image.clone();
        }

        let (width, height) = self.image.dimensions();
        let w = width as usize;
        let row_len = w * 3;
        let src = self.image.as_raw();
        let mut out = vec![0u8; src.len()];

        out.par_chunks_exact_mut(row_len)
            .zip(src.par_chunks_exact(row_len))
            .zip(self.depth.par_chunks_exact(w))
            .for_each(|((dst_row, src_row), depth_row)| {
                for (x, (dst, &d)) in dst_row.chunks_exact_mut(3).zip(depth_row).enumerate() {
                    let sx = x as f32 + d * shift;
                    let x0 = sx.floor();
                    let frac = sx - x0;
                    let i0 = reflect(x0 as i64, w) * 3;
                    let i1 = reflect(x0 as i64 + 1, w) * 3;
                    for c in 0..3 {
                        let a = f32::from(src_row[i0 + c]);
                        let b = f32::from(src_row[i1 + c]);
                        dst[c] = (a + (b - a) * frac).round().clamp(0.0, 255.0) as u8;
                    }
                }
            });

        Frame::from_raw(width, height, out).unwrap_or_else(|| self.image.clone())
    }

    /// All frames in order, rendered lazily.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        (0..self.frame_count).map(|i| self.render_frame(i))
    }
}

/// Expand `image` into `frame_count` parallax frames (at least one).
pub fn synthesize_parallax(
    image: &Frame,
    frame_count: u64,
    max_shift_px: f64,
) -> ReelResult<Vec<Frame>> {
    let p = Parallax::new(image, max_shift_px, frame_count.max(1))?;
    Ok(p.frames().collect())
}

/// Reflective border index (`fedcba|abcdefgh|hgfedcb`).
fn reflect(i: i64, n: usize) -> usize {
    let n = n as i64;
    let m = i.rem_euclid(2 * n);
    (if m < n { m } else { 2 * n - 1 - m }) as usize
}

#[cfg(test)]
#[path = "../../tests/unit/effects/parallax.rs"]
mod tests;
