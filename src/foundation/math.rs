/// Linear interpolation between `a` and `b`.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Deterministic SplitMix64 generator.
///
/// Used wherever a "random" choice must be reproducible from an explicit seed.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Create a generator from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}

/// Distance of every pixel from the image center `(w/2, h/2)` (integer center), normalized by the
/// largest such distance. Row-major, `w * h` entries in `[0, 1]`.
///
/// A 1x1 image yields `[0.0]`.
pub(crate) fn normalized_radial_distance(width: u32, height: u32) -> Vec<f32> {
    let cx = f64::from(width / 2);
    let cy = f64::from(height / 2);

    // Farthest pixel is always one of the corners.
    let max_x = cx.max(f64::from(width.saturating_sub(1)) - cx);
    let max_y = cy.max(f64::from(height.saturating_sub(1)) - cy);
    let max_d = (max_x * max_x + max_y * max_y).sqrt();

    let dx2: Vec<f64> = (0..width)
        .map(|x| {
            let d = f64::from(x) - cx;
            d * d
        })
        .collect();

    let mut out = Vec::with_capacity((width as usize) * (height as usize));
    for y in 0..height {
        let dy = f64::from(y) - cy;
        let dy2 = dy * dy;
        for &dx2 in &dx2 {
            let d = if max_d > 0.0 {
                (dx2 + dy2).sqrt() / max_d
            } else {
                0.0
            };
            out.push(d as f32);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
