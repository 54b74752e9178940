use crate::foundation::core::Frame;
use crate::foundation::error::{ReelError, ReelResult};

/// Gaussian blur with an odd `kernel_size` x `kernel_size` kernel.
///
/// `kernel_size` of 0 or 1 returns the input unchanged. Sigma is derived from the kernel size
/// (`0.3 * ((k - 1) * 0.5 - 1) + 0.8`). Edges reflect without repeating the border pixel
/// (`dcb|abcd|cba`), as OpenCV's default border does.
pub fn gaussian_blur(src: &Frame, kernel_size: u32) -> ReelResult<Frame> {
    if kernel_size <= 1 {
        return Ok(src.clone());
    }
    if kernel_size.is_multiple_of(2) {
        return Err(ReelError::configuration(format!(
            "blur kernel size must be odd, got {kernel_size}"
        )));
    }

    let radius = kernel_size / 2;
    let sigma = sigma_for_kernel(kernel_size);
    let kernel = gaussian_kernel_q16(radius, sigma)?;

    let (width, height) = src.dimensions();
    let mut tmp = vec![0u8; src.as_raw().len()];
    let mut out = vec![0u8; src.as_raw().len()];
    horizontal_pass(src.as_raw(), &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);

    Frame::from_raw(width, height, out)
        .ok_or_else(|| ReelError::encoding("blur output buffer size mismatch"))
}

/// Sigma OpenCV derives for a kernel of size `k` when no sigma is given.
pub(crate) fn sigma_for_kernel(k: u32) -> f32 {
    0.3 * ((k as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ReelResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ReelError::configuration("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Push rounding residue into the center tap so the kernel sums to exactly 1.0 (Q16).
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 3];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = reflect_101(x + ki as i32 - radius, w);
                let idx = ((y * w + sx) as usize) * 3;
                for c in 0..3 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 3;
            for c in 0..3 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 3];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = reflect_101(y + ki as i32 - radius, h);
                let idx = ((sy * w + x) as usize) * 3;
                for c in 0..3 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 3;
            for c in 0..3 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

/// Map `i` into `0..n` by mirroring around the first and last index.
fn reflect_101(mut i: i32, n: i32) -> i32 {
    if n <= 1 {
        return 0;
    }
    while i < 0 || i >= n {
        i = if i < 0 { -i } else { 2 * (n - 1) - i };
    }
    i
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
