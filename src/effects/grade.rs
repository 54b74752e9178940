use rayon::prelude::*;

use crate::foundation::core::Frame;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::normalized_radial_distance;

/// Maximum brightness loss of the vignette, reached at the farthest corner.
pub const VIGNETTE_STRENGTH: f32 = 0.3;

/// Named color grade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorStyle {
    /// Orange/yellow push.
    Warm,
    /// Blue/cyan push.
    Cool,
    /// Lifted blacks, compressed contrast.
    Vintage,
    /// Gamma contrast boost with magenta/blue push.
    Cyberpunk,
    /// Vignette only.
    Neutral,
}

impl ColorStyle {
    /// Every style, in declaration order.
    pub const ALL: [ColorStyle; 5] = [
        ColorStyle::Warm,
        ColorStyle::Cool,
        ColorStyle::Vintage,
        ColorStyle::Cyberpunk,
        ColorStyle::Neutral,
    ];

    /// Parse a style name (case-insensitive).
    pub fn parse(name: &str) -> ReelResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "warm" => Ok(Self::Warm),
            "cool" => Ok(Self::Cool),
            "vintage" => Ok(Self::Vintage),
            "cyberpunk" => Ok(Self::Cyberpunk),
            "neutral" | "none" => Ok(Self::Neutral),
            "" => Err(ReelError::configuration("color style must be non-empty")),
            other => Err(ReelError::configuration(format!(
                "unknown color style '{other}' (expected warm, cool, vintage, cyberpunk or neutral)"
            ))),
        }
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Vintage => "vintage",
            Self::Cyberpunk => "cyberpunk",
            Self::Neutral => "neutral",
        }
    }

    /// Per-pixel tone transform on normalized `[r, g, b]`, before the vignette.
    fn tone(self, [r, g, b]: [f32; 3]) -> [f32; 3] {
        match self {
            Self::Warm => [r * 1.1, g * 1.05, b * 0.9],
            Self::Cool => [r * 0.9, g, b * 1.2],
            Self::Vintage => {
                let lift = |c: f32| c * 0.8 + 0.2;
                [lift(r), lift(g) * 0.95, lift(b)]
            }
            Self::Cyberpunk => [r.powf(1.2) * 1.2, g.powf(1.2), b.powf(1.2) * 1.3],
            Self::Neutral => [r, g, b],
        }
    }
}

impl std::fmt::Display for ColorStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-pixel vignette factors for a `width` x `height` image, row-major.
///
/// `1.0` at the center, `1.0 - VIGNETTE_STRENGTH` at the farthest corner.
pub fn vignette_mask(width: u32, height: u32) -> Vec<f32> {
    normalized_radial_distance(width, height)
        .into_iter()
        .map(|d| 1.0 - d * VIGNETTE_STRENGTH)
        .collect()
}

/// Apply `style` plus the universal vignette. Output has the input's dimensions.
pub fn grade(image: &Frame, style: ColorStyle) -> Frame {
    let (width, height) = image.dimensions();
    let mask = vignette_mask(width, height);
    let mut out = image.clone();
    let row_len = (width as usize) * 3;
    if row_len == 0 {
        return out;
    }

    out.par_chunks_exact_mut(row_len)
        .zip(mask.par_chunks_exact(width as usize))
        .for_each(|(row, mask_row)| {
            for (px, &v) in row.chunks_exact_mut(3).zip(mask_row) {
                let rgb = [
                    f32::from(px[0]) / 255.0,
                    f32::from(px[1]) / 255.0,
                    f32::from(px[2]) / 255.0,
                ];
                let toned = style.tone(rgb);
                for (dst, c) in px.iter_mut().zip(toned) {
                    *dst = quantize(c * v);
                }
            }
        });
    out
}

/// Clamp to `[0, 1]` and truncate to 8-bit.
fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grade.rs"]
mod tests;
