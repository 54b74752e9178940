use crate::animation::ease::eased_progress;
use crate::effects::blur::gaussian_blur;
use crate::foundation::core::Frame;
use crate::foundation::error::{ReelError, ReelResult};

/// Largest zoom-blur kernel, reached halfway through the transition.
pub const ZOOM_BLUR_MAX_KERNEL: u32 = 15;

/// Progress used when a transition is a single frame: an even blend of both sides.
const SINGLE_FRAME_PROGRESS: f64 = 0.5;

/// How two adjacent scenes are bridged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Alpha blend from A to B.
    Crossfade,
    /// Hard-edged reveal of B growing from the left edge towards the right.
    WipeLeft,
    /// A blurs in and out while crossfading to B.
    ZoomBlur,
}

impl TransitionKind {
    /// Every transition kind, in declaration order.
    pub const ALL: [TransitionKind; 3] = [
        TransitionKind::Crossfade,
        TransitionKind::WipeLeft,
        TransitionKind::ZoomBlur,
    ];

    /// Parse a transition name (case-insensitive).
    pub fn parse(name: &str) -> ReelResult<Self> {
        let kind = name.trim().to_ascii_lowercase();
        if kind.is_empty() {
            return Err(ReelError::configuration("transition type must be non-empty"));
        }

        match kind.as_str() {
            "crossfade" => Ok(Self::Crossfade),
            "wipe_left" | "wipeleft" | "wipe" => Ok(Self::WipeLeft),
            "zoom_blur" | "zoomblur" => Ok(Self::ZoomBlur),
            _ => Err(ReelError::configuration(format!(
                "unknown transition type '{kind}' (expected crossfade, wipe_left or zoom_blur)"
            ))),
        }
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Crossfade => "crossfade",
            Self::WipeLeft => "wipe_left",
            Self::ZoomBlur => "zoom_blur",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Render frame `i` of a `count`-frame transition from `a` to `b`.
pub fn transition_frame(
    a: &Frame,
    b: &Frame,
    i: u64,
    count: u64,
    kind: TransitionKind,
) -> ReelResult<Frame> {
    if a.dimensions() != b.dimensions() {
        return Err(ReelError::configuration(format!(
            "transition endpoints differ in size: {:?} vs {:?}",
            a.dimensions(),
            b.dimensions()
        )));
    }

    let t = eased_progress(i, count, SINGLE_FRAME_PROGRESS);
    match kind {
        TransitionKind::Crossfade => Ok(crossfade(a, b, t)),
        TransitionKind::WipeLeft => Ok(wipe_left(a, b, t)),
        TransitionKind::ZoomBlur => {
            let blurred = gaussian_blur(a, zoom_blur_kernel_size(t))?;
            Ok(crossfade(&blurred, b, t))
        }
    }
}

/// Render a whole `count`-frame transition.
pub fn synthesize_transition(
    a: &Frame,
    b: &Frame,
    count: u64,
    kind: TransitionKind,
) -> ReelResult<Vec<Frame>> {
    (0..count)
        .map(|i| transition_frame(a, b, i, count, kind))
        .collect()
}

/// `a * (1 - alpha) + b * alpha`, rounded to nearest.
pub fn crossfade(a: &Frame, b: &Frame, alpha: f64) -> Frame {
    let alpha = alpha.clamp(0.0, 1.0) as f32;
    let inv = 1.0 - alpha;
    let data = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&av, &bv)| {
            (f32::from(av) * inv + f32::from(bv) * alpha)
                .round()
                .clamp(0.0, 255.0) as u8
        })
        .collect();
    Frame::from_raw(a.width(), a.height(), data).unwrap_or_else(|| a.clone())
}

/// Copy of `a` whose left `floor(t * width)` columns come from `b`.
pub fn wipe_left(a: &Frame, b: &Frame, t: f64) -> Frame {
    let width = a.width() as usize;
    let cut = ((width as f64) * t.clamp(0.0, 1.0)).floor() as usize;
    let mut out = a.clone();
    if cut == 0 {
        return out;
    }

    let row_len = width * 3;
    for (dst, src) in out
        .chunks_exact_mut(row_len)
        .zip(b.as_raw().chunks_exact(row_len))
    {
        dst[..cut * 3].copy_from_slice(&src[..cut * 3]);
    }
    out
}

/// Zoom-blur kernel size for eased progress `t`: triangular envelope peaking at `t = 0.5`,
/// forced odd, `0` meaning no blur.
pub fn zoom_blur_kernel_size(t: f64) -> u32 {
    let envelope = 1.0 - (t.clamp(0.0, 1.0) - 0.5).abs() * 2.0;
    let k = (f64::from(ZOOM_BLUR_MAX_KERNEL) * envelope).floor().max(0.0) as u32;
    if k > 0 && k.is_multiple_of(2) { k + 1 } else { k }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
