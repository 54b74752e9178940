use crate::animation::ease::eased_progress;
use crate::assets::loader::resize_lanczos;
use crate::foundation::core::Frame;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::lerp;

/// Zoom factor used when none is configured.
pub const DEFAULT_ZOOM_AMOUNT: f64 = 1.15;
/// Largest accepted zoom factor.
pub const MAX_ZOOM_AMOUNT: f64 = 1.5;

/// Direction of the Ken Burns zoom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    /// Start at 1.0, end at `zoom_amount`.
    In,
    /// Start at `zoom_amount`, end at 1.0.
    Out,
}

/// Direction the crop window travels across the enlarged image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanDirection {
    /// Centered, static crop.
    #[default]
    None,
    /// Window moves from the left edge to the right edge.
    Left,
    /// Window moves from the right edge to the left edge.
    Right,
    /// Window moves from the top edge to the bottom edge.
    Up,
    /// Window moves from the bottom edge to the top edge.
    Down,
}

/// Per-scene camera motion.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionSpec {
    /// Zoom in or out.
    pub zoom_direction: ZoomDirection,
    /// Peak zoom factor, in `(1.0, MAX_ZOOM_AMOUNT]`.
    #[serde(default = "default_zoom_amount")]
    pub zoom_amount: f64,
    /// Pan direction.
    #[serde(default)]
    pub pan_direction: PanDirection,
}

fn default_zoom_amount() -> f64 {
    DEFAULT_ZOOM_AMOUNT
}

impl MotionSpec {
    /// Build a spec.
    pub fn new(zoom_direction: ZoomDirection, zoom_amount: f64, pan_direction: PanDirection) -> Self {
        Self {
            zoom_direction,
            zoom_amount,
            pan_direction,
        }
    }

    /// The fixed catalog seeded selection draws from.
    pub fn catalog(zoom_amount: f64) -> [MotionSpec; 5] {
        use PanDirection as P;
        use ZoomDirection as Z;
        [
            Self::new(Z::In, zoom_amount, P::Left),
            Self::new(Z::In, zoom_amount, P::Right),
            Self::new(Z::Out, zoom_amount, P::None),
            Self::new(Z::In, zoom_amount, P::Up),
            Self::new(Z::In, zoom_amount, P::Down),
        ]
    }

    /// Reject zoom factors outside `(1.0, MAX_ZOOM_AMOUNT]`.
    pub fn validate(&self) -> ReelResult<()> {
        validate_zoom_amount(self.zoom_amount)
    }

    /// Zoom factor at eased progress `t`.
    pub fn scale_at(&self, t: f64) -> f64 {
        match self.zoom_direction {
            ZoomDirection::In => lerp(1.0, self.zoom_amount, t),
            ZoomDirection::Out => lerp(1.0, self.zoom_amount, 1.0 - t),
        }
    }
}

impl std::fmt::Display for MotionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let zoom = match self.zoom_direction {
            ZoomDirection::In => "in",
            ZoomDirection::Out => "out",
        };
        let pan = match self.pan_direction {
            PanDirection::None => "none",
            PanDirection::Left => "left",
            PanDirection::Right => "right",
            PanDirection::Up => "up",
            PanDirection::Down => "down",
        };
        write!(f, "zoom={zoom} x{:.3} pan={pan}", self.zoom_amount)
    }
}

pub(crate) fn validate_zoom_amount(zoom_amount: f64) -> ReelResult<()> {
    if !zoom_amount.is_finite() || zoom_amount <= 1.0 || zoom_amount > MAX_ZOOM_AMOUNT {
        return Err(ReelError::configuration(format!(
            "zoom_amount must be in (1.0, {MAX_ZOOM_AMOUNT}], got {zoom_amount}"
        )));
    }
    Ok(())
}

/// Crop window into the enlarged image for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropWindow {
    /// Enlarged image width.
    pub enlarged_width: u32,
    /// Enlarged image height.
    pub enlarged_height: u32,
    /// Left edge of the window.
    pub x: u32,
    /// Top edge of the window.
    pub y: u32,
}

/// Ken Burns synthesizer for one still image.
///
/// Frames are rendered on demand by index so a caller can stream them.
#[derive(Debug)]
pub struct KenBurns<'a> {
    image: &'a Frame,
    spec: MotionSpec,
    frame_count: u64,
}

impl<'a> KenBurns<'a> {
    /// Create a synthesizer producing `frame_count` frames of `image`'s size.
    pub fn new(image: &'a Frame, spec: MotionSpec, frame_count: u64) -> ReelResult<Self> {
        spec.validate()?;
        Ok(Self {
            image,
            spec,
            frame_count,
        })
    }

    /// Number of frames this synthesizer produces.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Zoom factor of frame `i`.
    pub fn scale_at(&self, i: u64) -> f64 {
        self.spec.scale_at(eased_progress(i, self.frame_count, 0.0))
    }

    /// Enlarged size and crop offset of frame `i`.
    pub fn window_at(&self, i: u64) -> CropWindow {
        let t = eased_progress(i, self.frame_count, 0.0);
        let scale = self.spec.scale_at(t);
        let (w, h) = self.image.dimensions();

        let enlarged_width = ((f64::from(w) * scale).floor() as u32).max(w);
        let enlarged_height = ((f64::from(h) * scale).floor() as u32).max(h);
        let max_x = enlarged_width - w;
        let max_y = enlarged_height - h;
        let travel = |max: u32, t: f64| (f64::from(max) * t).floor() as u32;

        let (x, y) = match self.spec.pan_direction {
            PanDirection::None => (max_x / 2, max_y / 2),
            PanDirection::Left => (travel(max_x, t), max_y / 2),
            PanDirection::Right => (travel(max_x, 1.0 - t), max_y / 2),
            PanDirection::Up => (max_x / 2, travel(max_y, t)),
            PanDirection::Down => (max_x / 2, travel(max_y, 1.0 - t)),
        };

        CropWindow {
            enlarged_width,
            enlarged_height,
            x: x.min(max_x),
            y: y.min(max_y),
        }
    }

    /// Render frame `i`. Always the input image's size.
    pub fn render_frame(&self, i: u64) -> Frame {
        let (w, h) = self.image.dimensions();
        let win = self.window_at(i);
        if win.enlarged_width == w && win.enlarged_height == h {
            return self.image.clone();
        }

        let enlarged = resize_lanczos(self.image, win.enlarged_width, win.enlarged_height);
        let cropped = image::imageops::crop_imm(&enlarged, win.x, win.y, w, h).to_image();
        if cropped.dimensions() != (w, h) {
            return resize_lanczos(&cropped, w, h);
        }
        cropped
    }

    /// All frames in order, rendered lazily.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        (0..self.frame_count).map(|i| self.render_frame(i))
    }
}

/// Expand `image` into `frame_count` Ken Burns frames.
///
/// `frame_count` of 0 or 1 yields exactly one frame, rendered at t = 0. That is the source itself
/// for zoom-in motion and a `zoom_amount` crop for zoom-out.
pub fn synthesize_ken_burns(
    image: &Frame,
    frame_count: u64,
    spec: MotionSpec,
) -> ReelResult<Vec<Frame>> {
    let kb = KenBurns::new(image, spec, frame_count.max(1))?;
    Ok(kb.frames().collect())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/motion.rs"]
mod tests;
