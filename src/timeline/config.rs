use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::effects::grade::ColorStyle;
use crate::effects::motion::{DEFAULT_ZOOM_AMOUNT, MotionSpec, validate_zoom_amount};
use crate::effects::parallax::DEFAULT_PARALLAX_SHIFT_PX;
use crate::effects::transitions::TransitionKind;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::plan::MAX_TIMELINE_FRAMES;

/// How each scene's Ken Burns motion is chosen.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPolicy {
    /// Deterministic draw from [`MotionSpec::catalog`].
    Seeded {
        /// Generator seed.
        #[serde(default)]
        seed: u64,
    },
    /// The same motion for every scene.
    Fixed(MotionSpec),
    /// One motion per scene, in scene order.
    PerScene(Vec<MotionSpec>),
}

impl Default for MotionPolicy {
    fn default() -> Self {
        Self::Seeded { seed: 0 }
    }
}

/// User-facing render settings.
///
/// Every field has a default, so a JSON object may name only the fields it changes. Style and
/// transition are kept as names and checked by [`VideoConfig::resolve`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Output frame rate, frames per second.
    pub fps: u32,
    /// Seconds each scene is on screen, excluding transitions.
    pub scene_duration: f64,
    /// Seconds of each transition between adjacent scenes.
    pub transition_duration: f64,
    /// Animate scenes with zoom/pan.
    pub use_ken_burns: bool,
    /// Apply the color grade to every image.
    pub use_color_grade: bool,
    /// One of `warm`, `cool`, `vintage`, `cyberpunk`, `neutral`.
    pub color_style: String,
    /// One of `crossfade`, `wipe_left`, `zoom_blur`.
    pub transition_type: String,
    /// Destination of the encoded video.
    pub output_path: PathBuf,
    /// Override the output resolution (defaults to the first image's size).
    pub target_size: Option<Canvas>,
    /// Peak zoom factor used by seeded motion selection.
    pub zoom_amount: f64,
    /// Per-scene motion selection.
    pub motion: MotionPolicy,
    /// Use the parallax effect for scenes when Ken Burns is off.
    pub use_parallax: bool,
    /// Parallax travel of the image center over one scene, in pixels.
    pub parallax_shift_px: f64,
    /// Worker threads for pixel work (`None` = rayon default).
    pub threads: Option<usize>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: 24,
            scene_duration: 4.0,
            transition_duration: 1.0,
            use_ken_burns: true,
            use_color_grade: true,
            color_style: ColorStyle::Warm.name().to_string(),
            transition_type: TransitionKind::ZoomBlur.name().to_string(),
            output_path: PathBuf::from("outputs/videos/story_animation.mp4"),
            target_size: None,
            zoom_amount: DEFAULT_ZOOM_AMOUNT,
            motion: MotionPolicy::default(),
            use_parallax: false,
            parallax_shift_px: DEFAULT_PARALLAX_SHIFT_PX,
            threads: None,
        }
    }
}

/// How scenes move once Ken Burns and parallax flags are combined.
#[derive(Clone, Debug, PartialEq)]
pub enum MotionMode {
    /// Zoom/pan per [`MotionPolicy`].
    KenBurns {
        /// Selection policy.
        policy: MotionPolicy,
        /// Zoom factor for the seeded catalog.
        zoom_amount: f64,
    },
    /// Depth-proxy parallax.
    Parallax {
        /// Peak shift in pixels.
        shift_px: f64,
    },
    /// Every scene frame is a copy of the image.
    Static,
}

/// A validated [`VideoConfig`] with names parsed and durations converted to frame counts.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    /// Output frame rate.
    pub fps: Fps,
    /// Frames per scene, in `1..=MAX_TIMELINE_FRAMES`.
    pub scene_frame_count: u64,
    /// Frames per transition, in `0..=MAX_TIMELINE_FRAMES`.
    pub transition_frame_count: u64,
    /// Grade to apply, `None` when grading is off.
    pub color_style: Option<ColorStyle>,
    /// Transition between adjacent scenes.
    pub transition: TransitionKind,
    /// Scene motion.
    pub motion: MotionMode,
    /// Output size override.
    pub target_size: Option<Canvas>,
    /// Worker threads for pixel work.
    pub threads: Option<usize>,
}

impl VideoConfig {
    /// Validate every field and parse names into typed values. Touches no files.
    pub fn resolve(&self) -> ReelResult<ResolvedConfig> {
        let color_style = ColorStyle::parse(&self.color_style)?;
        let transition = TransitionKind::parse(&self.transition_type)?;
        let fps = Fps::integer(self.fps)?;

        if !self.scene_duration.is_finite() || self.scene_duration <= 0.0 {
            return Err(ReelError::configuration(format!(
                "scene_duration must be > 0 seconds, got {}",
                self.scene_duration
            )));
        }
        if !self.transition_duration.is_finite() || self.transition_duration < 0.0 {
            return Err(ReelError::configuration(format!(
                "transition_duration must be >= 0 seconds, got {}",
                self.transition_duration
            )));
        }

        let scene_frame_count = fps.secs_to_frames_round(self.scene_duration);
        if scene_frame_count == 0 {
            return Err(ReelError::configuration(format!(
                "scene_duration {}s is shorter than one frame at {} fps",
                self.scene_duration, self.fps
            )));
        }
        let transition_frame_count = fps.secs_to_frames_round(self.transition_duration);
        if scene_frame_count > MAX_TIMELINE_FRAMES
            || transition_frame_count > MAX_TIMELINE_FRAMES
        {
            return Err(ReelError::configuration(format!(
                "scene_duration {}s / transition_duration {}s at {} fps exceed the \
                 {MAX_TIMELINE_FRAMES}-frame limit",
                self.scene_duration, self.transition_duration, self.fps
            )));
        }

        if let Some(size) = self.target_size
            && (size.width == 0 || size.height == 0)
        {
            return Err(ReelError::configuration(format!(
                "target_size must be non-zero, got {size}"
            )));
        }

        if let Some(0) = self.threads {
            return Err(ReelError::configuration("threads must be >= 1 when set"));
        }

        let motion = if self.use_ken_burns {
            validate_zoom_amount(self.zoom_amount)?;
            match &self.motion {
                MotionPolicy::Seeded { .. } => {}
                MotionPolicy::Fixed(spec) => spec.validate()?,
                MotionPolicy::PerScene(specs) => {
                    for spec in specs {
                        spec.validate()?;
                    }
                }
            }
            MotionMode::KenBurns {
                policy: self.motion.clone(),
                zoom_amount: self.zoom_amount,
            }
        } else if self.use_parallax {
            if !self.parallax_shift_px.is_finite() || self.parallax_shift_px < 0.0 {
                return Err(ReelError::configuration(format!(
                    "parallax_shift_px must be finite and >= 0, got {}",
                    self.parallax_shift_px
                )));
            }
            MotionMode::Parallax {
                shift_px: self.parallax_shift_px,
            }
        } else {
            MotionMode::Static
        };

        Ok(ResolvedConfig {
            fps,
            scene_frame_count,
            transition_frame_count,
            color_style: self.use_color_grade.then_some(color_style),
            transition,
            motion,
            target_size: self.target_size,
            threads: self.threads,
        })
    }
}

/// A complete render request: ordered images plus settings, as stored in a JSON job file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderJob {
    /// Input images in narrative order.
    pub images: Vec<PathBuf>,
    /// Render settings.
    #[serde(flatten)]
    pub config: VideoConfig,
}

impl RenderJob {
    /// Read a job from a JSON file.
    ///
    /// Relative image paths are resolved against the job file's directory.
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open render job '{}'", path.display()))?;
        let mut job: RenderJob = serde_json::from_reader(std::io::BufReader::new(f))
            .with_context(|| format!("parse render job JSON '{}'", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for image in &mut job.images {
            if image.is_relative() {
                *image = base.join(&*image);
            }
        }
        Ok(job)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/config.rs"]
mod tests;
