//! storyreel turns a short, ordered set of still images into an animated video.
//!
//! Each image becomes a scene with synthetic camera motion (Ken Burns zoom/pan, or a depth-proxy
//! parallax), an optional color grade, and a transition into the next scene. Frames are produced
//! in strict presentation order and streamed into a [`FrameSink`]; [`FfmpegSink`] encodes MP4 via
//! the system `ffmpeg` binary.
//!
//! - Describe the render with a [`VideoConfig`] (or a JSON [`RenderJob`])
//! - Inspect the frame layout with [`plan_timeline`]
//! - Stream it with [`render_video`], or preview one frame with [`render_frame_at`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod animation;
pub(crate) mod effects;
pub(crate) mod encode;
pub(crate) mod timeline;

pub use crate::foundation::core::{Canvas, Fps, Frame, FrameIndex};
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::foundation::math::Rng64;

pub use crate::animation::ease::{Ease, eased_progress, segment_progress};
pub use crate::assets::loader::{
    SceneImage, decode_image, load_image, load_scene_images, normalize_scene_images,
};
pub use crate::effects::blur::gaussian_blur;
pub use crate::effects::grade::{ColorStyle, VIGNETTE_STRENGTH, grade, vignette_mask};
pub use crate::effects::motion::{
    CropWindow, DEFAULT_ZOOM_AMOUNT, KenBurns, MAX_ZOOM_AMOUNT, MotionSpec, PanDirection,
    ZoomDirection, synthesize_ken_burns,
};
pub use crate::effects::parallax::{
    DEFAULT_PARALLAX_SHIFT_PX, Parallax, depth_proxy, synthesize_parallax,
};
pub use crate::effects::transitions::{
    TransitionKind, ZOOM_BLUR_MAX_KERNEL, crossfade, synthesize_transition, transition_frame,
    wipe_left, zoom_blur_kernel_size,
};
pub use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path, validate_sink_config,
};
pub use crate::encode::sink::{EndStatus, FrameCaptureSink, FrameSink, InMemorySink, SinkConfig};
pub use crate::timeline::assembler::{
    RenderStats, check_mp4_canvas, render_frame_at, render_to_mp4, render_video,
};
pub use crate::timeline::config::{
    MotionMode, MotionPolicy, RenderJob, ResolvedConfig, VideoConfig,
};
pub use crate::timeline::observer::{NoopObserver, TimelineObserver, TracingObserver};
pub use crate::timeline::plan::{
    FrameSlot, MAX_TIMELINE_FRAMES, ScenePlan, SceneMotion, TimelinePlan, TransitionPlan,
    plan_timeline,
};
