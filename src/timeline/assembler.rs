use std::path::Path;

use rayon::prelude::*;

use crate::assets::loader::{SceneImage, load_scene_images, normalize_scene_images};
use crate::effects::grade::{ColorStyle, grade};
use crate::effects::motion::KenBurns;
use crate::effects::parallax::Parallax;
use crate::effects::transitions::transition_frame;
use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path, validate_sink_config,
};
use crate::encode::sink::{EndStatus, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, Frame, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::config::{ResolvedConfig, VideoConfig};
use crate::timeline::observer::{TimelineObserver, TracingObserver};
use crate::timeline::plan::{FrameSlot, ScenePlan, SceneMotion, TimelinePlan, plan_timeline};

/// Summary of a finished render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Frames that belong to scenes.
    pub scene_frames: u64,
    /// Frames that belong to transitions.
    pub transition_frames: u64,
    /// Output size.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Output duration in seconds.
    pub duration_secs: f64,
}

/// Render `paths` (in narrative order) into `sink`.
///
/// Pipeline:
/// 1. [`VideoConfig::resolve`] and [`plan_timeline`]; configuration errors surface here, before
///    any file is read.
/// 2. Decode every image, normalize sizes, then grade them in parallel.
/// 3. `sink.begin`, then every frame in presentation order, then `sink.end`.
///
/// Once `begin` has succeeded, `end` is called exactly once: with [`EndStatus::Completed`] when
/// every frame was accepted, [`EndStatus::Aborted`] otherwise.
#[tracing::instrument(skip_all, fields(images = paths.len()))]
pub fn render_video<P: AsRef<Path> + Sync>(
    paths: &[P],
    config: &VideoConfig,
    sink: &mut dyn FrameSink,
    observer: &mut dyn TimelineObserver,
) -> ReelResult<RenderStats> {
    let result = render_video_inner(paths, config, sink, observer);
    match &result {
        Ok(stats) => observer.finished(stats),
        Err(err) => observer.aborted(err),
    }
    result
}

fn render_video_inner<P: AsRef<Path> + Sync>(
    paths: &[P],
    config: &VideoConfig,
    sink: &mut dyn FrameSink,
    observer: &mut dyn TimelineObserver,
) -> ReelResult<RenderStats> {
    let cfg = config.resolve()?;
    let plan = plan_timeline(&cfg, paths.len())?;
    observer.planned(&plan);

    let pool = build_thread_pool(cfg.threads)?;
    let (images, canvas) = pool.install(|| prepare_images(paths, &cfg))?;

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: plan.fps,
    })?;

    let streamed = pool.install(|| stream_timeline(&plan, &images, sink, observer));
    match streamed {
        Ok(frames_total) => sink.end(EndStatus::Completed).map(|()| RenderStats {
            frames_total,
            scene_frames: plan.scene_frames(),
            transition_frames: plan.transition_frames(),
            canvas,
            fps: plan.fps,
            duration_secs: plan.fps.frames_to_secs(frames_total),
        }),
        Err(err) => {
            if let Err(end_err) = sink.end(EndStatus::Aborted) {
                tracing::warn!(error = %end_err, "sink failed to discard aborted output");
            }
            Err(err)
        }
    }
}

/// Render `paths` to an MP4 at `config.output_path` using the system `ffmpeg`.
pub fn render_to_mp4<P: AsRef<Path> + Sync>(
    paths: &[P],
    config: &VideoConfig,
) -> ReelResult<RenderStats> {
    check_mp4_canvas(paths, config)?;
    if !is_ffmpeg_on_path() {
        return Err(ReelError::encoding(
            "ffmpeg is required for MP4 rendering, but was not found on PATH",
        ));
    }

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&config.output_path));
    let stats = render_video(paths, config, &mut sink, &mut TracingObserver)?;
    tracing::info!(out = %config.output_path.display(), "wrote video");
    Ok(stats)
}

/// Check that the output canvas `paths` and `config` produce can be encoded to MP4, reading at
/// most the first image's header.
///
/// The canvas is `config.target_size`, or the first image's size. Nothing is decoded, so an odd
/// resolution fails here instead of after every image has been loaded.
pub fn check_mp4_canvas<P: AsRef<Path>>(paths: &[P], config: &VideoConfig) -> ReelResult<()> {
    let cfg = config.resolve()?;
    let canvas = match (cfg.target_size, paths.first()) {
        (Some(size), _) => size,
        (None, Some(first)) => {
            let first = first.as_ref();
            let (width, height) = image::image_dimensions(first)
                .map_err(|e| ReelError::load(first, e.to_string()))?;
            Canvas { width, height }
        }
        (None, None) => return Ok(()),
    };
    validate_sink_config(&SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: cfg.fps,
    })
}

/// Render only frame `idx` of the video `paths` and `config` would produce.
///
/// Every image is still decoded, so load errors match [`render_video`]. The result equals the
/// frame [`render_video`] pushes at `idx`.
pub fn render_frame_at<P: AsRef<Path> + Sync>(
    paths: &[P],
    config: &VideoConfig,
    idx: FrameIndex,
) -> ReelResult<Frame> {
    let cfg = config.resolve()?;
    let plan = plan_timeline(&cfg, paths.len())?;
    let slot = plan.locate(idx).ok_or_else(|| {
        ReelError::configuration(format!(
            "frame {} is past the end of a {}-frame video",
            idx.0,
            plan.total_frames()
        ))
    })?;

    let pool = build_thread_pool(cfg.threads)?;
    pool.install(|| {
        let (images, _) = prepare_images(paths, &cfg)?;
        match slot {
            FrameSlot::Scene { scene, offset } => {
                Ok(SceneRenderer::new(&images[scene].pixels, &plan.scenes[scene])?.render(offset))
            }
            FrameSlot::Transition { transition, offset } => {
                let t = &plan.transitions[transition];
                let (a, b) = (&plan.scenes[transition], &plan.scenes[transition + 1]);
                let last_a = SceneRenderer::new(&images[transition].pixels, a)?
                    .render(a.frame_count.saturating_sub(1));
                let first_b = SceneRenderer::new(&images[transition + 1].pixels, b)?.render(0);
                transition_frame(&last_a, &first_b, offset, t.frame_count, t.kind)
            }
        }
    })
}

fn prepare_images<P: AsRef<Path>>(
    paths: &[P],
    cfg: &ResolvedConfig,
) -> ReelResult<(Vec<SceneImage>, Canvas)> {
    let images = load_scene_images(paths)?;
    let (images, canvas) = normalize_scene_images(images, cfg.target_size)?;
    Ok((grade_all(images, cfg.color_style), canvas))
}

fn grade_all(images: Vec<SceneImage>, style: Option<ColorStyle>) -> Vec<SceneImage> {
    let Some(style) = style else {
        return images;
    };
    images
        .into_par_iter()
        .map(|img| SceneImage {
            index: img.index,
            pixels: grade(&img.pixels, style),
        })
        .collect()
}

/// Push every frame of `plan`, returning how many were pushed.
fn stream_timeline(
    plan: &TimelinePlan,
    images: &[SceneImage],
    sink: &mut dyn FrameSink,
    observer: &mut dyn TimelineObserver,
) -> ReelResult<u64> {
    if images.len() != plan.scenes.len() {
        return Err(ReelError::configuration(format!(
            "timeline has {} scenes but {} images were loaded",
            plan.scenes.len(),
            images.len()
        )));
    }

    let mut next = FrameIndex(0);
    // Scene i+1's first frame, rendered for the transition into it.
    let mut carried_first: Option<Frame> = None;

    for (i, (scene, image)) in plan.scenes.iter().zip(images).enumerate() {
        let renderer = SceneRenderer::new(&image.pixels, scene)?;
        observer.scene_started(scene, next);

        let mut last: Option<Frame> = None;
        for f in 0..scene.frame_count {
            let frame = if f == 0
                && let Some(first) = carried_first.take()
            {
                first
            } else {
                renderer.render(f)
            };
            sink.push_frame(next, &frame)?;
            next = next.next();
            last = Some(frame);
        }

        let Some(transition) = plan.transitions.get(i) else {
            continue;
        };
        let last_a = last.ok_or_else(|| {
            ReelError::configuration(format!("scene {} has no frames", scene.index))
        })?;
        let first_b = SceneRenderer::new(&images[i + 1].pixels, &plan.scenes[i + 1])?.render(0);

        observer.transition_started(transition, next);
        for f in 0..transition.frame_count {
            let frame = transition_frame(
                &last_a,
                &first_b,
                f,
                transition.frame_count,
                transition.kind,
            )?;
            sink.push_frame(next, &frame)?;
            next = next.next();
        }
        carried_first = Some(first_b);
    }

    Ok(next.0)
}

/// Frame source for one scene.
enum SceneRenderer<'a> {
    KenBurns(KenBurns<'a>),
    Parallax(Parallax<'a>),
    Static(&'a Frame),
}

impl<'a> SceneRenderer<'a> {
    fn new(image: &'a Frame, scene: &ScenePlan) -> ReelResult<Self> {
        Ok(match scene.motion {
            SceneMotion::KenBurns(spec) => {
                Self::KenBurns(KenBurns::new(image, spec, scene.frame_count)?)
            }
            SceneMotion::Parallax { shift_px } => {
                Self::Parallax(Parallax::new(image, shift_px, scene.frame_count)?)
            }
            SceneMotion::Static => Self::Static(image),
        })
    }

    fn render(&self, i: u64) -> Frame {
        match self {
            Self::KenBurns(kb) => kb.render_frame(i),
            Self::Parallax(p) => p.render_frame(i),
            Self::Static(image) => (*image).clone(),
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assembler.rs"]
mod tests;
