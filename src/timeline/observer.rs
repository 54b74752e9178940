use crate::foundation::core::FrameIndex;
use crate::foundation::error::ReelError;
use crate::timeline::assembler::RenderStats;
use crate::timeline::plan::{ScenePlan, TimelinePlan, TransitionPlan};

/// Progress callbacks for a render run. Every method defaults to a no-op.
pub trait TimelineObserver: Send {
    /// The timeline was planned; called once before any image is decoded.
    fn planned(&mut self, _plan: &TimelinePlan) {}
    /// A scene is about to emit its first frame at `first`.
    fn scene_started(&mut self, _scene: &ScenePlan, _first: FrameIndex) {}
    /// A transition is about to emit its first frame at `first`.
    fn transition_started(&mut self, _transition: &TransitionPlan, _first: FrameIndex) {}
    /// Every frame was accepted and the sink finalized.
    fn finished(&mut self, _stats: &RenderStats) {}
    /// The run failed; nothing it produced is valid.
    fn aborted(&mut self, _err: &ReelError) {}
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl TimelineObserver for NoopObserver {}

/// Observer that forwards progress to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl TimelineObserver for TracingObserver {
    fn planned(&mut self, plan: &TimelinePlan) {
        tracing::info!(
            scenes = plan.scenes.len(),
            transitions = plan.transitions.len(),
            frames = plan.total_frames(),
            fps = plan.fps.as_f64(),
            "timeline planned"
        );
        for scene in &plan.scenes {
            tracing::debug!(
                scene = scene.index,
                frames = scene.frame_count,
                motion = %scene.motion,
                "scene motion"
            );
        }
    }

    fn scene_started(&mut self, scene: &ScenePlan, first: FrameIndex) {
        tracing::info!(
            scene = scene.index,
            first_frame = first.0,
            frames = scene.frame_count,
            "scene"
        );
    }

    fn transition_started(&mut self, transition: &TransitionPlan, first: FrameIndex) {
        tracing::info!(
            from = transition.from_scene,
            to = transition.from_scene + 1,
            kind = %transition.kind,
            first_frame = first.0,
            frames = transition.frame_count,
            "transition"
        );
    }

    fn finished(&mut self, stats: &RenderStats) {
        tracing::info!(
            frames = stats.frames_total,
            canvas = %stats.canvas,
            duration_secs = stats.duration_secs,
            "render finished"
        );
    }

    fn aborted(&mut self, err: &ReelError) {
        tracing::error!(error = %err, "render aborted");
    }
}
