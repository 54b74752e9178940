use crate::effects::motion::MotionSpec;
use crate::effects::transitions::TransitionKind;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::Rng64;
use crate::timeline::config::{MotionMode, MotionPolicy, ResolvedConfig};

/// Upper bound on the frames one render may emit (about 8 days at 24 fps).
pub const MAX_TIMELINE_FRAMES: u64 = 1 << 24;

/// Motion assigned to one scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SceneMotion {
    /// Zoom/pan.
    KenBurns(MotionSpec),
    /// Depth-proxy parallax with the given peak shift.
    Parallax {
        /// Peak shift in pixels.
        shift_px: f64,
    },
    /// Unchanged copies of the image.
    Static,
}

impl std::fmt::Display for SceneMotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KenBurns(spec) => write!(f, "ken_burns {spec}"),
            Self::Parallax { shift_px } => write!(f, "parallax shift={shift_px:.1}px"),
            Self::Static => f.write_str("static"),
        }
    }
}

/// One scene of the timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePlan {
    /// 1-based scene index.
    pub index: usize,
    /// Motion for this scene.
    pub motion: SceneMotion,
    /// Frames emitted for the scene itself.
    pub frame_count: u64,
}

/// The bridge between scene `from_scene` and the scene after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionPlan {
    /// 1-based index of the outgoing scene.
    pub from_scene: usize,
    /// Transition kind.
    pub kind: TransitionKind,
    /// Frames emitted between the scenes (may be 0).
    pub frame_count: u64,
}

/// Where an absolute frame index falls in a [`TimelinePlan`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameSlot {
    /// Frame `offset` of `scenes[scene]`.
    Scene {
        /// 0-based position in [`TimelinePlan::scenes`].
        scene: usize,
        /// Frame within the scene.
        offset: u64,
    },
    /// Frame `offset` of `transitions[transition]`.
    Transition {
        /// 0-based position in [`TimelinePlan::transitions`].
        transition: usize,
        /// Frame within the transition.
        offset: u64,
    },
}

/// Complete frame layout of a render, computed before any image is decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelinePlan {
    /// Output frame rate.
    pub fps: Fps,
    /// Scenes in order.
    pub scenes: Vec<ScenePlan>,
    /// `scenes.len() - 1` transitions, in order.
    pub transitions: Vec<TransitionPlan>,
}

impl TimelinePlan {
    /// Sum of all scene frames.
    pub fn scene_frames(&self) -> u64 {
        self.scenes
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.frame_count))
    }

    /// Sum of all transition frames.
    pub fn transition_frames(&self) -> u64 {
        self.transitions
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.frame_count))
    }

    /// Total frames the render will emit.
    pub fn total_frames(&self) -> u64 {
        self.scene_frames().saturating_add(self.transition_frames())
    }

    /// Output duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.total_frames())
    }

    /// Locate `idx` in presentation order. `None` past the last frame.
    pub fn locate(&self, idx: FrameIndex) -> Option<FrameSlot> {
        let mut remaining = idx.0;
        for (i, scene) in self.scenes.iter().enumerate() {
            if remaining < scene.frame_count {
                return Some(FrameSlot::Scene {
                    scene: i,
                    offset: remaining,
                });
            }
            remaining -= scene.frame_count;

            if let Some(transition) = self.transitions.get(i) {
                if remaining < transition.frame_count {
                    return Some(FrameSlot::Transition {
                        transition: i,
                        offset: remaining,
                    });
                }
                remaining -= transition.frame_count;
            }
        }
        None
    }
}

/// Lay out `scene_count` scenes: choose every scene's motion and count every frame.
///
/// Fails when the timeline would exceed [`MAX_TIMELINE_FRAMES`].
pub fn plan_timeline(cfg: &ResolvedConfig, scene_count: usize) -> ReelResult<TimelinePlan> {
    if scene_count == 0 {
        return Err(ReelError::configuration("nothing to render: no input images"));
    }
    check_total_frames(cfg, scene_count)?;

    let motions = scene_motions(&cfg.motion, scene_count)?;
    let scenes = motions
        .into_iter()
        .enumerate()
        .map(|(i, motion)| ScenePlan {
            index: i + 1,
            motion,
            frame_count: cfg.scene_frame_count,
        })
        .collect();
    let transitions = (1..scene_count)
        .map(|from_scene| TransitionPlan {
            from_scene,
            kind: cfg.transition,
            frame_count: cfg.transition_frame_count,
        })
        .collect();

    Ok(TimelinePlan {
        fps: cfg.fps,
        scenes,
        transitions,
    })
}

fn check_total_frames(cfg: &ResolvedConfig, scene_count: usize) -> ReelResult<()> {
    let scenes = scene_count as u64;
    let total = cfg
        .scene_frame_count
        .checked_mul(scenes)
        .and_then(|s| {
            cfg.transition_frame_count
                .checked_mul(scenes - 1)
                .and_then(|t| s.checked_add(t))
        })
        .filter(|&total| total <= MAX_TIMELINE_FRAMES);
    match total {
        Some(_) => Ok(()),
        None => Err(ReelError::configuration(format!(
            "{scene_count} scenes of {} frames with {}-frame transitions exceed the \
             {MAX_TIMELINE_FRAMES}-frame limit",
            cfg.scene_frame_count, cfg.transition_frame_count
        ))),
    }
}

fn scene_motions(mode: &MotionMode, scene_count: usize) -> ReelResult<Vec<SceneMotion>> {
    match mode {
        MotionMode::Static => Ok(vec![SceneMotion::Static; scene_count]),
        MotionMode::Parallax { shift_px } => Ok(vec![
            SceneMotion::Parallax {
                shift_px: *shift_px
            };
            scene_count
        ]),
        MotionMode::KenBurns {
            policy,
            zoom_amount,
        } => {
            let specs: Vec<MotionSpec> = match policy {
                MotionPolicy::Seeded { seed } => {
                    let catalog = MotionSpec::catalog(*zoom_amount);
                    let mut rng = Rng64::new(*seed);
                    (0..scene_count)
                        .map(|_| catalog[rng.next_index(catalog.len())])
                        .collect()
                }
                MotionPolicy::Fixed(spec) => vec![*spec; scene_count],
                MotionPolicy::PerScene(specs) => {
                    if specs.len() != scene_count {
                        return Err(ReelError::configuration(format!(
                            "per-scene motion lists {} entries for {} scenes",
                            specs.len(),
                            scene_count
                        )));
                    }
                    specs.clone()
                }
            };
            Ok(specs.into_iter().map(SceneMotion::KenBurns).collect())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/plan.rs"]
mod tests;
