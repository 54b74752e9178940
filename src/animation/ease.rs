/// Easing functions used to map normalized segment progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// `t^2 (3 - 2t)`: zero velocity at both ends.
    Smoothstep,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Raw progress of frame `i` within a segment of `count` frames: `i / (count - 1)`.
///
/// Segments of zero or one frame have no span to divide by and report `single` instead.
pub fn segment_progress(i: u64, count: u64, single: f64) -> f64 {
    if count <= 1 {
        return single;
    }
    (i as f64) / ((count - 1) as f64)
}

/// Smoothstep-eased progress of frame `i` in a `count`-frame segment.
pub fn eased_progress(i: u64, count: u64, single: f64) -> f64 {
    Ease::Smoothstep.apply(segment_progress(i, count, single))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
