use crate::foundation::core::{Fps, Frame, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// How a run ended, passed to [`FrameSink::end`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndStatus {
    /// Every frame was pushed; the output should be finalized.
    Completed,
    /// The run failed part-way; partial output must be discarded.
    Aborted,
}

/// Sink contract for consuming frames in presentation order.
///
/// - `begin` is called once before any frame.
/// - `push_frame` is called with strictly increasing, gap-free `FrameIndex` values starting at 0.
/// - `end` is called exactly once after a successful `begin`, on success and failure alike.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> ReelResult<()>;
    /// Finalize (on [`EndStatus::Completed`]) or discard (on [`EndStatus::Aborted`]) the output.
    fn end(&mut self, status: EndStatus) -> ReelResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Frame)>,
    end_calls: Vec<EndStatus>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, Frame)] {
        &self.frames
    }

    /// Every status `end` was called with, in order.
    pub fn end_calls(&self) -> &[EndStatus] {
        &self.end_calls
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.end_calls.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> ReelResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| ReelError::encoding("in-memory sink not started"))?;
        check_frame_size(&cfg, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self, status: EndStatus) -> ReelResult<()> {
        self.end_calls.push(status);
        Ok(())
    }
}

/// Sink that keeps a single frame of interest and drops the rest.
#[derive(Debug)]
pub struct FrameCaptureSink {
    target: FrameIndex,
    captured: Option<Frame>,
    seen: u64,
}

impl FrameCaptureSink {
    /// Capture the frame at `target`.
    pub fn new(target: FrameIndex) -> Self {
        Self {
            target,
            captured: None,
            seen: 0,
        }
    }

    /// Number of frames pushed so far.
    pub fn frames_seen(&self) -> u64 {
        self.seen
    }

    /// Take the captured frame, if the stream reached `target`.
    pub fn into_frame(self) -> Option<Frame> {
        self.captured
    }
}

impl FrameSink for FrameCaptureSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ReelResult<()> {
        self.captured = None;
        self.seen = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> ReelResult<()> {
        self.seen += 1;
        if idx == self.target {
            self.captured = Some(frame.clone());
        }
        Ok(())
    }

    fn end(&mut self, status: EndStatus) -> ReelResult<()> {
        if status == EndStatus::Aborted {
            self.captured = None;
        }
        Ok(())
    }
}

pub(crate) fn check_frame_size(cfg: &SinkConfig, frame: &Frame) -> ReelResult<()> {
    if frame.width() != cfg.width || frame.height() != cfg.height {
        return Err(ReelError::encoding(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width(),
            frame.height(),
            cfg.width,
            cfg.height
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
