use std::path::PathBuf;

use super::*;
use crate::encode::sink::InMemorySink;
use crate::timeline::observer::NoopObserver;
use crate::timeline::plan::TransitionPlan;

fn write_fixtures(name: &str, sizes: &[(u32, u32)]) -> Vec<PathBuf> {
    let dir = PathBuf::from("target").join("unit_assembler").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| {
            let path = dir.join(format!("scene_{i}.png"));
            let img = Frame::from_fn(w, h, |x, y| {
                image::Rgb([(x * 7 + i as u32 * 60) as u8, (y * 5) as u8, 90])
            });
            img.save(&path).unwrap();
            path
        })
        .collect()
}

fn small_config() -> VideoConfig {
    VideoConfig {
        fps: 10,
        scene_duration: 0.4,
        transition_duration: 0.2,
        transition_type: "crossfade".to_string(),
        ..VideoConfig::default()
    }
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl TimelineObserver for Recorder {
    fn planned(&mut self, plan: &TimelinePlan) {
        self.events.push(format!("planned {}", plan.total_frames()));
    }
    fn scene_started(&mut self, scene: &ScenePlan, first: FrameIndex) {
        self.events.push(format!("scene {} @{}", scene.index, first.0));
    }
    fn transition_started(&mut self, t: &TransitionPlan, first: FrameIndex) {
        self.events.push(format!("transition {} @{}", t.from_scene, first.0));
    }
    fn finished(&mut self, stats: &RenderStats) {
        self.events.push(format!("finished {}", stats.frames_total));
    }
    fn aborted(&mut self, _err: &ReelError) {
        self.events.push("aborted".to_string());
    }
}

/// Accepts `limit` frames, then rejects everything.
struct FailingSink {
    inner: InMemorySink,
    limit: usize,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.inner.begin(cfg)
    }
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> ReelResult<()> {
        if self.inner.frames().len() >= self.limit {
            return Err(ReelError::encoding("disk full"));
        }
        self.inner.push_frame(idx, frame)
    }
    fn end(&mut self, status: EndStatus) -> ReelResult<()> {
        self.inner.end(status)
    }
}

#[test]
fn streams_scenes_and_transitions_in_order() {
    let paths = write_fixtures("order", &[(16, 12), (16, 12), (16, 12)]);
    let mut sink = InMemorySink::new();
    let mut rec = Recorder::default();

    let stats = render_video(&paths, &small_config(), &mut sink, &mut rec).unwrap();

    assert_eq!(stats.frames_total, 16);
    assert_eq!(stats.scene_frames, 12);
    assert_eq!(stats.transition_frames, 4);
    assert_eq!(stats.canvas, Canvas { width: 16, height: 12 });
    assert!((stats.duration_secs - 1.6).abs() < 1e-9);

    let indices: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(indices, (0..16).collect::<Vec<_>>());
    assert_eq!(sink.end_calls(), &[EndStatus::Completed]);
    assert_eq!(
        rec.events,
        vec![
            "planned 16",
            "scene 1 @0",
            "transition 1 @4",
            "scene 2 @6",
            "transition 2 @10",
            "scene 3 @12",
            "finished 16",
        ]
    );
}

#[test]
fn mixed_sizes_are_normalized_to_the_first() {
    let paths = write_fixtures("mixed", &[(20, 10), (40, 30)]);
    let mut sink = InMemorySink::new();
    render_video(&paths, &small_config(), &mut sink, &mut NoopObserver).unwrap();
    assert!(
        sink.frames()
            .iter()
            .all(|(_, f)| f.dimensions() == (20, 10))
    );
}

#[test]
fn configuration_errors_never_touch_the_sink() {
    let paths = vec![PathBuf::from("target/unit_assembler/does_not_exist.png")];
    let cfg = VideoConfig {
        color_style: "neon".to_string(),
        ..small_config()
    };
    let mut sink = InMemorySink::new();
    let mut rec = Recorder::default();
    let err = render_video(&paths, &cfg, &mut sink, &mut rec).unwrap_err();

    assert!(err.is_configuration());
    assert!(sink.config().is_none());
    assert!(sink.end_calls().is_empty());
    assert_eq!(rec.events, vec!["aborted"]);
}

#[test]
fn load_error_happens_before_begin() {
    let mut paths = write_fixtures("load", &[(8, 8)]);
    paths.push(PathBuf::from("target/unit_assembler/load/missing.png"));
    let mut sink = InMemorySink::new();
    let err = render_video(&paths, &small_config(), &mut sink, &mut NoopObserver).unwrap_err();

    assert!(err.is_load());
    assert!(err.to_string().contains("missing.png"));
    assert!(sink.config().is_none());
    assert!(sink.frames().is_empty());
}

#[test]
fn sink_failure_aborts_once() {
    let paths = write_fixtures("abort", &[(8, 8), (8, 8)]);
    let mut sink = FailingSink {
        inner: InMemorySink::new(),
        limit: 3,
    };
    let mut rec = Recorder::default();
    let err = render_video(&paths, &small_config(), &mut sink, &mut rec).unwrap_err();

    assert!(err.is_encoding());
    assert_eq!(sink.inner.frames().len(), 3);
    assert_eq!(sink.inner.end_calls(), &[EndStatus::Aborted]);
    assert_eq!(rec.events.last().map(String::as_str), Some("aborted"));
}

#[test]
fn zero_length_transitions_emit_nothing() {
    let paths = write_fixtures("cut", &[(8, 8), (8, 8)]);
    let cfg = VideoConfig {
        transition_duration: 0.0,
        ..small_config()
    };
    let mut sink = InMemorySink::new();
    let stats = render_video(&paths, &cfg, &mut sink, &mut NoopObserver).unwrap();
    assert_eq!(stats.frames_total, 8);
    assert_eq!(stats.transition_frames, 0);
}

#[test]
fn static_scenes_repeat_the_graded_image() {
    let paths = write_fixtures("static", &[(6, 6)]);
    let cfg = VideoConfig {
        use_ken_burns: false,
        use_color_grade: false,
        ..small_config()
    };
    let mut sink = InMemorySink::new();
    render_video(&paths, &cfg, &mut sink, &mut NoopObserver).unwrap();

    let source = image::open(&paths[0]).unwrap().to_rgb8();
    assert!(sink.frames().iter().all(|(_, f)| *f == source));
}

#[test]
fn single_frame_render_matches_the_stream() {
    let paths = write_fixtures("preview", &[(16, 12), (16, 12)]);
    let cfg = VideoConfig {
        transition_type: "zoom_blur".to_string(),
        ..small_config()
    };
    let mut sink = InMemorySink::new();
    render_video(&paths, &cfg, &mut sink, &mut NoopObserver).unwrap();

    for idx in [0u64, 3, 4, 5, 6, 9] {
        let frame = render_frame_at(&paths, &cfg, FrameIndex(idx)).unwrap();
        assert_eq!(frame, sink.frames()[idx as usize].1, "frame {idx}");
    }
    assert!(
        render_frame_at(&paths, &cfg, FrameIndex(10))
            .unwrap_err()
            .is_configuration()
    );
}

#[test]
fn render_to_mp4_writes_file_when_ffmpeg_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let paths = write_fixtures("mp4", &[(16, 12), (16, 12)]);
    let out = PathBuf::from("target").join("unit_assembler").join("mp4").join("out.mp4");
    let _ = std::fs::remove_file(&out);
    let cfg = VideoConfig {
        output_path: out.clone(),
        ..small_config()
    };
    let stats = render_to_mp4(&paths, &cfg).unwrap();
    assert_eq!(stats.frames_total, 10);
    assert!(out.exists());
}

#[test]
fn odd_canvas_fails_before_decoding() {
    let paths = write_fixtures("odd_canvas", &[(15, 12), (16, 12)]);
    let out = PathBuf::from("target").join("unit_assembler").join("odd_canvas").join("out.mp4");
    let _ = std::fs::remove_file(&out);
    let cfg = VideoConfig {
        output_path: out.clone(),
        ..small_config()
    };

    let err = check_mp4_canvas(&paths, &cfg).unwrap_err();
    assert!(err.is_encoding());
    assert!(err.to_string().contains("15x12"));
    assert!(err.to_string().contains("--size"));

    let err = render_to_mp4(&paths, &cfg).unwrap_err();
    assert!(err.is_encoding());
    assert!(!out.exists());

    let even = VideoConfig {
        target_size: Some(Canvas {
            width: 16,
            height: 12,
        }),
        ..cfg.clone()
    };
    check_mp4_canvas(&paths, &even).unwrap();

    let odd = VideoConfig {
        target_size: Some(Canvas {
            width: 16,
            height: 11,
        }),
        ..cfg
    };
    assert!(check_mp4_canvas(&paths, &odd).unwrap_err().is_encoding());
}

#[test]
fn canvas_check_reports_unreadable_first_image() {
    let missing = [PathBuf::from("target/unit_assembler/does_not_exist.png")];
    let err = check_mp4_canvas(&missing, &small_config()).unwrap_err();
    assert!(err.is_load());
}
