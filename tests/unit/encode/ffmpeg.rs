use super::*;

fn cfg(width: u32, height: u32, fps: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps { num: fps, den: 1 },
    }
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(validate_sink_config(&cfg(0, 10, 30)).is_err());
    assert!(validate_sink_config(&cfg(11, 10, 30)).is_err());
    assert!(validate_sink_config(&cfg(10, 7, 30)).is_err());
    assert!(validate_sink_config(&cfg(10, 10, 0)).is_err());
    assert!(validate_sink_config(&cfg(10, 10, 24)).is_ok());
}

#[test]
fn odd_size_is_an_encoding_error() {
    let err = validate_sink_config(&cfg(101, 100, 10)).unwrap_err();
    assert!(err.is_encoding());
    assert!(err.to_string().contains("101x100"));
}

#[test]
fn push_before_begin_is_rejected() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/unit_ffmpeg/never.mp4"));
    let err = sink
        .push_frame(FrameIndex(0), &Frame::new(2, 2))
        .unwrap_err();
    assert!(err.is_encoding());
}

#[test]
fn ensure_parent_dir_creates_missing_directories() {
    let dir = PathBuf::from("target").join("unit_ffmpeg").join("nested");
    let _ = std::fs::remove_dir_all(&dir);
    ensure_parent_dir(&dir.join("out.mp4")).unwrap();
    assert!(dir.is_dir());
    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
}

#[test]
fn encodes_short_clip_when_ffmpeg_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let out = PathBuf::from("target").join("unit_ffmpeg").join("clip.mp4");
    let _ = std::fs::remove_file(&out);

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    sink.begin(cfg(16, 16, 10)).unwrap();
    for i in 0..5u8 {
        let frame = Frame::from_pixel(16, 16, image::Rgb([i * 40, 0, 0]));
        sink.push_frame(FrameIndex(u64::from(i)), &frame).unwrap();
    }
    sink.end(EndStatus::Completed).unwrap();
    assert!(out.exists());
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn abort_removes_partial_output_when_ffmpeg_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let out = PathBuf::from("target").join("unit_ffmpeg").join("aborted.mp4");
    let _ = std::fs::remove_file(&out);

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    sink.begin(cfg(16, 16, 10)).unwrap();
    sink.push_frame(FrameIndex(0), &Frame::new(16, 16)).unwrap();
    sink.end(EndStatus::Aborted).unwrap();
    assert!(!out.exists());
}
