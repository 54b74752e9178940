use super::*;

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        fps: Fps::integer(10).unwrap(),
    }
}

#[test]
fn in_memory_sink_records_frames_and_end() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(4, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &Frame::new(4, 2)).unwrap();
    sink.push_frame(FrameIndex(1), &Frame::new(4, 2)).unwrap();
    sink.end(EndStatus::Completed).unwrap();

    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(1));
    assert_eq!(sink.end_calls(), &[EndStatus::Completed]);
    assert_eq!(sink.config().unwrap().width, 4);
}

#[test]
fn in_memory_sink_rejects_wrong_size() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(4, 2)).unwrap();
    let err = sink
        .push_frame(FrameIndex(0), &Frame::new(2, 4))
        .unwrap_err();
    assert!(err.is_encoding());
}

#[test]
fn in_memory_sink_requires_begin() {
    let mut sink = InMemorySink::new();
    assert!(
        sink.push_frame(FrameIndex(0), &Frame::new(1, 1))
            .unwrap_err()
            .is_encoding()
    );
}

#[test]
fn capture_sink_keeps_only_target() {
    let mut sink = FrameCaptureSink::new(FrameIndex(2));
    sink.begin(cfg(1, 1)).unwrap();
    for i in 0..5u8 {
        let frame = Frame::from_pixel(1, 1, image::Rgb([i, i, i]));
        sink.push_frame(FrameIndex(u64::from(i)), &frame).unwrap();
    }
    sink.end(EndStatus::Completed).unwrap();
    assert_eq!(sink.frames_seen(), 5);
    assert_eq!(sink.into_frame().unwrap().get_pixel(0, 0).0, [2, 2, 2]);
}

#[test]
fn capture_sink_discards_on_abort() {
    let mut sink = FrameCaptureSink::new(FrameIndex(0));
    sink.begin(cfg(1, 1)).unwrap();
    sink.push_frame(FrameIndex(0), &Frame::new(1, 1)).unwrap();
    sink.end(EndStatus::Aborted).unwrap();
    assert!(sink.into_frame().is_none());
}
