use super::*;

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![1, 2, 3, 255],
        premultiplied: true,
    }
}

#[test]
fn in_memory_sink_records_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.push_frame(frame(), 40).unwrap();
    sink.push_frame(frame(), 90).unwrap();

    let durations: Vec<u32> = sink.frames().iter().map(|f| f.duration_ms).collect();
    assert_eq!(durations, vec![40, 90]);
    assert!(!sink.is_finished());

    assert!(sink.finish().unwrap().is_empty());
    assert!(sink.is_finished());
}

#[test]
fn in_memory_sink_rejects_use_after_finish() {
    let mut sink = InMemorySink::new();
    sink.finish().unwrap();
    assert!(matches!(
        sink.push_frame(frame(), 40).unwrap_err(),
        ReelError::EncoderClosed(_)
    ));
    assert!(matches!(
        sink.finish().unwrap_err(),
        ReelError::EncoderClosed(_)
    ));
}
