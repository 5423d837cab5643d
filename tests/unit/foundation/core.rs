use super::*;

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_conversions() {
    let fps = Fps::whole(24).unwrap();
    assert_eq!(fps.secs_to_frames_round(2.5), 60);
    assert_eq!(fps.secs_to_frames_round(0.99), 24);
    assert!((fps.frames_to_secs(48) - 2.0).abs() < 1e-12);

    let ntsc = Fps::new(30_000, 1001).unwrap();
    assert_eq!(ntsc.secs_to_frames_round(1.001), 30);
}

#[test]
fn frame_validate_catches_zero_and_mismatch() {
    let ok = FrameRGBA::solid(Canvas::new(2, 2), [1, 2, 3, 255]);
    ok.validate().unwrap();
    assert_eq!(ok.pixel(1, 1), [1, 2, 3, 255]);

    let zero = FrameRGBA {
        width: 0,
        height: 4,
        data: Vec::new(),
        premultiplied: false,
    };
    assert!(zero.validate().is_err());

    let short = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 3],
        premultiplied: false,
    };
    assert!(short.validate().is_err());
}
