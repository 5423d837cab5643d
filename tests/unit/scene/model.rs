use super::*;

#[test]
fn defaults_validate() {
    let cfg = VideoConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.resolution, Canvas::new(1920, 1080));
    assert_eq!(cfg.fps, 24);
    assert_eq!(cfg.encoding.video_bitrate, "5000k");
}

#[test]
fn odd_or_zero_resolution_is_rejected() {
    let mut cfg = VideoConfig::default();
    cfg.resolution = Canvas::new(641, 480);
    assert!(cfg.validate().is_err());
    cfg.resolution = Canvas::new(0, 480);
    assert!(cfg.validate().is_err());
    cfg.resolution = Canvas::new(640, 480);
    cfg.fps = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn transition_fraction_bounds() {
    let mut t = Tuning::default();
    t.max_transition_fraction = 0.5;
    t.validate().unwrap();
    t.max_transition_fraction = 0.75;
    assert!(t.validate().is_err());
    t.max_transition_fraction = 0.25;
    t.transition_rotation.clear();
    assert!(t.validate().is_err());
}

#[test]
fn rotation_cycles_by_position() {
    let t = Tuning::default();
    assert_eq!(t.transition_for(1), TransitionKind::Fade);
    assert_eq!(t.transition_for(4), TransitionKind::Dissolve);
    assert_eq!(t.transition_for(7), TransitionKind::Zoom);
}

#[test]
fn frames_for_rounds_with_minimum_one() {
    let cfg = VideoConfig {
        fps: 10,
        ..VideoConfig::default()
    };
    assert_eq!(cfg.frames_for(2.54).unwrap(), 25);
    assert_eq!(cfg.frames_for(0.01).unwrap(), 1);
}

#[test]
fn scene_duration_must_be_positive() {
    let src = AudioSource::File(PathBuf::from("a.wav"));
    assert!(SceneRecord::new("a.png", src.clone(), 0.0).validate().is_err());
    assert!(SceneRecord::new("a.png", src.clone(), f64::NAN).validate().is_err());
    SceneRecord::new("a.png", src, 1.5).validate().unwrap();
}

#[test]
fn job_json_parses_with_defaults() {
    let json = r#"{
        "image_path": "img/1.png",
        "audio": "voice/1.wav",
        "duration": 2.5,
        "narration_text": "hello there",
        "camera": "pan"
    }"#;
    let rec: SceneRecord = serde_json::from_str(json).unwrap();
    assert_eq!(rec.camera, Some(CameraMove::Pan));
    assert_eq!(rec.style_tag, None);

    let rec = rec.resolved_against(Path::new("/job"));
    assert_eq!(rec.image_path, PathBuf::from("/job/img/1.png"));
    assert_eq!(rec.audio, AudioSource::File(PathBuf::from("/job/voice/1.wav")));

    let cfg: VideoConfig =
        serde_json::from_str(r#"{ "fps": 30, "tuning": { "seed": 7 } }"#).unwrap();
    assert_eq!(cfg.fps, 30);
    assert_eq!(cfg.tuning.seed, 7);
    assert_eq!(cfg.tuning.transition_secs, 1.0);
}
