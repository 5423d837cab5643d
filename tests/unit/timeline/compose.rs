use std::path::Path;

use super::*;
use crate::assets::media::AudioSource;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Canvas;

fn write_png(dir: &Path, name: &str, rgba: [u8; 4]) -> PathBuf {
    let path = dir.join(name);
    image::RgbaImage::from_pixel(24, 16, image::Rgba(rgba))
        .save(&path)
        .unwrap();
    path
}

fn tone(secs: f64, level: f32) -> AudioSource {
    let frames = (secs * 48_000.0).round() as usize;
    AudioSource::Pcm(AudioTrack::new(48_000, 2, vec![level; frames * 2]).unwrap())
}

fn config() -> VideoConfig {
    VideoConfig {
        resolution: Canvas::new(16, 10),
        fps: 10,
        subtitles: false,
        ..VideoConfig::default()
    }
}

#[test]
fn empty_scene_list_is_rejected() {
    let composer = Composer::new(config()).unwrap();
    assert!(composer.build_master(&[]).is_err());
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = config();
    cfg.resolution = Canvas::new(15, 10);
    assert!(Composer::new(cfg).is_err());
}

#[test]
fn scene_audio_failure_is_fatal_and_attributed() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "a.png", [9, 9, 9, 255]);
    let scenes = vec![SceneRecord::new(
        img,
        AudioSource::File(dir.path().join("missing.wav")),
        1.0,
    )];
    let err = Composer::new(config())
        .unwrap()
        .build_master(&scenes)
        .unwrap_err();
    assert_eq!(err.scene(), Some(1));
    assert_eq!(err.stage(), Some(Stage::SceneAudio));
}

#[test]
fn missing_fonts_degrade_subtitles() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "a.png", [9, 9, 9, 255]);
    let scenes = vec![SceneRecord::new(img, tone(1.0, 0.1), 1.0).with_text("hi there")];
    let mut cfg = config();
    cfg.subtitles = true;
    let composer = Composer::new(cfg).unwrap().with_fonts(FontBook::empty());
    let (master, report) = composer.build_master(&scenes).unwrap();
    assert_eq!(master.frames(), 10);
    assert_eq!(report.degradations.len(), 1);
    assert_eq!(report.degradations[0].stage, Stage::Subtitle);
    assert_eq!(report.degradations[0].scene, Some(1));
    assert_eq!(report.scenes[0].subtitle_words, 0);
}

#[test]
fn transitions_follow_the_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let scenes: Vec<SceneRecord> = (0..4)
        .map(|i| {
            let img = write_png(dir.path(), &format!("{i}.png"), [i * 50, 0, 0, 255]);
            SceneRecord::new(img, tone(2.0, 0.0), 2.0)
        })
        .collect();
    let (master, report) = Composer::new(config())
        .unwrap()
        .build_master(&scenes)
        .unwrap();
    let kinds: Vec<_> = report.transitions.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            Some(TransitionKind::Fade),
            Some(TransitionKind::Wipe),
            Some(TransitionKind::Zoom)
        ]
    );
    // Each boundary is capped at a quarter of a 2 s scene: 5 frames.
    assert!(report.transitions.iter().all(|t| t.frames == 5));
    assert_eq!(master.frames(), 80 - 15);
    assert!(!report.is_degraded());
}

#[test]
fn background_failure_keeps_narration() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "a.png", [9, 9, 9, 255]);
    let mut cfg = config();
    cfg.background_audio = Some(AudioSource::File(dir.path().join("nope.mp3")));
    let scenes = vec![SceneRecord::new(img, tone(1.0, 0.25), 1.0)];
    let (master, report) = Composer::new(cfg).unwrap().build_master(&scenes).unwrap();
    assert!(!report.background_audio);
    assert_eq!(report.degradations[0].stage, Stage::BackgroundAudio);
    assert_eq!(report.degradations[0].scene, None);
    let audio = master.audio().unwrap();
    assert_eq!(audio.len_frames(), 48_000);
    assert!(audio.interleaved.iter().all(|&s| s == 0.25));
}

#[test]
fn compose_into_streams_every_frame_with_audio() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_png(dir.path(), "a.png", [9, 9, 9, 255]);
    let scenes = vec![SceneRecord::new(img, tone(0.5, 0.5), 1.2)];
    let mut sink = InMemorySink::new();
    let report = Composer::new(config())
        .unwrap()
        .compose_into(&scenes, &mut sink)
        .unwrap();
    assert_eq!(report.frames, 12);
    assert!(sink.is_finished());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (0..12).collect::<Vec<_>>());
    // Narration padded with silence to the clip length.
    let audio = sink.audio().unwrap();
    assert_eq!(audio.len(), 57_600 * 2);
    assert_eq!(audio[0], 0.5);
    assert_eq!(audio[audio.len() - 1], 0.0);
}
