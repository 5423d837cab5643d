use super::*;
use crate::foundation::core::Canvas;

fn frame(px: [u8; 4], premultiplied: bool) -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: px.to_vec(),
        premultiplied,
    }
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let mut dst = vec![0u8; 4];
    flatten_over_bg(&mut dst, &frame([0, 0, 0, 0], true), [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_opaque_is_identity() {
    let mut dst = vec![0u8; 4];
    flatten_over_bg(&mut dst, &frame([1, 2, 3, 255], true), [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255]);
}

#[test]
fn flatten_straight_alpha_over_black() {
    let mut dst = vec![0u8; 4];
    flatten_over_bg(&mut dst, &frame([255, 0, 0, 128], false), [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_rejects_size_mismatch() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_over_bg(&mut dst, &frame([0, 0, 0, 255], true), [0, 0, 0, 255]).is_err());
}

#[test]
fn odd_canvas_is_rejected_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
        dir.path().join("out.mp4"),
        Encoding::default(),
    ));
    let cfg = SinkConfig {
        canvas: Canvas::new(15, 10),
        fps: Fps::whole(24).unwrap(),
        audio: None,
    };
    assert!(sink.begin(cfg).is_err());
    assert!(!dir.path().join("out.mp4").exists());
}

#[test]
fn existing_output_is_kept_without_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mp4");
    std::fs::write(&out, b"keep").unwrap();
    let encoding = Encoding {
        overwrite: false,
        ..Encoding::default()
    };
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out, encoding));
    let cfg = SinkConfig {
        canvas: Canvas::new(16, 16),
        fps: Fps::whole(24).unwrap(),
        audio: None,
    };
    assert!(sink.begin(cfg).is_err());
    assert_eq!(std::fs::read(&out).unwrap(), b"keep");
}

#[test]
fn parent_dir_of_bare_file_name_is_cwd() {
    assert_eq!(ensure_parent_dir(Path::new("out.mp4")).unwrap(), PathBuf::from("."));
}

#[test]
fn dropped_sink_publishes_nothing() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mp4");
    {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out, Encoding::default()));
        sink.begin(SinkConfig {
            canvas: Canvas::new(16, 16),
            fps: Fps::whole(10).unwrap(),
            audio: None,
        })
        .unwrap();
        let f = FrameRGBA::solid(Canvas::new(16, 16), [10, 20, 30, 255]);
        sink.push_frame(FrameIndex(0), &f).unwrap();
    }
    assert!(!out.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
