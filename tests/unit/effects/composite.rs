use super::*;
use crate::foundation::core::Canvas;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn crossfade_t_0_is_a_and_t_1_is_b() {
    let a = [10, 20, 30, 40];
    let b = [200, 210, 220, 230];
    assert_eq!(crossfade(a, b, 0.0), a);
    assert_eq!(crossfade(a, b, 1.0), b);
}

#[test]
fn crossfade_frames_midpoint() {
    let a = FrameRGBA::solid(Canvas::new(2, 2), [0, 0, 0, 255]);
    let b = FrameRGBA::solid(Canvas::new(2, 2), [200, 100, 50, 255]);
    let mid = crossfade_frames(&a, &b, 0.5).unwrap();
    assert_eq!(mid.pixel(0, 0), [100, 50, 25, 255]);
}

#[test]
fn crossfade_frames_rejects_size_mismatch() {
    let a = FrameRGBA::solid(Canvas::new(2, 2), [0, 0, 0, 255]);
    let b = FrameRGBA::solid(Canvas::new(4, 2), [0, 0, 0, 255]);
    assert!(crossfade_frames(&a, &b, 0.5).is_err());
}

#[test]
fn blit_over_clips_to_destination() {
    let mut dst = FrameRGBA::solid(Canvas::new(3, 3), [0, 0, 0, 255]);
    let sprite = FrameRGBA::solid(Canvas::new(2, 2), [255, 255, 255, 255]);
    blit_over(&mut dst, &sprite, 2, 2, 1.0);
    assert_eq!(dst.pixel(2, 2), [255, 255, 255, 255]);
    assert_eq!(dst.pixel(1, 1), [0, 0, 0, 255]);

    blit_over(&mut dst, &sprite, -1, -1, 1.0);
    assert_eq!(dst.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(dst.pixel(1, 0), [0, 0, 0, 255]);
}
