use super::*;
use crate::foundation::core::Canvas;

#[test]
fn grain_is_deterministic_per_seed() {
    let src = FrameRGBA::solid(Canvas::new(8, 8), [128, 128, 128, 255]);
    let a = apply_film_grain(&src, 0.05, 42).unwrap();
    let b = apply_film_grain(&src, 0.05, 42).unwrap();
    let c = apply_film_grain(&src, 0.05, 43).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn grain_keeps_alpha_and_stays_near_source() {
    let src = FrameRGBA::solid(Canvas::new(32, 32), [128, 128, 128, 255]);
    let out = apply_film_grain(&src, 0.05, 1).unwrap();
    let mut sum = 0.0f64;
    for px in out.data.chunks_exact(4) {
        assert_eq!(px[3], 255);
        for &c in &px[..3] {
            // 0.05 * 255 ~ 12.75 sigma; six sigma is a generous bound.
            assert!((i32::from(c) - 128).abs() <= 77);
            sum += f64::from(c) - 128.0;
        }
    }
    let mean = sum / (32.0 * 32.0 * 3.0);
    assert!(mean.abs() < 2.0, "mean drift {mean}");
}

#[test]
fn zero_intensity_is_identity() {
    let src = FrameRGBA::solid(Canvas::new(3, 3), [10, 20, 30, 255]);
    assert_eq!(apply_film_grain(&src, 0.0, 9).unwrap(), src);
}

#[test]
fn zero_sized_frame_fails_fast() {
    let src = FrameRGBA {
        width: 0,
        height: 3,
        data: Vec::new(),
        premultiplied: true,
    };
    assert!(apply_film_grain(&src, 0.05, 1).is_err());
}
