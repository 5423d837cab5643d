use super::*;
use crate::foundation::core::Canvas;

#[test]
fn blur_radius_0_is_identity() {
    let src = FrameRGBA {
        width: 1,
        height: 2,
        data: vec![1u8, 2, 3, 4, 5, 6, 7, 8],
        premultiplied: true,
    };
    let out = gaussian_blur(&src, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let src = FrameRGBA::solid(Canvas::new(4, 3), [10, 20, 30, 255]);
    let out = gaussian_blur(&src, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let mut src = FrameRGBA::solid(Canvas::new(5, 5), [0, 0, 0, 0]);
    let center = ((2 * 5 + 2) * 4) as usize;
    src.data[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = gaussian_blur(&src, 2, 1.2).unwrap();

    let nonzero = out.data.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);

    let sum_a: u32 = out.data.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 4);
}

#[test]
fn blur_rejects_zero_sized_frames_and_bad_sigma() {
    let empty = FrameRGBA {
        width: 0,
        height: 0,
        data: Vec::new(),
        premultiplied: true,
    };
    assert!(gaussian_blur(&empty, 1, 1.0).is_err());

    let src = FrameRGBA::solid(Canvas::new(2, 2), [1, 1, 1, 255]);
    assert!(gaussian_blur(&src, 1, 0.0).is_err());
}

#[test]
fn default_sigma_matches_opencv_rule() {
    assert!((default_sigma(1) - 0.8).abs() < 1e-6);
    assert!((default_sigma(3) - 1.4).abs() < 1e-6);
}
