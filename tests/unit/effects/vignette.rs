use super::*;
use crate::foundation::core::Canvas;

#[test]
fn center_is_untouched_and_corners_darken() {
    let src = FrameRGBA::solid(Canvas::new(5, 5), [200, 200, 200, 255]);
    let out = apply_vignette(&src, 0.3).unwrap();
    assert_eq!(out.pixel(2, 2), [200, 200, 200, 255]);

    // Corner radius is sqrt(2): mask = 1 - 0.3 * 1.414 = 0.5757.
    let corner = out.pixel(0, 0);
    assert_eq!(corner[0], 115);
    assert_eq!(corner[3], 255);
    assert!(out.pixel(1, 2)[0] > corner[0]);
}

#[test]
fn mask_never_goes_negative() {
    let src = FrameRGBA::solid(Canvas::new(3, 3), [255, 255, 255, 255]);
    let out = apply_vignette(&src, 5.0).unwrap();
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
}

#[test]
fn single_pixel_and_zero_sized_frames() {
    let one = FrameRGBA::solid(Canvas::new(1, 1), [50, 60, 70, 255]);
    assert_eq!(apply_vignette(&one, 0.3).unwrap(), one);

    let empty = FrameRGBA {
        width: 4,
        height: 0,
        data: Vec::new(),
        premultiplied: true,
    };
    assert!(apply_vignette(&empty, 0.3).is_err());
}
