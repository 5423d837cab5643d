use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Source-over of a premultiplied `src` pixel scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Linear blend `a * (1 - t) + b * t` on all four channels.
pub fn crossfade(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let t = t.clamp(0.0, 1.0);
    let tt = ((t * 255.0).round() as i32).clamp(0, 255) as u16;
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255_u8(u16::from(a[i]), it);
        let bv = mul_div255_u8(u16::from(b[i]), tt);
        out[i] = av.saturating_add(bv);
    }
    out
}

fn check_same_size(a: &FrameRGBA, b: &FrameRGBA, what: &str) -> ReelResult<()> {
    a.validate()?;
    b.validate()?;
    if a.width != b.width || a.height != b.height {
        return Err(ReelError::validation(format!(
            "{what} expects equal frame sizes, got {}x{} and {}x{}",
            a.width, a.height, b.width, b.height
        )));
    }
    Ok(())
}

/// Blend two whole frames; `t = 0` yields `a`, `t = 1` yields `b`.
pub fn crossfade_frames(a: &FrameRGBA, b: &FrameRGBA, t: f32) -> ReelResult<FrameRGBA> {
    check_same_size(a, b, "crossfade_frames")?;
    let data = a
        .data
        .chunks_exact(4)
        .zip(b.data.chunks_exact(4))
        .flat_map(|(pa, pb)| crossfade([pa[0], pa[1], pa[2], pa[3]], [pb[0], pb[1], pb[2], pb[3]], t))
        .collect();
    Ok(FrameRGBA {
        width: a.width,
        height: a.height,
        data,
        premultiplied: a.premultiplied && b.premultiplied,
    })
}

/// Place a `sprite` (premultiplied) onto `dst` with its top-left corner at (`x`, `y`).
///
/// Parts of the sprite outside `dst` are clipped.
pub fn blit_over(dst: &mut FrameRGBA, sprite: &FrameRGBA, x: i64, y: i64, opacity: f32) {
    let dw = i64::from(dst.width);
    let dh = i64::from(dst.height);
    for sy in 0..i64::from(sprite.height) {
        let ty = y + sy;
        if ty < 0 || ty >= dh {
            continue;
        }
        for sx in 0..i64::from(sprite.width) {
            let tx = x + sx;
            if tx < 0 || tx >= dw {
                continue;
            }
            let si = ((sy * i64::from(sprite.width) + sx) as usize) * 4;
            let di = ((ty * dw + tx) as usize) * 4;
            let s = &sprite.data[si..si + 4];
            let d = &mut dst.data[di..di + 4];
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
            d.copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
