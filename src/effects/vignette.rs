use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::clamp_u8;

pub const DEFAULT_VIGNETTE_INTENSITY: f32 = 0.3;

/// Darken toward the corners with the radial mask `clamp(1 - intensity * r, 0, 1)`.
///
/// `r` is the distance from the frame center with both axes normalized to `[-1, 1]`.
pub fn apply_vignette(frame: &FrameRGBA, intensity: f32) -> ReelResult<FrameRGBA> {
    frame.validate()?;
    if !intensity.is_finite() || intensity < 0.0 {
        return Err(ReelError::validation(
            "vignette intensity must be finite and >= 0",
        ));
    }

    let xs = normalized_axis(frame.width);
    let ys = normalized_axis(frame.height);
    let mut out = frame.clone();
    for (y, row) in out
        .data
        .chunks_exact_mut(frame.width as usize * 4)
        .enumerate()
    {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let r = (xs[x] * xs[x] + ys[y] * ys[y]).sqrt();
            let mask = (1.0 - intensity * r).clamp(0.0, 1.0);
            for c in px.iter_mut().take(3) {
                *c = clamp_u8(f32::from(*c) * mask);
            }
        }
    }
    Ok(out)
}

/// `n` evenly spaced samples over `[-1, 1]`.
fn normalized_axis(n: u32) -> Vec<f32> {
    if n == 1 {
        return vec![0.0];
    }
    let step = 2.0 / (n - 1) as f32;
    (0..n).map(|i| -1.0 + step * i as f32).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/vignette.rs"]
mod tests;
