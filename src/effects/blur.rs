use rayon::prelude::*;

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ReelError, ReelResult};

/// Sigma OpenCV derives for a kernel of `2 * radius + 1` taps when none is given.
pub fn default_sigma(radius: u32) -> f32 {
    0.3 * ((radius as f32) - 1.0) + 0.8
}

/// Separable Gaussian blur with edge clamping. `radius == 0` returns a copy.
pub fn gaussian_blur(frame: &FrameRGBA, radius: u32, sigma: f32) -> ReelResult<FrameRGBA> {
    frame.validate()?;
    if radius == 0 {
        return Ok(frame.clone());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; frame.data.len()];
    let mut out = vec![0u8; frame.data.len()];

    convolve(&frame.data, &mut tmp, frame.width, frame.height, &kernel, Axis::X);
    convolve(&tmp, &mut out, frame.width, frame.height, &kernel, Axis::Y);

    Ok(FrameRGBA {
        width: frame.width,
        height: frame.height,
        data: out,
        premultiplied: frame.premultiplied,
    })
}

/// Normalized kernel in Q16 fixed point; weights always sum to exactly `1 << 16`.
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ReelResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ReelError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(ReelError::evaluation("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + 65536 - acc).clamp(0, 65536) as u32;

    Ok(weights)
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn convolve(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    let h = i64::from(height);
    let row_len = width as usize * 4;

    dst.par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i64;
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let d = ki as i64 - radius;
                    let (sx, sy) = match axis {
                        Axis::X => ((x + d).clamp(0, w - 1), y),
                        Axis::Y => (x, (y + d).clamp(0, h - 1)),
                    };
                    let idx = ((sy * w + sx) as usize) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                    }
                }
                let o = x as usize * 4;
                for c in 0..4 {
                    row[o + c] = (((acc[c] + 32768) >> 16).min(255)) as u8;
                }
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
