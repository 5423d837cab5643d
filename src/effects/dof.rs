use crate::effects::blur::{default_sigma, gaussian_blur};
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ReelError, ReelResult};

/// Depth-of-field settings. `focus` is a fraction of width/height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DepthOfField {
    pub focus: (f64, f64),
    pub blur_radius: u32,
}

impl Default for DepthOfField {
    fn default() -> Self {
        Self {
            focus: (0.5, 0.5),
            blur_radius: 5,
        }
    }
}

/// Simulate shallow focus: pixels farther from `focus` take their color from a blurrier copy.
///
/// Blur amount grows linearly from 0 at the focus point to `blur_radius` at half the frame
/// diagonal. Pixels are bucketed into bands of odd kernel radius `1, 3, 5, ...`; band `r` covers
/// amounts in `[r - 1, r + 1)`, and the last band also takes everything up to `blur_radius`.
/// Each band is composited from an independent blur of the source frame.
pub fn apply_depth_of_field(
    frame: &FrameRGBA,
    focus: (f64, f64),
    blur_radius: u32,
) -> ReelResult<FrameRGBA> {
    frame.validate()?;
    if !focus.0.is_finite() || !focus.1.is_finite() {
        return Err(ReelError::validation("depth of field focus must be finite"));
    }
    if blur_radius == 0 {
        return Ok(frame.clone());
    }

    let (w, h) = (frame.width, frame.height);
    let fx = (f64::from(w) * focus.0).floor();
    let fy = (f64::from(h) * focus.1).floor();
    let max_dist = (f64::from(w).powi(2) + f64::from(h).powi(2)).sqrt() / 2.0;

    let radii: Vec<u32> = (1..=blur_radius).step_by(2).collect();
    let last = radii.len() - 1;
    let mut band_of = Vec::with_capacity(w as usize * h as usize);
    for y in 0..h {
        for x in 0..w {
            let d = (f64::from(x) - fx).hypot(f64::from(y) - fy);
            let amount = (d / max_dist).clamp(0.0, 1.0) * f64::from(blur_radius);
            // Bands tile `[0, blur_radius]` from below, so the first upper bound above `amount` wins.
            let band = radii
                .iter()
                .position(|&r| amount < f64::from(r) + 1.0)
                .unwrap_or(last);
            band_of.push(band);
        }
    }

    let mut out = frame.clone();
    for (band, &radius) in radii.iter().enumerate() {
        if !band_of.contains(&band) {
            continue;
        }
        let blurred = gaussian_blur(frame, radius, default_sigma(radius))?;
        for (i, &b) in band_of.iter().enumerate() {
            if b == band {
                out.data[i * 4..i * 4 + 4].copy_from_slice(&blurred.data[i * 4..i * 4 + 4]);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/dof.rs"]
mod tests;
