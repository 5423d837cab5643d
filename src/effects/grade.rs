use crate::foundation::core::FrameRGBA;
use crate::foundation::error::ReelResult;
use crate::foundation::math::clamp_u8;

/// Named cinematic color grades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorStyle {
    Drama,
    Thriller,
    Romance,
    SciFi,
}

/// Grade parameters. A `temperature` below 1 cools (boosts blue), above 1 warms (boosts red).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradeParams {
    pub contrast: f32,
    pub saturation: f32,
    pub brightness: f32,
    pub temperature: f32,
}

impl ColorStyle {
    /// Resolve a style tag; unknown tags fall back to [`ColorStyle::Drama`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "thriller" => Self::Thriller,
            "romance" => Self::Romance,
            "sci-fi" | "sci_fi" | "scifi" => Self::SciFi,
            _ => Self::Drama,
        }
    }

    pub fn params(self) -> GradeParams {
        let (contrast, saturation, brightness, temperature) = match self {
            Self::Drama => (1.2, 0.85, 0.95, 0.95),
            Self::Thriller => (1.3, 0.7, 0.8, 0.8),
            Self::Romance => (1.1, 1.1, 1.05, 1.05),
            Self::SciFi => (1.15, 0.9, 0.9, 1.2),
        };
        GradeParams {
            contrast,
            saturation,
            brightness,
            temperature,
        }
    }
}

/// Apply the grade for `style`: contrast, then saturation, then brightness, then temperature.
///
/// Each stage reads the previous stage's output.
pub fn apply_color_grade(frame: &FrameRGBA, style: ColorStyle) -> ReelResult<FrameRGBA> {
    apply_grade_params(frame, style.params())
}

pub fn apply_grade_params(frame: &FrameRGBA, p: GradeParams) -> ReelResult<FrameRGBA> {
    frame.validate()?;
    let mut out = frame.clone();
    for px in out.data.chunks_exact_mut(4) {
        let mut rgb = [px[0], px[1], px[2]];
        rgb = contrast(rgb, p.contrast);
        rgb = saturate(rgb, p.saturation);
        rgb = rgb.map(|c| clamp_u8(f32::from(c) * p.brightness));
        rgb = temperature(rgb, p.temperature);
        px[..3].copy_from_slice(&rgb);
    }
    Ok(out)
}

fn contrast(rgb: [u8; 3], k: f32) -> [u8; 3] {
    rgb.map(|c| clamp_u8((f32::from(c) - 128.0) * k + 128.0))
}

fn saturate(rgb: [u8; 3], k: f32) -> [u8; 3] {
    let (h, s, v) = rgb_to_hsv(rgb);
    hsv_to_rgb(h, (s * k).clamp(0.0, 1.0), v)
}

fn temperature([r, g, b]: [u8; 3], temp: f32) -> [u8; 3] {
    if temp < 1.0 {
        [r, g, clamp_u8(f32::from(b) * (2.0 - temp))]
    } else if temp > 1.0 {
        [clamp_u8(f32::from(r) * temp), g, b]
    } else {
        [r, g, b]
    }
}

/// Hue in degrees `[0, 360)`, saturation and value in `[0, 1]`.
pub(crate) fn rgb_to_hsv([r, g, b]: [u8; 3]) -> (f32, f32, f32) {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta <= f32::EPSILON {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max <= f32::EPSILON { 0.0 } else { delta / max };
    (h, s, max)
}

pub(crate) fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let c = v * s;
    let hp = (h / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - ((hp % 2.0) - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    [r, g, b].map(|ch| clamp_u8((ch + m) * 255.0))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grade.rs"]
mod tests;
