use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::clamp_u8;

pub const DEFAULT_GRAIN_INTENSITY: f32 = 0.05;

/// Add zero-mean Gaussian noise with standard deviation `intensity * 255` to every color channel.
///
/// The noise field is fully determined by `seed`. Alpha is left untouched.
pub fn apply_film_grain(frame: &FrameRGBA, intensity: f32, seed: u64) -> ReelResult<FrameRGBA> {
    frame.validate()?;
    if !intensity.is_finite() || intensity < 0.0 {
        return Err(ReelError::validation(
            "film grain intensity must be finite and >= 0",
        ));
    }

    let mut out = frame.clone();
    if intensity == 0.0 {
        return Ok(out);
    }

    let sigma = intensity * 255.0;
    let mut rng = StdRng::seed_from_u64(seed);
    for px in out.data.chunks_exact_mut(4) {
        for c in px.iter_mut().take(3) {
            *c = clamp_u8(f32::from(*c) + sigma * standard_normal(&mut rng));
        }
    }
    Ok(out)
}

/// Box-Muller sample from N(0, 1).
pub(crate) fn standard_normal(rng: &mut impl Rng) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.r#gen();
    (-2.0 * u1.ln()).sqrt() * (std::f32::consts::TAU * u2).cos()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grain.rs"]
mod tests;
