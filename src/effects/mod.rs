//! Per-frame pixel transforms.
//!
//! Every public effect takes a frame by reference and returns a new frame of identical size.
//! Zero-sized or inconsistent frames are rejected with a validation error; callers decide whether
//! to ignore it.

pub mod blur;
pub mod composite;
pub mod dof;
pub mod grade;
pub mod grain;
pub mod sample;
pub mod vignette;

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::ReelResult;

pub use dof::{DepthOfField, apply_depth_of_field};
pub use grade::{ColorStyle, GradeParams, apply_color_grade};
pub use grain::{DEFAULT_GRAIN_INTENSITY, apply_film_grain};
pub use vignette::{DEFAULT_VIGNETTE_INTENSITY, apply_vignette};

/// Optional finishing effects applied to every scene frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Look {
    /// Film grain intensity (standard deviation as a fraction of full scale).
    pub grain: Option<f32>,
    /// Vignette intensity.
    pub vignette: Option<f32>,
    pub depth_of_field: Option<DepthOfField>,
}

/// Grade, then depth of field, then vignette, then grain.
pub fn finish_frame(
    mut frame: FrameRGBA,
    style: Option<ColorStyle>,
    look: &Look,
    grain_seed: u64,
) -> ReelResult<FrameRGBA> {
    if let Some(style) = style {
        frame = apply_color_grade(&frame, style)?;
    }
    if let Some(dof) = look.depth_of_field {
        frame = apply_depth_of_field(&frame, dof.focus, dof.blur_radius)?;
    }
    if let Some(intensity) = look.vignette {
        frame = apply_vignette(&frame, intensity)?;
    }
    if let Some(intensity) = look.grain {
        frame = apply_film_grain(&frame, intensity, grain_seed)?;
    }
    Ok(frame)
}
