//! Parametrized camera moves over a single scene.
//!
//! A move is a pure function of elapsed time. It yields a [`CameraPose`]: a displacement of the
//! viewport center in output pixels plus a zoom multiplier. Every move is shaped by a
//! `sin(progress * pi)` envelope or an ease-in/out curve, so the pose at both scene boundaries is
//! the rest pose (or a settled zoom) and cuts never show a jump.

use std::f64::consts::PI;

use crate::animation::ease::{Ease, progress};
use crate::foundation::core::{Canvas, Vec2};

/// Camera movement kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMove {
    /// Eased zoom-in anchored on the frame center ("vertigo" dolly).
    Dolly,
    /// Sinusoidal horizontal drift.
    Pan,
    /// Sinusoidal vertical drift.
    Tilt,
    /// Closed circular path combining horizontal and vertical drift.
    Arc,
    /// Cosine-eased push-in.
    Push,
}

/// Tunable amplitudes for camera moves, as fractions of the output canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraParams {
    /// Pan amplitude as a fraction of width, tilt amplitude as a fraction of height.
    pub pan_fraction: f64,
    /// Arc radius as a fraction of width/height.
    pub arc_fraction: f64,
    /// Final zoom of a dolly move.
    pub dolly_zoom_end: f64,
    /// Final zoom of a push move.
    pub push_zoom_end: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            pan_fraction: 0.15,
            arc_fraction: 0.10,
            dolly_zoom_end: 1.15,
            push_zoom_end: 1.20,
        }
    }
}

/// Viewport displacement and zoom at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// Viewport center displacement in output pixels.
    pub offset: Vec2,
    /// Zoom multiplier applied on top of the scene's own zoom.
    pub zoom: f64,
}

impl CameraPose {
    pub const REST: Self = Self {
        offset: Vec2::ZERO,
        zoom: 1.0,
    };
}

impl CameraMove {
    /// Pose at elapsed time `t` for a scene of `duration` seconds.
    pub fn pose(self, t: f64, duration: f64, canvas: Canvas, params: &CameraParams) -> CameraPose {
        let p = progress(t, duration);
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);

        match self {
            Self::Dolly => CameraPose {
                offset: Vec2::ZERO,
                zoom: 1.0 + (params.dolly_zoom_end - 1.0) * Ease::InOutQuad.apply(p),
            },
            Self::Pan => CameraPose {
                offset: Vec2::new(w * params.pan_fraction * (p * PI).sin(), 0.0),
                zoom: 1.0,
            },
            Self::Tilt => CameraPose {
                offset: Vec2::new(0.0, h * params.pan_fraction * (p * PI).sin()),
                zoom: 1.0,
            },
            Self::Arc => {
                // One lap around a circle that passes through the rest position.
                let angle = 2.0 * PI * Ease::InOutSine.apply(p);
                let rx = w * params.arc_fraction / 2.0;
                let ry = h * params.arc_fraction / 2.0;
                CameraPose {
                    offset: Vec2::new(rx * angle.sin(), ry * (1.0 - angle.cos())),
                    zoom: 1.0,
                }
            }
            Self::Push => CameraPose {
                offset: Vec2::ZERO,
                zoom: 1.0 + (params.push_zoom_end - 1.0) * Ease::InOutSine.apply(p),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/camera.rs"]
mod tests;
