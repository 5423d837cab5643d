/// Progress curves for camera moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    /// Quadratic ease-in/out, used by the dolly.
    InOutQuad,
    /// `0.5 - 0.5 * cos(t * pi)`.
    InOutSine,
}

impl Ease {
    /// Map `t`, clamped to `[0, 1]`, through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InOutSine => 0.5 - 0.5 * (t * std::f64::consts::PI).cos(),
        }
    }
}

/// Normalized progress of `t` through `[0, duration)`, clamped to `[0, 1]`.
pub fn progress(t: f64, duration: f64) -> f64 {
    if !(duration > 0.0) || !t.is_finite() {
        return 0.0;
    }
    (t / duration).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
