use rayon::prelude::*;

use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::ReelResult;

/// A viewport onto a source raster: output pixel `(x, y)` samples the source at
/// `center + ((x, y) - out_center) * src_per_out`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    /// Source-space point shown at the output center.
    pub center: (f64, f64),
    /// Source pixels spanned by one output pixel. Values below 1 magnify.
    pub src_per_out: f64,
}

impl View {
    /// View that shows `src` centered, with the source magnified by `zoom`.
    pub fn centered(src: &FrameRGBA, zoom: f64) -> Self {
        Self {
            center: (f64::from(src.width) / 2.0, f64::from(src.height) / 2.0),
            src_per_out: 1.0 / zoom,
        }
    }
}

/// Resample `src` through `view` into a new frame of `canvas` size.
///
/// Bilinear filtering, with edge clamping outside the source.
pub fn resample(src: &FrameRGBA, canvas: Canvas, view: View) -> ReelResult<FrameRGBA> {
    src.validate()?;
    let mut out = vec![0u8; canvas.rgba_len()];
    let row_len = canvas.width as usize * 4;
    let ocx = f64::from(canvas.width) / 2.0;
    let ocy = f64::from(canvas.height) / 2.0;

    out.par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let sy = view.center.1 + ((y as f64 + 0.5) - ocy) * view.src_per_out - 0.5;
            for x in 0..canvas.width as usize {
                let sx = view.center.0 + ((x as f64 + 0.5) - ocx) * view.src_per_out - 0.5;
                let px = bilinear(src, sx, sy);
                row[x * 4..x * 4 + 4].copy_from_slice(&px);
            }
        });

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data: out,
        premultiplied: src.premultiplied,
    })
}

/// Uniformly scale `src` by `factor` (nearest integer output size, minimum 1x1).
pub fn scale_uniform(src: &FrameRGBA, factor: f64) -> ReelResult<FrameRGBA> {
    src.validate()?;
    let w = ((f64::from(src.width) * factor).round() as u32).max(1);
    let h = ((f64::from(src.height) * factor).round() as u32).max(1);
    let view = View {
        center: (f64::from(src.width) / 2.0, f64::from(src.height) / 2.0),
        src_per_out: f64::from(src.width) / f64::from(w),
    };
    resample(src, Canvas::new(w, h), view)
}

fn bilinear(src: &FrameRGBA, sx: f64, sy: f64) -> [u8; 4] {
    let max_x = f64::from(src.width - 1);
    let max_y = f64::from(src.height - 1);
    let sx = sx.clamp(0.0, max_x);
    let sy = sy.clamp(0.0, max_y);

    let x0 = sx.floor() as u32;
    let y0 = sy.floor() as u32;
    let x1 = (x0 + 1).min(src.width - 1);
    let y1 = (y0 + 1).min(src.height - 1);
    let fx = sx - f64::from(x0);
    let fy = sy - f64::from(y0);

    let p00 = src.pixel(x0, y0);
    let p10 = src.pixel(x1, y0);
    let p01 = src.pixel(x0, y1);
    let p11 = src.pixel(x1, y1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/sample.rs"]
mod tests;
