use std::path::Path;

use anyhow::Context;

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ReelError, ReelResult};

/// Decode any raster format supported by `image` into an RGBA8 frame.
pub fn decode_image(bytes: &[u8]) -> ReelResult<FrameRGBA> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ReelError::media("decoded image has zero dimension"));
    }

    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);

    Ok(FrameRGBA {
        width,
        height,
        data,
        premultiplied: true,
    })
}

/// Read and decode an image file. A missing file is reported as a media error naming the path.
pub fn load_image(path: &Path) -> ReelResult<FrameRGBA> {
    if !path.is_file() {
        return Err(ReelError::media(format!(
            "image file not found: '{}'",
            path.display()
        )));
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).map_err(|e| {
        ReelError::media(format!("failed to decode image '{}': {e}", path.display()))
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
