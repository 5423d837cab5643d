use crate::animation::camera::{CameraMove, CameraParams, CameraPose};
use crate::animation::ease::progress;
use crate::assets::decode::load_image;
use crate::effects::sample::{View, resample, scale_uniform};
use crate::effects::{ColorStyle, Look, finish_frame};
use crate::foundation::core::{Canvas, Fps, FrameRGBA};
use crate::foundation::error::ReelResult;
use crate::foundation::math::derive_seed;
use crate::scene::model::{SceneRecord, VideoConfig};
use crate::timeline::clip::{Clip, FrameSource};

/// Uniform scale that makes `src` cover `canvas`, times `margin`.
pub fn cover_scale(src: Canvas, canvas: Canvas, margin: f64) -> f64 {
    let rw = f64::from(canvas.width) / f64::from(src.width);
    let rh = f64::from(canvas.height) / f64::from(src.height);
    rw.max(rh) * margin
}

/// Build the visual clip for one scene.
///
/// The image is cover-scaled once; every frame then crops the canvas from its center with a zoom
/// growing linearly from 1.0 to `scene_zoom_end`, combined with the scene's camera move. `scene`
/// is the 0-based position used to derive noise seeds.
#[tracing::instrument(skip(record, config), fields(image = %record.image_path.display()))]
pub fn build_scene_clip(record: &SceneRecord, config: &VideoConfig, scene: usize) -> ReelResult<Clip> {
    record.validate()?;
    let canvas = config.resolution;
    let fps = config.frame_rate()?;
    let frames = config.frames_for(record.duration)?;
    let tuning = &config.tuning;

    let image = flatten_opaque(load_image(&record.image_path)?);
    let margin = if record.camera.is_some() {
        tuning.camera_headroom
    } else {
        tuning.cover_margin
    };
    let base = scale_uniform(&image, cover_scale(image.canvas(), canvas, margin))?;
    tracing::debug!(
        src_w = image.width,
        src_h = image.height,
        base_w = base.width,
        base_h = base.height,
        frames,
        "scene image prepared"
    );

    let source = SceneSource {
        base,
        canvas,
        fps,
        duration: record.duration,
        zoom_end: tuning.scene_zoom_end,
        camera: record.camera,
        camera_params: tuning.camera,
        style: record.style_tag.as_deref().map(ColorStyle::from_tag),
        look: config.look.clone(),
        seed: derive_seed(tuning.seed, &[scene as u64]),
    };
    Clip::new(canvas, fps, frames, source)
}

/// Drop alpha by compositing a premultiplied image over black.
fn flatten_opaque(mut frame: FrameRGBA) -> FrameRGBA {
    if !frame.premultiplied {
        for px in frame.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            for c in px.iter_mut().take(3) {
                *c = ((u16::from(*c) * a + 127) / 255) as u8;
            }
        }
    }
    for px in frame.data.chunks_exact_mut(4) {
        px[3] = 255;
    }
    frame.premultiplied = true;
    frame
}

struct SceneSource {
    base: FrameRGBA,
    canvas: Canvas,
    fps: Fps,
    duration: f64,
    zoom_end: f64,
    camera: Option<CameraMove>,
    camera_params: CameraParams,
    style: Option<ColorStyle>,
    look: Look,
    seed: u64,
}

impl SceneSource {
    fn view_at(&self, t: f64) -> View {
        let pose = self.camera.map_or(CameraPose::REST, |m| {
            m.pose(t, self.duration, self.canvas, &self.camera_params)
        });
        let zoom = (1.0 + (self.zoom_end - 1.0) * progress(t, self.duration)) * pose.zoom;
        let centered = View::centered(&self.base, zoom);
        // Offsets are in output pixels; one output pixel spans `1 / zoom` base pixels.
        View {
            center: (
                centered.center.0 + pose.offset.x / zoom,
                centered.center.1 + pose.offset.y / zoom,
            ),
            src_per_out: centered.src_per_out,
        }
    }
}

impl FrameSource for SceneSource {
    fn render(&self, frame: u64) -> ReelResult<FrameRGBA> {
        let t = self.fps.frames_to_secs(frame);
        let out = resample(&self.base, self.canvas, self.view_at(t))?;
        finish_frame(
            out,
            self.style,
            &self.look,
            derive_seed(self.seed, &[frame]),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/builder.rs"]
mod tests;
