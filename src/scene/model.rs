use std::path::{Path, PathBuf};

use crate::animation::camera::{CameraMove, CameraParams};
use crate::assets::media::AudioSource;
use crate::effects::Look;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::transition::TransitionKind;

/// One narrated scene: a still image, its narration and the text spoken over it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneRecord {
    pub image_path: PathBuf,
    pub audio: AudioSource,
    /// Scene length in seconds, normally the narration length.
    pub duration: f64,
    #[serde(default)]
    pub narration_text: String,
    /// Colour grade key (`drama`, `thriller`, `romance`, `sci-fi`). No grade when absent.
    #[serde(default)]
    pub style_tag: Option<String>,
    #[serde(default)]
    pub camera: Option<CameraMove>,
}

impl SceneRecord {
    pub fn new(image_path: impl Into<PathBuf>, audio: AudioSource, duration: f64) -> Self {
        Self {
            image_path: image_path.into(),
            audio,
            duration,
            narration_text: String::new(),
            style_tag: None,
            camera: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.narration_text = text.into();
        self
    }

    pub fn with_style(mut self, tag: impl Into<String>) -> Self {
        self.style_tag = Some(tag.into());
        self
    }

    pub fn with_camera(mut self, camera: CameraMove) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn validate(&self) -> ReelResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ReelError::validation(format!(
                "scene duration must be a positive number of seconds, got {}",
                self.duration
            )));
        }
        Ok(())
    }

    /// Resolve relative image and audio paths against `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        if self.image_path.is_relative() {
            self.image_path = base.join(&self.image_path);
        }
        self.audio = self.audio.resolved_against(base);
        self
    }
}

/// Every constant the pipeline would otherwise hard-code.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Extra cover scale on top of the exact cover ratio.
    pub cover_margin: f64,
    /// Cover scale used instead of `cover_margin` when the scene has a camera move.
    pub camera_headroom: f64,
    /// Scene zoom at the last frame; the zoom grows linearly from 1.0.
    pub scene_zoom_end: f64,
    pub camera: CameraParams,

    /// Requested transition length in seconds.
    pub transition_secs: f64,
    /// Transitions never exceed this fraction of the shorter adjacent scene.
    pub max_transition_fraction: f64,
    /// Kinds cycled through by incoming-scene position.
    pub transition_rotation: Vec<TransitionKind>,
    /// Extra scale reached by the outgoing clip in a zoom transition.
    pub transition_zoom: f64,
    /// Dissolve texture noise amplitude in 8-bit levels.
    pub dissolve_noise: f32,

    /// Background track gain relative to narration.
    pub background_volume: f32,

    pub subtitle_max_fade_secs: f64,
    /// Font size cap in pixels.
    pub subtitle_font_max_px: f32,
    /// Upward settle distance at 1080 lines.
    pub subtitle_settle_px: f64,
    /// Baseline distance from the bottom edge at 1080 lines.
    pub subtitle_bottom_px: f64,

    /// Seed for grain and dissolve noise.
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            cover_margin: 1.10,
            camera_headroom: 1.5,
            scene_zoom_end: 1.15,
            camera: CameraParams::default(),
            transition_secs: 1.0,
            max_transition_fraction: 0.25,
            transition_rotation: vec![
                TransitionKind::Dissolve,
                TransitionKind::Fade,
                TransitionKind::Wipe,
                TransitionKind::Zoom,
            ],
            transition_zoom: 0.20,
            dissolve_noise: 4.0,
            background_volume: 0.20,
            subtitle_max_fade_secs: 0.3,
            subtitle_font_max_px: 40.0,
            subtitle_settle_px: 20.0,
            subtitle_bottom_px: 120.0,
            seed: 0x5eed,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> ReelResult<()> {
        if !(self.cover_margin >= 1.0 && self.camera_headroom >= 1.0) {
            return Err(ReelError::validation(
                "cover_margin and camera_headroom must be >= 1.0",
            ));
        }
        if !(self.scene_zoom_end >= 1.0) {
            return Err(ReelError::validation("scene_zoom_end must be >= 1.0"));
        }
        if !(self.transition_secs >= 0.0) {
            return Err(ReelError::validation("transition_secs must be >= 0"));
        }
        if !(self.max_transition_fraction > 0.0 && self.max_transition_fraction <= 0.5) {
            return Err(ReelError::validation(
                "max_transition_fraction must be in (0, 0.5]",
            ));
        }
        if self.transition_rotation.is_empty() {
            return Err(ReelError::validation("transition_rotation must not be empty"));
        }
        if !(self.transition_zoom >= 0.0) {
            return Err(ReelError::validation("transition_zoom must be >= 0"));
        }
        if !(self.subtitle_font_max_px > 0.0) {
            return Err(ReelError::validation("subtitle_font_max_px must be > 0"));
        }
        Ok(())
    }

    /// Transition kind for the boundary in front of incoming scene `incoming` (0-based).
    pub fn transition_for(&self, incoming: usize) -> TransitionKind {
        self.transition_rotation[incoming % self.transition_rotation.len()]
    }
}

/// Encoder settings passed to `ffmpeg`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Encoding {
    pub video_codec: String,
    pub audio_codec: String,
    pub video_bitrate: String,
    /// Replace an existing output file.
    pub overwrite: bool,
}

impl Default for Encoding {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_owned(),
            audio_codec: "aac".to_owned(),
            video_bitrate: "5000k".to_owned(),
            overwrite: true,
        }
    }
}

/// Per-request video settings. Read-only once composition starts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub resolution: Canvas,
    pub fps: u32,
    pub subtitles: bool,
    pub background_audio: Option<AudioSource>,
    pub output_path: PathBuf,
    pub look: Look,
    pub tuning: Tuning,
    pub encoding: Encoding,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            resolution: Canvas::new(1920, 1080),
            fps: 24,
            subtitles: true,
            background_audio: None,
            output_path: PathBuf::from("output.mp4"),
            look: Look::default(),
            tuning: Tuning::default(),
            encoding: Encoding::default(),
        }
    }
}

impl VideoConfig {
    pub fn validate(&self) -> ReelResult<()> {
        let Canvas { width, height } = self.resolution;
        if width == 0 || height == 0 {
            return Err(ReelError::validation("resolution must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "resolution must be even (required for yuv420p mp4 output)",
            ));
        }
        self.frame_rate()?;
        self.tuning.validate()
    }

    pub fn frame_rate(&self) -> ReelResult<Fps> {
        Fps::whole(self.fps)
    }

    /// Frame count of a span of `secs` seconds, at least one frame.
    pub fn frames_for(&self, secs: f64) -> ReelResult<u64> {
        Ok(self.frame_rate()?.secs_to_frames_round(secs).max(1))
    }

    /// Resolve relative file references against `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        if self.output_path.is_relative() {
            self.output_path = base.join(&self.output_path);
        }
        self.background_audio = self.background_audio.map(|a| a.resolved_against(base));
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
