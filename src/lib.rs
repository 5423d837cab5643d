//! Storyreel assembles a narrated video from still-image scenes.
//!
//! Each scene pairs an image with a narration track. The [`Composer`] turns every scene into a
//! cover-fitted, slowly zooming clip (optionally with a camera move, colour grade and word
//! subtitles), joins neighbours with blended transitions, mixes an optional background track
//! under the narration and streams the result into a [`FrameSink`], usually `ffmpeg`.
//!
//! - Describe the request with [`SceneRecord`]s and a [`VideoConfig`]
//! - Build a [`Composer`] and call [`Composer::compose`] or [`Composer::compose_into`]
//! - Inspect the returned [`RenderReport`] for degraded stages
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod audio;
pub mod effects;
pub mod encode;
mod foundation;
pub mod scene;
pub mod subtitle;
pub mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRGBA, Vec2};
pub use crate::foundation::error::{ReelError, ReelResult, Stage};

pub use crate::animation::camera::{CameraMove, CameraParams, CameraPose};
pub use crate::assets::media::AudioSource;
pub use crate::audio::track::AudioTrack;
pub use crate::effects::{ColorStyle, DepthOfField, Look};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::scene::builder::build_scene_clip;
pub use crate::scene::model::{Encoding, SceneRecord, Tuning, VideoConfig};
pub use crate::subtitle::render::{FontBook, SubtitleOverlay, SubtitleStyle};
pub use crate::subtitle::tokens::{SubtitleToken, subtitle_tokens};
pub use crate::timeline::clip::{Clip, FrameSource, concat};
pub use crate::timeline::compose::{
    Composer, Degradation, RenderOutput, RenderReport, SceneSummary, TransitionSummary,
};
pub use crate::timeline::transition::{
    Merged, TransitionKind, TransitionOptions, TransitionPlan, TransitionSpec, merge,
};

/// A render request as read from a job file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Job {
    #[serde(default)]
    pub config: VideoConfig,
    pub scenes: Vec<SceneRecord>,
}

impl Job {
    /// Read a JSON job and resolve relative paths against the file's directory.
    pub fn from_path(path: &std::path::Path) -> ReelResult<Self> {
        use anyhow::Context as _;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read job file '{}'", path.display()))?;
        let job: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse job file '{}'", path.display()))?;
        let base = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        Ok(Self {
            config: job.config.resolved_against(base),
            scenes: job
                .scenes
                .into_iter()
                .map(|s| s.resolved_against(base))
                .collect(),
        })
    }
}
