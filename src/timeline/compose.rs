//! Whole-video orchestration.
//!
//! Scenes are built in parallel and then merged left to right. Scene failures abort the request
//! and name the scene; subtitle, transition and background-audio failures degrade the video and
//! are listed in the [`RenderReport`].

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::audio::mix::write_f32le_file;
use crate::audio::track::{AudioTrack, MIX_CHANNELS, MIX_SAMPLE_RATE};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult, Stage};
use crate::foundation::math::derive_seed;
use crate::scene::builder::build_scene_clip;
use crate::scene::model::{SceneRecord, VideoConfig};
use crate::subtitle::render::{FontBook, SubtitleOverlay, SubtitleStyle, overlay_subtitles};
use crate::subtitle::tokens::subtitle_tokens;
use crate::timeline::clip::Clip;
use crate::timeline::transition::{TransitionKind, TransitionOptions, TransitionSpec, merge};

/// Frames rendered concurrently before being pushed to the sink in order.
const RENDER_BATCH: u64 = 8;
const TRANSITION_SEED_SALT: u64 = 0x7472_616e;

/// A recoverable failure that was worked around.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Degradation {
    /// 1-based scene number, absent for whole-video stages.
    pub scene: Option<usize>,
    pub stage: Stage,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneSummary {
    pub frames: u64,
    /// Subtitle words shown over the scene; zero when subtitles are off or failed.
    pub subtitle_words: usize,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TransitionSummary {
    /// 1-based number of the incoming scene.
    pub scene: usize,
    /// `None` when the boundary fell back to a hard cut.
    pub kind: Option<TransitionKind>,
    pub frames: u64,
}

/// What was rendered, and which stages degraded.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct RenderReport {
    pub frames: u64,
    pub duration_secs: f64,
    pub scenes: Vec<SceneSummary>,
    pub transitions: Vec<TransitionSummary>,
    pub background_audio: bool,
    pub degradations: Vec<Degradation>,
}

impl RenderReport {
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderOutput {
    pub path: PathBuf,
    pub report: RenderReport,
}

struct BuiltScene {
    clip: Clip,
    summary: SceneSummary,
    degradation: Option<Degradation>,
}

/// Assembles scenes into one video.
pub struct Composer {
    config: VideoConfig,
    fps: Fps,
    fonts: OnceLock<FontBook>,
}

impl Composer {
    pub fn new(config: VideoConfig) -> ReelResult<Self> {
        config.validate()?;
        let fps = config.frame_rate()?;
        Ok(Self {
            config,
            fps,
            fonts: OnceLock::new(),
        })
    }

    /// Use `fonts` for subtitles instead of scanning system fonts on first use.
    pub fn with_fonts(self, fonts: FontBook) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(fonts);
        Self { fonts: cell, ..self }
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Encode to `config.output_path` with `ffmpeg`.
    pub fn compose(&self, scenes: &[SceneRecord]) -> ReelResult<RenderOutput> {
        let path = self.config.output_path.clone();
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
            &path,
            self.config.encoding.clone(),
        ));
        let report = self.compose_into(scenes, &mut sink)?;
        tracing::info!(out = %path.display(), "video written");
        Ok(RenderOutput { path, report })
    }

    /// Run the full pipeline into `sink`.
    #[tracing::instrument(skip_all, fields(scenes = scenes.len()))]
    pub fn compose_into(
        &self,
        scenes: &[SceneRecord],
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderReport> {
        let (mut master, report) = self.build_master(scenes)?;

        let audio_file = match master.take_audio() {
            Some(track) => Some(stage_audio(&track).map_err(|e| e.in_stage(Stage::Encode))?),
            None => None,
        };
        let cfg = SinkConfig {
            canvas: master.canvas(),
            fps: master.fps(),
            audio: audio_file.as_ref().map(|f| AudioInputConfig {
                path: f.path().to_path_buf(),
                sample_rate: MIX_SAMPLE_RATE,
                channels: MIX_CHANNELS,
            }),
        };

        sink.begin(cfg).map_err(|e| e.in_stage(Stage::Encode))?;
        stream_frames(&master, sink).map_err(|e| e.in_stage(Stage::Encode))?;
        sink.end().map_err(|e| e.in_stage(Stage::Encode))?;

        tracing::info!(
            frames = report.frames,
            secs = report.duration_secs,
            degraded = report.degradations.len(),
            "composition finished"
        );
        Ok(report)
    }

    /// Build, merge and mix everything, without encoding.
    pub fn build_master(&self, scenes: &[SceneRecord]) -> ReelResult<(Clip, RenderReport)> {
        if scenes.is_empty() {
            return Err(ReelError::validation("at least one scene is required"));
        }
        tracing::info!(scenes = scenes.len(), subtitles = self.config.subtitles, "building scenes");

        let built: Vec<ReelResult<BuiltScene>> = scenes
            .par_iter()
            .enumerate()
            .map(|(i, record)| self.build_scene(i, record))
            .collect();

        let mut report = RenderReport::default();
        let mut clips = Vec::with_capacity(built.len());
        for scene in built {
            let scene = scene?;
            report.scenes.push(scene.summary);
            report.degradations.extend(scene.degradation);
            clips.push(scene.clip);
        }

        let mut master = self.merge_all(clips, &mut report)?;
        if let Some(degradation) = self.mix_background(&mut master) {
            report.degradations.push(degradation);
        } else {
            report.background_audio = self.config.background_audio.is_some();
        }

        report.frames = master.frames();
        report.duration_secs = master.duration_secs();
        Ok((master, report))
    }

    fn build_scene(&self, index: usize, record: &SceneRecord) -> ReelResult<BuiltScene> {
        let scene = index + 1;
        let clip = build_scene_clip(record, &self.config, index)
            .map_err(|e| e.in_scene(scene, Stage::SceneBuild))?;
        let narration = record
            .audio
            .load()
            .map_err(|e| e.in_scene(scene, Stage::SceneAudio))?;
        let mut clip = clip.with_audio(narration);

        let mut summary = SceneSummary {
            frames: clip.frames(),
            subtitle_words: 0,
        };
        let mut degradation = None;
        if self.config.subtitles {
            match self.subtitle_overlay(record) {
                Ok(overlay) => {
                    summary.subtitle_words = overlay.tokens().count();
                    clip = overlay_subtitles(clip, overlay);
                }
                Err(err) => {
                    tracing::warn!(scene, error = %err, "subtitles failed, continuing without them");
                    degradation = Some(Degradation {
                        scene: Some(scene),
                        stage: Stage::Subtitle,
                        message: err.to_string(),
                    });
                }
            }
        }

        tracing::debug!(scene, frames = clip.frames(), "scene built");
        Ok(BuiltScene {
            clip,
            summary,
            degradation,
        })
    }

    fn subtitle_overlay(&self, record: &SceneRecord) -> ReelResult<SubtitleOverlay> {
        let tokens = subtitle_tokens(&record.narration_text, record.duration);
        let canvas = self.config.resolution;
        let style = SubtitleStyle::for_canvas(canvas, &self.config.tuning);
        if tokens.is_empty() {
            return SubtitleOverlay::render(&tokens, canvas, style, &FontBook::empty());
        }
        let fonts = self.fonts.get_or_init(FontBook::system);
        SubtitleOverlay::render(&tokens, canvas, style, fonts)
    }

    fn merge_all(&self, clips: Vec<Clip>, report: &mut RenderReport) -> ReelResult<Clip> {
        let tuning = &self.config.tuning;
        let mut clips = clips.into_iter();
        let mut master = clips
            .next()
            .ok_or_else(|| ReelError::validation("at least one scene is required"))?;
        let mut prev_secs = master.duration_secs();

        for (offset, clip) in clips.enumerate() {
            let position = offset + 1;
            let scene = position + 1;
            let cur_secs = clip.duration_secs();
            let spec = TransitionSpec::clamped(
                tuning.transition_for(position),
                tuning.transition_secs,
                prev_secs,
                cur_secs,
                tuning.max_transition_fraction,
            );
            let opts = TransitionOptions {
                max_fraction: tuning.max_transition_fraction,
                zoom: tuning.transition_zoom,
                dissolve_noise: tuning.dissolve_noise,
                seed: derive_seed(tuning.seed, &[TRANSITION_SEED_SALT, position as u64]),
            };

            let merged =
                merge(master, clip, spec, &opts).map_err(|e| e.in_scene(scene, Stage::Transition))?;
            report.transitions.push(TransitionSummary {
                scene,
                kind: merged.plan.map(|p| p.kind),
                frames: merged.plan.map_or(0, |p| p.frames),
            });
            if let Some(err) = merged.fallback {
                report.degradations.push(Degradation {
                    scene: Some(scene),
                    stage: Stage::Transition,
                    message: err.to_string(),
                });
            }
            master = merged.clip;
            prev_secs = cur_secs;
        }
        Ok(master)
    }

    /// Loop or trim the background track to the master length and mix it under the narration.
    fn mix_background(&self, master: &mut Clip) -> Option<Degradation> {
        let source = self.config.background_audio.as_ref()?;
        let len = master.audio_len();
        let gain = self.config.tuning.background_volume;

        let background = source
            .load()
            .and_then(|track| track.looped_to(len))
            .map(|track| track.scaled(gain));
        let mut mixed = master
            .take_audio()
            .unwrap_or_else(|| AudioTrack::silence(len));
        let result = background.and_then(|bg| mixed.mix_in(&bg));
        master.set_audio(mixed);

        match result {
            Ok(()) => {
                tracing::debug!(sample_frames = len, gain, "background audio mixed");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "background audio failed, keeping narration only");
                Some(Degradation {
                    scene: None,
                    stage: Stage::BackgroundAudio,
                    message: err.to_string(),
                })
            }
        }
    }
}

fn stage_audio(track: &AudioTrack) -> ReelResult<tempfile::NamedTempFile> {
    let file = tempfile::Builder::new()
        .prefix("storyreel-audio-")
        .suffix(".f32le")
        .tempfile()
        .context("create temporary audio file")?;
    write_f32le_file(track, file.path())?;
    Ok(file)
}

fn stream_frames(master: &Clip, sink: &mut dyn FrameSink) -> ReelResult<()> {
    let total = master.frames();
    let mut start = 0;
    while start < total {
        let end = (start + RENDER_BATCH).min(total);
        let frames = (start..end)
            .into_par_iter()
            .map(|i| master.render(i))
            .collect::<ReelResult<Vec<_>>>()?;
        for (offset, frame) in frames.iter().enumerate() {
            sink.push_frame(FrameIndex(start + offset as u64), frame)?;
        }
        start = end;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/compose.rs"]
mod tests;
