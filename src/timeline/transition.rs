//! Blended segments between adjacent clips.
//!
//! A transition of `n` frames overlaps the last `n` frames of the outgoing clip with the first `n`
//! frames of the incoming one, so the merged clip is `n` frames shorter than the two inputs.
//! Frame `k` of the overlap is blended at progress `(k + 1) / (n + 1)`, which never shows either
//! input unblended inside the window. Audio is cross-mixed with the same ramp for every kind.

use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;

use crate::audio::mix::{crossfade_tracks, frame_to_sample};
use crate::audio::track::MIX_SAMPLE_RATE;
use crate::effects::composite::crossfade_frames;
use crate::effects::sample::{View, resample};
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{clamp_u8, derive_seed};
use crate::timeline::clip::{Blend, Clip, Splice, concat};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Linear crossfade.
    Fade,
    /// Hard vertical edge sweeping left to right.
    Wipe,
    /// Crossfade with film-grain texture noise.
    Dissolve,
    /// Outgoing clip shrinks while the incoming one grows, crossfaded.
    Zoom,
}

impl TransitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::Wipe => "wipe",
            Self::Dissolve => "dissolve",
            Self::Zoom => "zoom",
        }
    }
}

/// Requested transition between two clips.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSpec {
    pub kind: TransitionKind,
    /// Overlap in seconds.
    pub duration: f64,
}

impl TransitionSpec {
    /// `requested` seconds, capped at `max_fraction` of the shorter of the two adjacent scenes.
    pub fn clamped(
        kind: TransitionKind,
        requested: f64,
        a_secs: f64,
        b_secs: f64,
        max_fraction: f64,
    ) -> Self {
        Self {
            kind,
            duration: requested.min(a_secs.min(b_secs) * max_fraction).max(0.0),
        }
    }
}

/// Engine-wide knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionOptions {
    /// Cap applied when a requested transition outlasts one of its clips.
    pub max_fraction: f64,
    /// Extra scale of the zoom transition.
    pub zoom: f64,
    /// Dissolve noise amplitude in 8-bit levels.
    pub dissolve_noise: f32,
    pub seed: u64,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            max_fraction: 0.25,
            zoom: 0.20,
            dissolve_noise: 4.0,
            seed: 0,
        }
    }
}

/// A validated transition, ready to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionPlan {
    pub kind: TransitionKind,
    /// Overlap in frames.
    pub frames: u64,
    /// The requested kind was replaced by a fade because the request outlasted a clip.
    pub forced_fade: bool,
}

/// Result of [`merge`].
#[derive(Debug)]
pub struct Merged {
    pub clip: Clip,
    /// The transition that was applied, `None` after a fallback to a hard cut.
    pub plan: Option<TransitionPlan>,
    /// Why the transition was abandoned.
    pub fallback: Option<ReelError>,
}

/// Blend progress for frame `k` of an `n`-frame overlap.
pub fn blend_progress(k: u64, n: u64) -> f64 {
    (k as f64 + 1.0) / (n as f64 + 1.0)
}

/// Validate `spec` against the two clips.
///
/// A request longer than either clip is forced to a fade of `max_fraction` of the shorter clip.
pub fn plan(
    a: &Clip,
    b: &Clip,
    spec: &TransitionSpec,
    opts: &TransitionOptions,
) -> ReelResult<TransitionPlan> {
    a.check_joinable(b)?;
    if !spec.duration.is_finite() || spec.duration < 0.0 {
        return Err(ReelError::validation(format!(
            "transition duration must be a non-negative number, got {}",
            spec.duration
        )));
    }
    if a.audio().is_some() != b.audio().is_some() {
        return Err(ReelError::evaluation(
            "audio is present on only one side of the transition",
        ));
    }

    let (a_secs, b_secs) = (a.duration_secs(), b.duration_secs());
    let (kind, secs, forced_fade) = if spec.duration > a_secs || spec.duration > b_secs {
        (
            TransitionKind::Fade,
            a_secs.min(b_secs) * opts.max_fraction,
            true,
        )
    } else {
        (spec.kind, spec.duration, false)
    };

    let frames = a
        .fps()
        .secs_to_frames_round(secs)
        .min(a.frames())
        .min(b.frames());
    Ok(TransitionPlan {
        kind,
        frames,
        forced_fade,
    })
}

/// Overlap `a` and `b` according to `plan`.
pub fn apply(
    a: Clip,
    b: Clip,
    plan: TransitionPlan,
    opts: &TransitionOptions,
) -> ReelResult<Clip> {
    if plan.frames == 0 {
        return concat(a, b);
    }
    a.check_joinable(&b)?;
    let (canvas, fps) = (a.canvas(), a.fps());
    let head = a.frames() - plan.frames;
    let frames = a.frames() + b.frames() - plan.frames;
    let overlap_len = frame_to_sample(plan.frames, fps, MIX_SAMPLE_RATE);

    let (a_src, a_audio) = a.into_parts();
    let (b_src, b_audio) = b.into_parts();

    let audio = match (a_audio, b_audio) {
        (Some(a_audio), Some(b_audio)) => {
            let a_len = a_audio.len_frames();
            let n = overlap_len.min(a_len).min(b_audio.len_frames());
            let mut mixed = a_audio.slice(0, a_len - n);
            let blended = crossfade_tracks(&a_audio.slice(a_len - n, a_len), &b_audio.slice(0, n))?;
            mixed.append(&blended)?;
            mixed.append(&b_audio.slice(n, b_audio.len_frames()))?;
            Some(mixed)
        }
        (None, None) => None,
        _ => {
            return Err(ReelError::evaluation(
                "audio is present on only one side of the transition",
            ));
        }
    };

    let blend = KindBlend {
        kind: plan.kind,
        opts: *opts,
    };
    let splice = Splice {
        a: a_src,
        b: b_src,
        head,
        overlap: plan.frames,
        blend: Some(Box::new(blend)),
    };
    let clip = Clip::from_boxed(canvas, fps, frames, Box::new(splice))?;
    Ok(clip.with_fitted_audio(audio))
}

/// Merge two clips with a transition, degrading to a hard cut when the transition is invalid.
///
/// Only a failure of the hard cut itself (mismatched canvas or fps) is returned as an error.
pub fn merge(
    a: Clip,
    b: Clip,
    spec: TransitionSpec,
    opts: &TransitionOptions,
) -> ReelResult<Merged> {
    match plan(&a, &b, &spec, opts) {
        Ok(plan) => {
            if plan.forced_fade {
                tracing::debug!(
                    requested = spec.kind.as_str(),
                    frames = plan.frames,
                    "transition outlasts a clip, forcing fade"
                );
            }
            Ok(Merged {
                clip: apply(a, b, plan, opts)?,
                plan: Some(plan),
                fallback: None,
            })
        }
        Err(err) => {
            tracing::warn!(kind = spec.kind.as_str(), error = %err, "transition failed, using hard cut");
            Ok(Merged {
                clip: concat(a, b)?,
                plan: None,
                fallback: Some(err),
            })
        }
    }
}

struct KindBlend {
    kind: TransitionKind,
    opts: TransitionOptions,
}

impl Blend for KindBlend {
    fn blend(&self, a: FrameRGBA, b: FrameRGBA, k: u64, n: u64) -> ReelResult<FrameRGBA> {
        let p = blend_progress(k, n);
        let seed = derive_seed(self.opts.seed, &[k]);
        transition_frame(self.kind, &a, &b, p, &self.opts, seed)
    }
}

/// One blended frame at progress `p` in `[0, 1]`.
pub fn transition_frame(
    kind: TransitionKind,
    a: &FrameRGBA,
    b: &FrameRGBA,
    p: f64,
    opts: &TransitionOptions,
    noise_seed: u64,
) -> ReelResult<FrameRGBA> {
    let p = p.clamp(0.0, 1.0);
    match kind {
        TransitionKind::Fade => crossfade_frames(a, b, p as f32),
        TransitionKind::Wipe => wipe(a, b, p),
        TransitionKind::Dissolve => {
            let mut out = crossfade_frames(a, b, p as f32)?;
            add_texture_noise(&mut out, opts.dissolve_noise, noise_seed);
            Ok(out)
        }
        TransitionKind::Zoom => {
            let canvas = a.canvas();
            let scale_a = 1.0 / (1.0 + opts.zoom * p);
            let scale_b = 1.0 / (1.0 + opts.zoom * (1.0 - p));
            let za = resample(a, canvas, View::centered(a, scale_a))?;
            let zb = resample(b, canvas, View::centered(b, scale_b))?;
            crossfade_frames(&za, &zb, p as f32)
        }
    }
}

fn wipe(a: &FrameRGBA, b: &FrameRGBA, p: f64) -> ReelResult<FrameRGBA> {
    a.validate()?;
    b.validate()?;
    if b.canvas() != a.canvas() {
        return Err(ReelError::validation("wipe expects equal frame sizes"));
    }
    let mut out = a.clone();
    let edge = ((p * f64::from(a.width)).round() as usize).min(a.width as usize);
    let row_len = a.width as usize * 4;
    out.data
        .par_chunks_exact_mut(row_len)
        .zip(b.data.par_chunks_exact(row_len))
        .for_each(|(dst, src)| dst[..edge * 4].copy_from_slice(&src[..edge * 4]));
    Ok(out)
}

/// Zero-mean uniform luminance noise of `amplitude` levels; one row-seeded stream per row.
fn add_texture_noise(frame: &mut FrameRGBA, amplitude: f32, seed: u64) {
    if amplitude <= 0.0 {
        return;
    }
    let row_len = frame.width as usize * 4;
    frame
        .data
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = StdRng::seed_from_u64(derive_seed(seed, &[y as u64]));
            for px in row.chunks_exact_mut(4) {
                let n: f32 = rng.gen_range(-amplitude..=amplitude);
                for c in px.iter_mut().take(3) {
                    *c = clamp_u8(f32::from(*c) + n);
                }
            }
        });
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/transition.rs"]
mod tests;
