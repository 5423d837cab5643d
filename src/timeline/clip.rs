use crate::audio::mix::frame_to_sample;
use crate::audio::track::{AudioTrack, MIX_SAMPLE_RATE};
use crate::foundation::core::{Canvas, Fps, FrameRGBA};
use crate::foundation::error::{ReelError, ReelResult};

/// Lazily renders the frames of one clip.
pub trait FrameSource: Send + Sync {
    /// Render clip-local frame `frame`. Callers keep `frame` below the owning clip's length.
    fn render(&self, frame: u64) -> ReelResult<FrameRGBA>;
}

impl<F> FrameSource for F
where
    F: Fn(u64) -> ReelResult<FrameRGBA> + Send + Sync,
{
    fn render(&self, frame: u64) -> ReelResult<FrameRGBA> {
        self(frame)
    }
}

/// A timed, lazily evaluated run of frames with optional audio.
///
/// Transitions and concatenation consume their input clips, so a clip is only ever owned by one
/// pipeline stage.
pub struct Clip {
    canvas: Canvas,
    fps: Fps,
    frames: u64,
    source: Box<dyn FrameSource>,
    audio: Option<AudioTrack>,
}

impl std::fmt::Debug for Clip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clip")
            .field("canvas", &self.canvas)
            .field("fps", &self.fps)
            .field("frames", &self.frames)
            .field("audio_frames", &self.audio.as_ref().map(AudioTrack::len_frames))
            .finish_non_exhaustive()
    }
}

impl Clip {
    pub fn new(
        canvas: Canvas,
        fps: Fps,
        frames: u64,
        source: impl FrameSource + 'static,
    ) -> ReelResult<Self> {
        Self::from_boxed(canvas, fps, frames, Box::new(source))
    }

    pub(crate) fn from_boxed(
        canvas: Canvas,
        fps: Fps,
        frames: u64,
        source: Box<dyn FrameSource>,
    ) -> ReelResult<Self> {
        if frames == 0 {
            return Err(ReelError::validation("clip must span at least one frame"));
        }
        if canvas.width == 0 || canvas.height == 0 {
            return Err(ReelError::validation("clip canvas must be non-zero"));
        }
        Ok(Self {
            canvas,
            fps,
            frames,
            source,
            audio: None,
        })
    }

    /// Clip rendered by a closure over the clip-local frame index.
    pub fn from_fn<F>(canvas: Canvas, fps: Fps, frames: u64, render: F) -> ReelResult<Self>
    where
        F: Fn(u64) -> ReelResult<FrameRGBA> + Send + Sync + 'static,
    {
        Self::from_boxed(canvas, fps, frames, Box::new(render))
    }

    /// Solid-colour clip.
    pub fn solid(canvas: Canvas, fps: Fps, frames: u64, rgba: [u8; 4]) -> ReelResult<Self> {
        let frame = FrameRGBA::solid(canvas, rgba);
        Self::from_fn(canvas, fps, frames, move |_| Ok(frame.clone()))
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frames)
    }

    pub fn audio(&self) -> Option<&AudioTrack> {
        self.audio.as_ref()
    }

    /// Number of audio sample frames that cover this clip exactly.
    pub fn audio_len(&self) -> u64 {
        frame_to_sample(self.frames, self.fps, MIX_SAMPLE_RATE)
    }

    /// Attach `track`, converted to the mix format and padded or trimmed to the clip length.
    pub fn with_audio(mut self, track: AudioTrack) -> Self {
        let len = self.audio_len();
        self.audio = Some(track.into_mix_format().fit_to(len));
        self
    }

    /// Attach already-mixed audio, fitted to the clip length.
    pub(crate) fn with_fitted_audio(mut self, audio: Option<AudioTrack>) -> Self {
        let len = self.audio_len();
        self.audio = audio.map(|a| a.fit_to(len));
        self
    }

    /// Replace the audio, fitted to the clip length.
    pub(crate) fn set_audio(&mut self, track: AudioTrack) {
        self.audio = Some(track.fit_to(self.audio_len()));
    }

    pub fn take_audio(&mut self) -> Option<AudioTrack> {
        self.audio.take()
    }

    /// Render clip-local frame `frame`.
    pub fn render(&self, frame: u64) -> ReelResult<FrameRGBA> {
        if frame >= self.frames {
            return Err(ReelError::evaluation(format!(
                "frame {frame} is out of range for a clip of {} frames",
                self.frames
            )));
        }
        let out = self.source.render(frame)?;
        if out.canvas() != self.canvas {
            return Err(ReelError::evaluation(format!(
                "frame source produced {}x{}, expected {}x{}",
                out.width, out.height, self.canvas.width, self.canvas.height
            )));
        }
        Ok(out)
    }

    /// Wrap the frame source, keeping length and audio.
    pub(crate) fn map_source(
        self,
        wrap: impl FnOnce(Box<dyn FrameSource>) -> Box<dyn FrameSource>,
    ) -> Self {
        Self {
            source: wrap(self.source),
            ..self
        }
    }

    pub(crate) fn into_parts(self) -> (Box<dyn FrameSource>, Option<AudioTrack>) {
        (self.source, self.audio)
    }

    pub(crate) fn check_joinable(&self, other: &Self) -> ReelResult<()> {
        if self.canvas != other.canvas {
            return Err(ReelError::validation(format!(
                "cannot join clips of {}x{} and {}x{}",
                self.canvas.width, self.canvas.height, other.canvas.width, other.canvas.height
            )));
        }
        if self.fps != other.fps {
            return Err(ReelError::validation("cannot join clips with different fps"));
        }
        Ok(())
    }
}

/// Per-frame blend used inside an overlap window.
///
/// Frames are blended lazily while streaming, after the transition was planned, so an error here
/// aborts the encode instead of degrading to a hard cut. A blend must not fail for two frames of
/// the same size; anything it can reject belongs in `transition::plan`.
pub(crate) trait Blend: Send + Sync {
    /// Blend frame `k` of an `n`-frame overlap.
    fn blend(&self, a: FrameRGBA, b: FrameRGBA, k: u64, n: u64) -> ReelResult<FrameRGBA>;
}

/// `a` followed by `b`, with the last `overlap` frames of `a` blended against the first
/// `overlap` frames of `b`.
pub(crate) struct Splice {
    pub(crate) a: Box<dyn FrameSource>,
    pub(crate) b: Box<dyn FrameSource>,
    /// Frames of `a` shown before the overlap starts.
    pub(crate) head: u64,
    pub(crate) overlap: u64,
    pub(crate) blend: Option<Box<dyn Blend>>,
}

impl FrameSource for Splice {
    fn render(&self, frame: u64) -> ReelResult<FrameRGBA> {
        if frame < self.head {
            return self.a.render(frame);
        }
        let k = frame - self.head;
        if k < self.overlap
            && let Some(blend) = self.blend.as_ref()
        {
            let fa = self.a.render(frame)?;
            let fb = self.b.render(k)?;
            return blend.blend(fa, fb, k, self.overlap);
        }
        self.b.render(k)
    }
}

/// Join two clips end to end with a hard cut.
///
/// When only one side carries audio the other side contributes silence.
pub fn concat(a: Clip, b: Clip) -> ReelResult<Clip> {
    a.check_joinable(&b)?;
    let (canvas, fps) = (a.canvas, a.fps);
    let head = a.frames;
    let frames = a.frames + b.frames;
    let (a_len, b_len) = (a.audio_len(), b.audio_len());

    let (a_src, a_audio) = a.into_parts();
    let (b_src, b_audio) = b.into_parts();

    let audio = match (a_audio, b_audio) {
        (None, None) => None,
        (a_audio, b_audio) => {
            let mut joined = a_audio.unwrap_or_else(|| AudioTrack::silence(a_len));
            joined.append(&b_audio.unwrap_or_else(|| AudioTrack::silence(b_len)))?;
            Some(joined)
        }
    };

    let splice = Splice {
        a: a_src,
        b: b_src,
        head,
        overlap: 0,
        blend: None,
    };
    let clip = Clip::from_boxed(canvas, fps, frames, Box::new(splice))?;
    Ok(clip.with_fitted_audio(audio))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/clip.rs"]
mod tests;
