use crate::foundation::error::{ReelError, ReelResult};

/// Sample rate every track is decoded or resampled to.
pub const MIX_SAMPLE_RATE: u32 = 48_000;
/// Channel count every track is decoded to.
pub const MIX_CHANNELS: u16 = 2;

/// Interleaved `f32` PCM.
///
/// Lengths are counted in sample frames (one sample per channel).
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved: Vec<f32>,
}

impl AudioTrack {
    pub fn new(sample_rate: u32, channels: u16, interleaved: Vec<f32>) -> ReelResult<Self> {
        if sample_rate == 0 || channels == 0 {
            return Err(ReelError::validation(
                "audio sample_rate and channels must be non-zero",
            ));
        }
        if !interleaved.len().is_multiple_of(usize::from(channels)) {
            return Err(ReelError::validation(
                "interleaved audio length must be a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            interleaved,
        })
    }

    /// `frames` sample frames of silence in the mix format.
    pub fn silence(frames: u64) -> Self {
        Self {
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
            interleaved: vec![0.0; frames as usize * usize::from(MIX_CHANNELS)],
        }
    }

    pub fn len_frames(&self) -> u64 {
        (self.interleaved.len() / usize::from(self.channels)) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.interleaved.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.len_frames() as f64 / f64::from(self.sample_rate)
    }

    fn check_compatible(&self, other: &Self) -> ReelResult<()> {
        if self.sample_rate != other.sample_rate || self.channels != other.channels {
            return Err(ReelError::validation(format!(
                "audio format mismatch: {} Hz x{} vs {} Hz x{}",
                self.sample_rate, self.channels, other.sample_rate, other.channels
            )));
        }
        Ok(())
    }

    /// Convert to the mix format (48 kHz stereo) with linear resampling and channel up/down mix.
    pub fn into_mix_format(self) -> Self {
        if self.sample_rate == MIX_SAMPLE_RATE && self.channels == MIX_CHANNELS {
            return self;
        }
        let src_frames = self.len_frames() as usize;
        let ch = usize::from(self.channels);
        let frame_at = |i: usize| -> (f32, f32) {
            let base = i * ch;
            let l = self.interleaved[base];
            let r = if ch > 1 { self.interleaved[base + 1] } else { l };
            (l, r)
        };

        let out_frames = ((src_frames as f64) * f64::from(MIX_SAMPLE_RATE)
            / f64::from(self.sample_rate))
        .round() as usize;
        let mut out = Vec::with_capacity(out_frames * 2);
        for i in 0..out_frames {
            if src_frames == 0 {
                break;
            }
            let pos = (i as f64) * f64::from(self.sample_rate) / f64::from(MIX_SAMPLE_RATE);
            let i0 = (pos.floor() as usize).min(src_frames - 1);
            let i1 = (i0 + 1).min(src_frames - 1);
            let frac = (pos - i0 as f64) as f32;
            let (l0, r0) = frame_at(i0);
            let (l1, r1) = frame_at(i1);
            out.push(l0 + (l1 - l0) * frac);
            out.push(r0 + (r1 - r0) * frac);
        }
        Self {
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
            interleaved: out,
        }
    }

    /// Pad with silence or truncate to exactly `frames` sample frames.
    pub fn fit_to(mut self, frames: u64) -> Self {
        self.interleaved
            .resize(frames as usize * usize::from(self.channels), 0.0);
        self
    }

    /// Repeat the track end-to-end and trim to exactly `frames` sample frames.
    ///
    /// A track at least `frames` long is simply trimmed.
    pub fn looped_to(self, frames: u64) -> ReelResult<Self> {
        if self.len_frames() >= frames {
            return Ok(self.fit_to(frames));
        }
        if self.is_empty() {
            return Err(ReelError::media("cannot loop an empty audio track"));
        }
        let want = frames as usize * usize::from(self.channels);
        let interleaved = self.interleaved.iter().copied().cycle().take(want).collect();
        Ok(Self {
            interleaved,
            ..self
        })
    }

    /// Multiply every sample by `gain`.
    pub fn scaled(mut self, gain: f32) -> Self {
        for s in &mut self.interleaved {
            *s *= gain;
        }
        self
    }

    /// Additively mix `other` into `self`, clamped to `[-1, 1]`. `other` may be shorter.
    pub fn mix_in(&mut self, other: &Self) -> ReelResult<()> {
        self.check_compatible(other)?;
        for (d, s) in self.interleaved.iter_mut().zip(&other.interleaved) {
            *d = (*d + *s).clamp(-1.0, 1.0);
        }
        Ok(())
    }

    /// Copy of sample frames `[start, end)`, clamped to the track length.
    pub fn slice(&self, start: u64, end: u64) -> Self {
        let ch = usize::from(self.channels);
        let len = self.len_frames();
        let s = start.min(len) as usize * ch;
        let e = end.clamp(start.min(len), len) as usize * ch;
        Self {
            sample_rate: self.sample_rate,
            channels: self.channels,
            interleaved: self.interleaved[s..e].to_vec(),
        }
    }

    pub fn append(&mut self, other: &Self) -> ReelResult<()> {
        self.check_compatible(other)?;
        self.interleaved.extend_from_slice(&other.interleaved);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
