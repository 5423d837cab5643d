use std::path::{Path, PathBuf};
use std::process::Command;

use crate::audio::track::{AudioTrack, MIX_CHANNELS, MIX_SAMPLE_RATE};
use crate::foundation::error::{ReelError, ReelResult};

/// Where a scene's narration (or the background track) comes from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum AudioSource {
    /// Any file `ffmpeg` can decode.
    File(PathBuf),
    /// Already-decoded PCM.
    #[serde(skip)]
    Pcm(AudioTrack),
}

impl AudioSource {
    /// Decode into the mix format (48 kHz stereo `f32`).
    pub fn load(&self) -> ReelResult<AudioTrack> {
        match self {
            Self::File(path) => decode_audio_f32_stereo(path, MIX_SAMPLE_RATE),
            Self::Pcm(track) => Ok(track.clone().into_mix_format()),
        }
    }

    /// Resolve a relative file path against `base`.
    pub fn resolved_against(self, base: &Path) -> Self {
        match self {
            Self::File(p) if p.is_relative() => Self::File(base.join(p)),
            other => other,
        }
    }
}

/// Decode an audio file to interleaved stereo `f32` at `sample_rate` using the system `ffmpeg`.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> ReelResult<AudioTrack> {
    if !path.is_file() {
        return Err(ReelError::media(format!(
            "audio file not found: '{}'",
            path.display()
        )));
    }

    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &MIX_CHANNELS.to_string(),
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| ReelError::media(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        return Err(ReelError::media(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(ReelError::media(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let pcm = out
        .stdout
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect::<Vec<f32>>();

    AudioTrack::new(sample_rate, MIX_CHANNELS, pcm)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
