use std::path::Path;

use crate::audio::track::AudioTrack;
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};

/// Convert a frame count to the nearest sample-frame count at `sample_rate`.
pub fn frame_to_sample(frames: u64, fps: Fps, sample_rate: u32) -> u64 {
    let num = u128::from(frames) * u128::from(sample_rate) * u128::from(fps.den);
    let den = u128::from(fps.num);
    ((num + (den / 2)) / den) as u64
}

/// Mix `a` fading out linearly against `b` fading in linearly. Both must have equal length.
///
/// The gain ramps match the visual blend: at sample `i` of `n`, `a` has gain `1 - p` and `b` has
/// gain `p` with `p = (i + 1) / (n + 1)`.
pub fn crossfade_tracks(a: &AudioTrack, b: &AudioTrack) -> ReelResult<AudioTrack> {
    if a.sample_rate != b.sample_rate || a.channels != b.channels {
        return Err(ReelError::validation("crossfade expects matching audio formats"));
    }
    if a.len_frames() != b.len_frames() {
        return Err(ReelError::validation(format!(
            "crossfade expects equal lengths, got {} and {} sample frames",
            a.len_frames(),
            b.len_frames()
        )));
    }

    let n = a.len_frames() as f32;
    let ch = usize::from(a.channels);
    let interleaved = a
        .interleaved
        .iter()
        .zip(&b.interleaved)
        .enumerate()
        .map(|(i, (&sa, &sb))| {
            let p = ((i / ch) as f32 + 1.0) / (n + 1.0);
            (sa * (1.0 - p) + sb * p).clamp(-1.0, 1.0)
        })
        .collect();
    AudioTrack::new(a.sample_rate, a.channels, interleaved)
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_f32le_file(track: &AudioTrack, out_path: &Path) -> ReelResult<()> {
    let mut bytes = Vec::<u8>::with_capacity(track.interleaved.len() * 4);
    for &sample in &track.interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::evaluation(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
