pub mod mix;
pub mod track;

pub use track::{AudioTrack, MIX_CHANNELS, MIX_SAMPLE_RATE};
