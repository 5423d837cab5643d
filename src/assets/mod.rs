pub mod decode;
pub mod media;

pub use decode::{decode_image, load_image};
pub use media::{AudioSource, decode_audio_f32_stereo};
