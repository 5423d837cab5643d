//! Scene records and the per-scene clip builder.

pub mod builder;
pub mod model;

pub use builder::{build_scene_clip, cover_scale};
pub use model::{Encoding, SceneRecord, Tuning, VideoConfig};
