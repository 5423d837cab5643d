//! Word-by-word subtitles.

pub mod render;
pub mod tokens;

pub use render::{FontBook, SubtitleOverlay, SubtitleStyle, overlay_subtitles};
pub use tokens::{SubtitleToken, subtitle_tokens};
