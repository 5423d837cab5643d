//! Clips, transitions and whole-video composition.

pub mod clip;
pub mod compose;
pub mod transition;

pub use clip::{Clip, FrameSource, concat};
pub use compose::{Composer, Degradation, RenderOutput, RenderReport};
pub use transition::{TransitionKind, TransitionOptions, TransitionSpec, merge};
