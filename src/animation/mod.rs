pub mod camera;
pub mod ease;
