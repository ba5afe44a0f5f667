//! Geometry
//!
//! Rotation algebra for the rotary/incline bed and the per-layer transforms
//! consumed by renderers.

pub mod projector;
pub mod rotation;

pub use projector::Projector;
pub use rotation::{axis_angle_matrix, cone_axis, layer_transform, rotate_about};
