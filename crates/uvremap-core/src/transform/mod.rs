//! Geometric operations on rasters: rotation about a point, crop and paste.
//!
//! All of them keep the channel layout of their input.

mod crop;
mod rotation;

pub use crop::{centered_offset, crop, paste};
pub use rotation::{image_rotation, rotate_about};
