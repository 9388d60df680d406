//! Raster output.
//!
//! Results are always written as 8-bit RGBA PNG files.

mod png;

pub use png::{encode_png, save_png, EncodeError};
