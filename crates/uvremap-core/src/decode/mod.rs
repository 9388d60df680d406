//! Raster input: loading image files and resampling them.
//!
//! Images keep the channel layout they were stored with (gray, RGB or
//! RGBA) until a caller needs four channels; the remapper works on RGBA
//! only and converts with [`DecodedImage::to_rgba`].

mod load;
mod resize;
mod types;

pub use load::load_image;
pub use resize::resize;
pub use types::{ChannelLayout, DecodeError, DecodedImage, Interpolation};
