//! Grayscale masks.
//!
//! A mask is any image reduced to one channel: gray images pass through,
//! color images are reduced to their luma with alpha ignored. Black (0)
//! hides a pixel, white (255) keeps it.

mod apply;

pub use apply::apply_mask;

use crate::decode::{ChannelLayout, DecodedImage};
use crate::luminance::luma_u8;

/// Single-channel version of `image`.
pub fn to_grayscale(image: &DecodedImage) -> DecodedImage {
    let pixels = match image.layout {
        ChannelLayout::Gray => return image.clone(),
        ChannelLayout::Rgb => image
            .pixels
            .chunks_exact(3)
            .map(|p| luma_u8(p[0], p[1], p[2]))
            .collect(),
        ChannelLayout::Rgba => image
            .pixels
            .chunks_exact(4)
            .map(|p| luma_u8(p[0], p[1], p[2]))
            .collect(),
    };
    DecodedImage {
        width: image.width,
        height: image.height,
        layout: ChannelLayout::Gray,
        pixels,
    }
}
