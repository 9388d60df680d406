//! Pixel-wise compositing of RGBA buffers.
//!
//! Colors are straight (not premultiplied) alpha. The "over" rule is
//! applied to all four channels alike:
//!
//! ```text
//! out = dst * (1 - a) + src * a      with a = src_alpha / 255
//! ```
//!
//! and truncated back to u8, so alpha accumulates by the same rule as the
//! color channels.

use thiserror::Error;

use crate::decode::{ChannelLayout, DecodedImage};
use crate::error::ErrorCategory;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeError {
    #[error("image sizes differ: {expected:?} vs {actual:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("expected a {expected} image, got {actual}")]
    LayoutMismatch {
        expected: ChannelLayout,
        actual: ChannelLayout,
    },
}

impl CompositeError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Input
    }
}

/// One straight-alpha "over" step for a single pixel.
pub fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    match src[3] {
        0 => dst,
        255 => src,
        alpha => {
            let a = f64::from(alpha) / 255.0;
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = (f64::from(dst[i]) * (1.0 - a) + f64::from(src[i]) * a) as u8;
            }
            out
        }
    }
}

/// Composite `src` over `dst`. Both must be RGBA images of the same size.
pub fn over_in_place(dst: &mut DecodedImage, src: &DecodedImage) -> Result<(), CompositeError> {
    check_pair(dst, src, ChannelLayout::Rgba)?;
    for (d, s) in dst.pixels.chunks_exact_mut(4).zip(src.pixels.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Per-channel maximum of `dst` and `src`, stored in `dst`.
pub fn max_in_place(dst: &mut DecodedImage, src: &DecodedImage) -> Result<(), CompositeError> {
    let layout = dst.layout;
    check_pair(dst, src, layout)?;
    for (d, &s) in dst.pixels.iter_mut().zip(&src.pixels) {
        *d = (*d).max(s);
    }
    Ok(())
}

fn check_pair(
    dst: &DecodedImage,
    src: &DecodedImage,
    layout: ChannelLayout,
) -> Result<(), CompositeError> {
    if (dst.width, dst.height) != (src.width, src.height) {
        return Err(CompositeError::SizeMismatch {
            expected: (dst.width, dst.height),
            actual: (src.width, src.height),
        });
    }
    for image in [dst, src] {
        if image.layout != layout {
            return Err(CompositeError::LayoutMismatch {
                expected: layout,
                actual: image.layout,
            });
        }
    }
    Ok(())
}
