//! Image resizing.
//!
//! Uses the `image` crate's resampling on a buffer of the image's own
//! layout, so gray masks stay gray and alpha is resampled like any other
//! channel (no premultiplication).

use image::{ImageBuffer, Luma, Pixel, Rgb, Rgba};

use super::{ChannelLayout, DecodeError, DecodedImage, Interpolation};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if a target dimension is zero
/// and `DecodeError::BufferSize` if the source buffer is inconsistent.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    interpolation: Interpolation,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let filter = interpolation.to_image_filter();
    let resized = match image.layout {
        ChannelLayout::Gray => resize_buffer::<Luma<u8>>(image, width, height, filter),
        ChannelLayout::Rgb => resize_buffer::<Rgb<u8>>(image, width, height, filter),
        ChannelLayout::Rgba => resize_buffer::<Rgba<u8>>(image, width, height, filter),
    };
    let pixels = resized.ok_or_else(|| DecodeError::BufferSize {
        width: image.width,
        height: image.height,
        layout: image.layout,
        expected: image.pixel_count() * image.channels(),
        actual: image.pixels.len(),
    })?;

    Ok(DecodedImage {
        width,
        height,
        layout: image.layout,
        pixels,
    })
}

fn resize_buffer<P>(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: image::imageops::FilterType,
) -> Option<Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let buffer = ImageBuffer::<P, Vec<u8>>::from_raw(image.width, image.height, image.pixels.clone())?;
    Some(image::imageops::resize(&buffer, width, height, filter).into_raw())
}
