//! Mask application.
//!
//! The mask is reduced to gray and resized to the image first. What it
//! does then depends on the image layout:
//!
//! - gray: intensity is scaled by `mask / 255`
//! - RGB: the mask becomes the alpha channel
//! - RGBA: alpha is scaled by `mask / 255`
//!
//! A mask only ever removes opacity. Wherever the mask is 0 the color is
//! cleared as well, so hidden pixels are transparent black.

use super::to_grayscale;
use crate::decode::{resize, ChannelLayout, DecodeError, DecodedImage, Interpolation};

/// Apply `mask` to `image`, returning the masked copy.
///
/// RGB input comes back as RGBA; gray and RGBA keep their layout.
pub fn apply_mask(
    image: &DecodedImage,
    mask: &DecodedImage,
    interpolation: Interpolation,
) -> Result<DecodedImage, DecodeError> {
    let mask = resize(&to_grayscale(mask), image.width, image.height, interpolation)?;

    let (layout, pixels) = match image.layout {
        ChannelLayout::Gray => {
            let pixels = image
                .pixels
                .iter()
                .zip(&mask.pixels)
                .map(|(&v, &m)| scale(v, m))
                .collect();
            (ChannelLayout::Gray, pixels)
        }
        ChannelLayout::Rgb => {
            let pixels = image
                .pixels
                .chunks_exact(3)
                .zip(&mask.pixels)
                .flat_map(|(p, &m)| match m {
                    0 => [0, 0, 0, 0],
                    _ => [p[0], p[1], p[2], m],
                })
                .collect();
            (ChannelLayout::Rgba, pixels)
        }
        ChannelLayout::Rgba => {
            let pixels = image
                .pixels
                .chunks_exact(4)
                .zip(&mask.pixels)
                .flat_map(|(p, &m)| match m {
                    0 => [0, 0, 0, 0],
                    _ => [p[0], p[1], p[2], scale(p[3], m)],
                })
                .collect();
            (ChannelLayout::Rgba, pixels)
        }
    };

    DecodedImage::new(image.width, image.height, layout, pixels)
}

/// `value * mask / 255`, truncated.
#[inline]
fn scale(value: u8, mask: u8) -> u8 {
    (u16::from(value) * u16::from(mask) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32, pixels: Vec<u8>) -> DecodedImage {
        DecodedImage::new(width, height, ChannelLayout::Gray, pixels).unwrap()
    }

    #[test]
    fn test_gray_image_scaled() {
        let img = gray(3, 1, vec![200, 200, 200]);
        let mask = gray(3, 1, vec![0, 128, 255]);
        let out = apply_mask(&img, &mask, Interpolation::Nearest).unwrap();
        assert_eq!(out.layout, ChannelLayout::Gray);
        assert_eq!(out.pixels, vec![0, 100, 200]);
    }

    #[test]
    fn test_rgb_gets_mask_as_alpha() {
        let img = DecodedImage::new(2, 1, ChannelLayout::Rgb, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let mask = gray(2, 1, vec![0, 77]);
        let out = apply_mask(&img, &mask, Interpolation::Nearest).unwrap();
        assert_eq!(out.layout, ChannelLayout::Rgba);
        assert_eq!(out.pixels, vec![0, 0, 0, 0, 40, 50, 60, 77]);
    }

    #[test]
    fn test_rgba_alpha_multiplied() {
        let img = DecodedImage::new(
            3,
            1,
            ChannelLayout::Rgba,
            vec![10, 20, 30, 200, 10, 20, 30, 0, 10, 20, 30, 255],
        )
        .unwrap();
        let mask = gray(3, 1, vec![128, 255, 0]);
        let out = apply_mask(&img, &mask, Interpolation::Nearest).unwrap();
        assert_eq!(
            out.pixels,
            vec![10, 20, 30, 100, 10, 20, 30, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_mask_cannot_restore_opacity() {
        let img = DecodedImage::transparent(2, 2);
        let mask = gray(2, 2, vec![255; 4]);
        let out = apply_mask(&img, &mask, Interpolation::Bilinear).unwrap();
        assert!(out.is_all_zero());
    }

    #[test]
    fn test_color_mask_resized_to_image() {
        let img = DecodedImage::filled(4, 4, [100, 100, 100, 255]);
        let mask = DecodedImage::filled(2, 2, [255, 255, 255, 0]);
        let out = apply_mask(&img, &mask, Interpolation::Nearest).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_black_mask_clears_everything() {
        let img = DecodedImage::filled(5, 3, [1, 2, 3, 255]);
        let mask = DecodedImage::filled(1, 1, [0, 0, 0, 255]);
        let out = apply_mask(&img, &mask, Interpolation::Bilinear).unwrap();
        assert!(out.is_all_zero());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_mask_never_raises_alpha(
            pixels in proptest::collection::vec(any::<u8>(), 16),
            mask in proptest::collection::vec(any::<u8>(), 4),
        ) {
            let img = DecodedImage::new(2, 2, ChannelLayout::Rgba, pixels).unwrap();
            let mask = DecodedImage::new(2, 2, ChannelLayout::Gray, mask).unwrap();
            let out = apply_mask(&img, &mask, Interpolation::Nearest).unwrap();

            for (before, after) in img.pixels.chunks_exact(4).zip(out.pixels.chunks_exact(4)) {
                prop_assert!(after[3] <= before[3]);
            }
        }
    }
}
