//! Rotation of a whole image about an arbitrary point.
//!
//! The output has the size of the input; whatever rotates out of frame is
//! lost and uncovered pixels are transparent zero.
//!
//! # Algorithm
//!
//! Inverse mapping: every destination pixel `(x, y)` is looked up in the
//! source at `M⁻¹ · (x, y)`, where `M` is the forward map from
//! [`image_rotation`]. Pixel centers sit on integer coordinates. With y
//! pointing down, a positive angle turns the picture counter-clockwise on
//! screen, the opposite of a drawing's `rotate()`.

use crate::decode::{DecodedImage, Interpolation};
use crate::geometry::AffineMatrix;

/// Angles closer than this to a multiple of 360 degrees are no rotation.
const ANGLE_EPSILON: f64 = 1e-9;

/// Forward map turning an image counter-clockwise by `angle_degrees`
/// about `center`.
pub fn image_rotation(center: (f64, f64), angle_degrees: f64) -> AffineMatrix {
    AffineMatrix::rotate_about(-angle_degrees, center.0, center.1)
}

/// Rotate `image` by `angle_degrees` about `center`, keeping its size.
///
/// Works on any channel layout.
///
/// # Example
///
/// ```ignore
/// let rotated = rotate_about(&image, (50.0, 50.0), 90.0, Interpolation::Bilinear);
/// assert_eq!(rotated.width, image.width);
/// ```
pub fn rotate_about(
    image: &DecodedImage,
    center: (f64, f64),
    angle_degrees: f64,
    interpolation: Interpolation,
) -> DecodedImage {
    // Fast path: no rotation needed
    let turns = angle_degrees % 360.0;
    if turns.abs() < ANGLE_EPSILON || (360.0 - turns.abs()).abs() < ANGLE_EPSILON {
        return image.clone();
    }

    let inverse = image_rotation(center, angle_degrees).inverse();
    let channels = image.channels();
    let mut output = vec![0u8; image.pixels.len()];

    for (idx, pixel) in output.chunks_exact_mut(channels).enumerate() {
        let x = (idx % image.width as usize) as f64;
        let y = (idx / image.width as usize) as f64;
        let (src_x, src_y) = inverse.transform_point((x, y));

        match interpolation {
            Interpolation::Bilinear => sample_bilinear(image, src_x, src_y, pixel),
            Interpolation::Nearest => sample_nearest(image, src_x, src_y, pixel),
        }
    }

    DecodedImage {
        width: image.width,
        height: image.height,
        layout: image.layout,
        pixels: output,
    }
}

/// Channels of the pixel at `(px, py)`, or `None` outside the image.
#[inline]
fn pixel_at(image: &DecodedImage, px: i64, py: i64) -> Option<&[u8]> {
    if px < 0 || py < 0 || px >= image.width as i64 || py >= image.height as i64 {
        return None;
    }
    let channels = image.channels();
    let idx = (py as usize * image.width as usize + px as usize) * channels;
    image.pixels.get(idx..idx + channels)
}

fn sample_nearest(image: &DecodedImage, x: f64, y: f64, out: &mut [u8]) {
    if let Some(src) = pixel_at(image, x.round() as i64, y.round() as i64) {
        out.copy_from_slice(src);
    }
}

/// Bilinear sample; neighbours outside the image count as zero.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64, out: &mut [u8]) {
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);

    // Entirely outside, including the one-pixel fade band
    if x0 < -1 || y0 < -1 || x0 >= image.width as i64 || y0 >= image.height as i64 {
        return;
    }

    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ];

    for (c, value) in out.iter_mut().enumerate() {
        let sum: f64 = taps
            .iter()
            .filter_map(|&(px, py, w)| pixel_at(image, px, py).map(|p| w * f64::from(p[c])))
            .sum();
        *value = sum.round().clamp(0.0, 255.0) as u8;
    }
}
