//! Moving one region's pixels from the source to the destination canvas.

use crate::annotation::Region;
use crate::decode::{resize, DecodedImage, Interpolation};
use crate::transform::{centered_offset, crop, paste, rotate_about};

use super::RemapError;

/// Largest patch or canvas accepted, in pixels (1 GiB as RGBA).
pub const MAX_PIXELS: f64 = (1u64 << 28) as f64;

/// Whole-pixel size of `region`, `None` when it truncates to zero.
///
/// # Errors
///
/// [`RemapError::TooLarge`] when the size does not fit [`MAX_PIXELS`].
pub fn patch_size(region: &Region) -> Result<Option<(u32, u32)>, RemapError> {
    let (width, height) = (region.size.0.trunc(), region.size.1.trunc());
    if width < 1.0 || height < 1.0 {
        return Ok(None);
    }
    check_pixels(format!("region '{}'", region.name), width, height)?;
    Ok(Some((width as u32, height as u32)))
}

/// Reject `width` x `height` buffers beyond [`MAX_PIXELS`].
pub(super) fn check_pixels(what: String, width: f64, height: f64) -> Result<(), RemapError> {
    let pixels = width * height;
    if pixels.is_nan() || pixels > MAX_PIXELS {
        return Err(RemapError::TooLarge {
            what,
            width,
            height,
        });
    }
    Ok(())
}

/// Cut the (possibly rotated) source region out of `source`.
///
/// Center and size are truncated to whole pixels first; the whole image is
/// rotated about the truncated center and the axis-aligned window around
/// it is cropped. `None` when the truncated size is zero.
pub fn extract_patch(
    source: &DecodedImage,
    region: &Region,
    interpolation: Interpolation,
) -> Result<Option<DecodedImage>, RemapError> {
    let Some((width, height)) = patch_size(region)? else {
        return Ok(None);
    };
    let center = (region.center.0.trunc(), region.center.1.trunc());

    let rotated = rotate_about(source, center, region.angle, interpolation);
    let left = centered_offset(center.0, f64::from(width));
    let top = centered_offset(center.1, f64::from(height));
    Ok(Some(crop(&rotated, left, top, width, height)))
}

/// Lay `patch` onto a transparent canvas of `canvas_size` at the region.
///
/// The patch is resized to the truncated region size, pasted so that its
/// top-left corner sits at the truncated offset from the real-valued
/// center, and the canvas is rotated about that center by the region
/// angle. `None` when the truncated size is zero.
pub fn place_patch(
    patch: &DecodedImage,
    region: &Region,
    canvas_size: (u32, u32),
    interpolation: Interpolation,
) -> Result<Option<DecodedImage>, RemapError> {
    let Some((width, height)) = patch_size(region)? else {
        return Ok(None);
    };
    let left = centered_offset(region.center.0, region.size.0);
    let top = centered_offset(region.center.1, region.size.1);

    let resized = resize(patch, width, height, interpolation)?;
    let mut canvas = DecodedImage::transparent(canvas_size.0, canvas_size.1);
    paste(&mut canvas, &resized.to_rgba(), left, top)?;

    Ok(Some(rotate_about(
        &canvas,
        region.center,
        region.angle,
        interpolation,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ChannelLayout;

    /// 10x10 RGBA image whose red channel holds `x` and green `y`.
    fn gradient() -> DecodedImage {
        let mut pixels = Vec::with_capacity(400);
        for y in 0..10u8 {
            for x in 0..10u8 {
                pixels.extend_from_slice(&[x, y, 0, 255]);
            }
        }
        DecodedImage::new(10, 10, ChannelLayout::Rgba, pixels).unwrap()
    }

    #[test]
    fn test_extract_truncates_center_and_size() {
        let region = Region::new("r", (5.9, 4.2), (4.8, 2.9), 0.0);
        let patch = extract_patch(&gradient(), &region, Interpolation::Bilinear)
            .unwrap()
            .unwrap();

        // center (5, 4), size 4x2 -> left 3, top 3
        assert_eq!((patch.width, patch.height), (4, 2));
        assert_eq!(&patch.pixels[..4], &[3, 3, 0, 255]);
    }

    #[test]
    fn test_extract_zero_size() {
        let region = Region::new("r", (5.0, 5.0), (0.9, 4.0), 0.0);
        assert!(extract_patch(&gradient(), &region, Interpolation::Bilinear)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_extract_near_border_is_padded() {
        let region = Region::new("r", (0.0, 0.0), (4.0, 4.0), 0.0);
        let patch = extract_patch(&gradient(), &region, Interpolation::Nearest)
            .unwrap()
            .unwrap();
        // top-left quadrant lies outside the source
        assert_eq!(&patch.pixels[..4], &[0, 0, 0, 0]);
        let inside = (2 * 4 + 2) * 4;
        assert_eq!(&patch.pixels[inside..inside + 4], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_place_uses_real_center_for_offset() {
        let patch = DecodedImage::filled(2, 2, [255, 255, 255, 255]);
        let region = Region::new("r", (5.5, 5.5), (3.0, 3.0), 0.0);
        let placed = place_patch(&patch, &region, (10, 10), Interpolation::Nearest)
            .unwrap()
            .unwrap();

        // offset trunc(5.5 - 1.5) = 4, size 3
        let covered: Vec<(usize, usize)> = placed
            .pixels
            .chunks_exact(4)
            .enumerate()
            .filter(|(_, p)| p[3] == 255)
            .map(|(i, _)| (i % 10, i / 10))
            .collect();
        assert_eq!(covered.len(), 9);
        assert_eq!(covered.first(), Some(&(4, 4)));
        assert_eq!(covered.last(), Some(&(6, 6)));
    }

    #[test]
    fn test_place_zero_size() {
        let patch = DecodedImage::filled(2, 2, [255; 4]);
        let region = Region::new("r", (5.0, 5.0), (3.0, 0.5), 0.0);
        assert!(place_patch(&patch, &region, (10, 10), Interpolation::Bilinear)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_oversized_region_is_rejected() {
        let region = Region::new("huge", (50.0, 50.0), (1e10, 1e10), 0.0);
        let err = extract_patch(&gradient(), &region, Interpolation::Bilinear).unwrap_err();
        assert!(matches!(err, RemapError::TooLarge { .. }));
        assert!(err.to_string().contains("'huge'"), "{err}");

        let patch = DecodedImage::filled(2, 2, [255; 4]);
        let err = place_patch(&patch, &region, (10, 10), Interpolation::Nearest).unwrap_err();
        assert!(matches!(err, RemapError::TooLarge { .. }));
    }

    #[test]
    fn test_patch_size_bounds() {
        let ok = Region::new("r", (0.0, 0.0), (16384.9, 16384.0), 0.0);
        assert_eq!(patch_size(&ok).unwrap(), Some((16384, 16384)));
        let nan = Region::new("r", (0.0, 0.0), (f64::INFINITY, 2.0), 0.0);
        assert!(patch_size(&nan).is_err());
    }
}
