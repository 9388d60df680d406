//! Axis-aligned crop and paste in pixel coordinates.
//!
//! Both operations accept rectangles that reach past the image border:
//! a crop pads the missing part with zero, a paste drops it.

use crate::composite::CompositeError;
use crate::decode::DecodedImage;

/// Top-left offset of a span of `size` centered on `center`, truncated toward zero.
///
/// # Example
///
/// ```ignore
/// assert_eq!(centered_offset(50.0, 20.0), 40);
/// assert_eq!(centered_offset(3.0, 10.0), -2);
/// ```
#[inline]
pub fn centered_offset(center: f64, size: f64) -> i64 {
    (center - size / 2.0).trunc() as i64
}

/// Rows of the overlap between a span `[offset, offset + len)` and `[0, limit)`.
///
/// Returns `(start inside span, start inside limit, length)`.
fn overlap(offset: i64, len: u32, limit: u32) -> Option<(usize, usize, usize)> {
    let start = offset.max(0);
    let end = offset.saturating_add(i64::from(len)).min(i64::from(limit));
    (end > start).then(|| ((start - offset) as usize, start as usize, (end - start) as usize))
}

/// Cut a `width` x `height` rectangle with its top-left corner at `(left, top)`.
///
/// The result has the layout of `image`; parts outside `image` are zero.
pub fn crop(image: &DecodedImage, left: i64, top: i64, width: u32, height: u32) -> DecodedImage {
    let channels = image.channels();
    let mut pixels = vec![0u8; width as usize * height as usize * channels];

    if let (Some((dx, sx, w)), Some((dy, sy, h))) = (
        overlap(left, width, image.width),
        overlap(top, height, image.height),
    ) {
        let src_stride = image.width as usize * channels;
        let dst_stride = width as usize * channels;
        for row in 0..h {
            let src = (sy + row) * src_stride + sx * channels;
            let dst = (dy + row) * dst_stride + dx * channels;
            pixels[dst..dst + w * channels].copy_from_slice(&image.pixels[src..src + w * channels]);
        }
    }

    DecodedImage {
        width,
        height,
        layout: image.layout,
        pixels,
    }
}

/// Overwrite `canvas` with `patch` placed at `(left, top)`.
///
/// Pixels of `patch` falling outside `canvas` are dropped.
pub fn paste(
    canvas: &mut DecodedImage,
    patch: &DecodedImage,
    left: i64,
    top: i64,
) -> Result<(), CompositeError> {
    if canvas.layout != patch.layout {
        return Err(CompositeError::LayoutMismatch {
            expected: canvas.layout,
            actual: patch.layout,
        });
    }

    let (Some((sx, dx, w)), Some((sy, dy, h))) = (
        overlap(left, patch.width, canvas.width),
        overlap(top, patch.height, canvas.height),
    ) else {
        return Ok(());
    };

    let channels = canvas.channels();
    let src_stride = patch.width as usize * channels;
    let dst_stride = canvas.width as usize * channels;
    for row in 0..h {
        let src = (sy + row) * src_stride + sx * channels;
        let dst = (dy + row) * dst_stride + dx * channels;
        canvas.pixels[dst..dst + w * channels].copy_from_slice(&patch.pixels[src..src + w * channels]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ChannelLayout;

    fn numbered(width: u32, height: u32) -> DecodedImage {
        let pixels = (0..width * height).map(|v| v as u8 + 1).collect();
        DecodedImage::new(width, height, ChannelLayout::Gray, pixels).unwrap()
    }

    #[test]
    fn test_centered_offset_truncates_toward_zero() {
        assert_eq!(centered_offset(50.0, 20.0), 40);
        assert_eq!(centered_offset(50.0, 21.0), 39);
        assert_eq!(centered_offset(100.7, 60.0), 70);
        assert_eq!(centered_offset(3.0, 10.0), -2);
        assert_eq!(centered_offset(2.0, 5.0), 0);
    }

    #[test]
    fn test_crop_inside() {
        let img = numbered(4, 4);
        let out = crop(&img, 1, 1, 2, 2);
        assert_eq!(out.pixels, vec![6, 7, 10, 11]);
    }

    #[test]
    fn test_crop_pads_outside() {
        let img = numbered(3, 3);
        let out = crop(&img, -1, -1, 3, 2);
        assert_eq!(out.pixels, vec![0, 0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_crop_fully_outside() {
        let img = numbered(3, 3);
        let out = crop(&img, 10, 0, 2, 2);
        assert!(out.is_all_zero());
        assert_eq!((out.width, out.height), (2, 2));
    }

    #[test]
    fn test_extreme_offsets_do_not_overflow() {
        let img = numbered(3, 3);
        assert!(crop(&img, i64::MAX - 1, i64::MIN, 2, 2).is_all_zero());

        let mut canvas = numbered(3, 3);
        paste(&mut canvas, &numbered(2, 2), i64::MAX, 0).unwrap();
        assert_eq!(canvas, numbered(3, 3));
    }

    #[test]
    fn test_crop_keeps_layout() {
        let img = DecodedImage::filled(4, 4, [1, 2, 3, 4]);
        let out = crop(&img, 0, 0, 2, 1);
        assert_eq!(out.layout, ChannelLayout::Rgba);
        assert_eq!(out.pixels, vec![1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_paste_inside() {
        let mut canvas = DecodedImage::new(4, 3, ChannelLayout::Gray, vec![0; 12]).unwrap();
        paste(&mut canvas, &numbered(2, 2), 1, 1).unwrap();
        assert_eq!(canvas.pixels, vec![0, 0, 0, 0, 0, 1, 2, 0, 0, 3, 4, 0]);
    }

    #[test]
    fn test_paste_clipped() {
        let mut canvas = DecodedImage::new(3, 2, ChannelLayout::Gray, vec![0; 6]).unwrap();
        paste(&mut canvas, &numbered(2, 2), 2, -1).unwrap();
        assert_eq!(canvas.pixels, vec![0, 0, 3, 0, 0, 0]);
    }

    #[test]
    fn test_paste_outside_is_noop() {
        let mut canvas = DecodedImage::new(2, 2, ChannelLayout::Gray, vec![9; 4]).unwrap();
        paste(&mut canvas, &numbered(2, 2), -5, 0).unwrap();
        assert_eq!(canvas.pixels, vec![9; 4]);
    }

    #[test]
    fn test_paste_layout_mismatch() {
        let mut canvas = DecodedImage::transparent(2, 2);
        let err = paste(&mut canvas, &numbered(1, 1), 0, 0).unwrap_err();
        assert!(matches!(err, CompositeError::LayoutMismatch { .. }));
    }
}
