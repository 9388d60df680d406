//! Core raster types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ErrorCategory;

/// Error types for image loading and resampling.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The image file does not exist.
    #[error("image file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read or decoded.
    #[error("failed to load image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Width or height is zero where a real image is required.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer length does not match width, height and layout.
    #[error("pixel buffer holds {actual} bytes, a {width}x{height} {layout} image needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        layout: ChannelLayout,
        expected: usize,
        actual: usize,
    },
}

impl DecodeError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Input
    }
}

/// Channel arrangement of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    Gray,
    Rgb,
    Rgba,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelLayout::Gray => "gray",
            ChannelLayout::Rgb => "RGB",
            ChannelLayout::Rgba => "RGBA",
        })
    }
}

/// Sampling used when rotating and resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Weighted average of the neighbouring pixels.
    #[default]
    Bilinear,
    /// Closest pixel; keeps hard edges in pixel art.
    Nearest,
}

impl Interpolation {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Interpolation::Bilinear => image::imageops::FilterType::Triangle,
            Interpolation::Nearest => image::imageops::FilterType::Nearest,
        }
    }
}

/// An 8-bit image with 1, 3 or 4 interleaved channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    pub layout: ChannelLayout,
    /// Row-major pixel data, `layout.channels()` bytes per pixel.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wrap a pixel buffer, checking its length.
    pub fn new(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        pixels: Vec<u8>,
    ) -> Result<Self, DecodeError> {
        let expected = width as usize * height as usize * layout.channels();
        if pixels.len() != expected {
            return Err(DecodeError::BufferSize {
                width,
                height,
                layout,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            pixels,
        })
    }

    /// Fully transparent RGBA canvas.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// RGBA canvas where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            layout: ChannelLayout::Rgba,
            pixels: rgba.repeat(count),
        }
    }

    /// Convert any decoded image, keeping gray, RGB or RGBA as it is.
    ///
    /// Higher bit depths are reduced to 8 bits; gray with alpha becomes RGBA.
    pub fn from_dynamic(img: image::DynamicImage) -> Self {
        use image::ColorType;

        let (width, height) = (img.width(), img.height());
        let (layout, pixels) = match img.color() {
            ColorType::L8 | ColorType::L16 => (ChannelLayout::Gray, img.into_luma8().into_raw()),
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => {
                (ChannelLayout::Rgb, img.into_rgb8().into_raw())
            }
            _ => (ChannelLayout::Rgba, img.into_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            layout,
            pixels,
        }
    }

    /// Copy expanded to 4 channels; missing alpha becomes opaque.
    pub fn to_rgba(&self) -> DecodedImage {
        let pixels = match self.layout {
            ChannelLayout::Rgba => self.pixels.clone(),
            ChannelLayout::Rgb => self
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            ChannelLayout::Gray => self.pixels.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        };
        DecodedImage {
            width: self.width,
            height: self.height,
            layout: ChannelLayout::Rgba,
            pixels,
        }
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// True when every channel of every pixel is zero.
    pub fn is_all_zero(&self) -> bool {
        self.pixels.iter().all(|&v| v == 0)
    }
}
