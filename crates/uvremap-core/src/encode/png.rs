//! PNG encoding for remap results.
//!
//! Every result is written with four channels, whatever layout it has in
//! memory: gray coverage masks become opaque gray RGBA.

use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::decode::DecodedImage;
use crate::error::ErrorCategory;

/// Errors that can occur while writing images.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EncodeError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Output
    }
}

/// Encode an image as RGBA8 PNG bytes.
pub fn encode_png(image: &DecodedImage) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = image.pixel_count() * image.channels();
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let rgba = image.to_rgba();
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(&rgba.pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(bytes)
}

/// Encode `image` and write it to `path`.
pub fn save_png(image: &DecodedImage, path: &Path) -> Result<(), EncodeError> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes).map_err(|source| EncodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "image saved");
    Ok(())
}
