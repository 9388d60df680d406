//! Reading raster files from disk.

use std::path::Path;

use super::{DecodeError, DecodedImage};

/// Load an image file, keeping its gray, RGB or RGBA layout.
///
/// The format is guessed from the file contents and extension by the
/// `image` crate.
pub fn load_image(path: &Path) -> Result<DecodedImage, DecodeError> {
    if !path.exists() {
        return Err(DecodeError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let dynamic = image::open(path).map_err(|source| DecodeError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = DecodedImage::from_dynamic(dynamic);
    tracing::debug!(
        path = %path.display(),
        width = decoded.width,
        height = decoded.height,
        layout = %decoded.layout,
        "loaded image"
    );
    Ok(decoded)
}
