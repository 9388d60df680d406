//! Error classification shared by every module.
//!
//! Each module defines its own `thiserror` enum next to the code that raises
//! it. [`ErrorCategory`] groups those errors by how a caller should react:
//! input errors skip one batch item, geometry errors skip one element or
//! region, configuration errors abort the operation.

use std::fmt;

/// How an error affects the surrounding operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing file, unreadable image, malformed JSON. The batch continues
    /// past the affected item.
    Input,
    /// Unsupported transform, shear, missing canvas size. The offending
    /// element is skipped and extraction continues.
    Geometry,
    /// Unknown coordinate system, empty remap output. Fatal for the operation.
    Configuration,
    /// Writing a result failed.
    Output,
}

impl ErrorCategory {
    /// Whether an error of this category ends the whole operation rather
    /// than a single item.
    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorCategory::Configuration)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorCategory::Input => "input error",
            ErrorCategory::Geometry => "geometry error",
            ErrorCategory::Configuration => "configuration error",
            ErrorCategory::Output => "output error",
        };
        f.write_str(label)
    }
}
