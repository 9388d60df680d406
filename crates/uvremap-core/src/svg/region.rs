//! Geometry of a single `<rect>` under its global transform.

use roxmltree::Node;

use super::canvas::parse_length;
use crate::annotation::{CanvasSpec, CoordinateSystem, Region};
use crate::diagnostics::Warning;
use crate::geometry::AffineMatrix;

/// Largest accepted deviation of a transformed corner from a right angle.
const SHEAR_TOLERANCE_DEGREES: f64 = 1e-3;

/// Untransformed `x`, `y`, `width` and `height` of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectGeometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Read the geometry attributes of `node`. Missing ones default to 0.
    pub fn from_node(node: Node, name: &str) -> Result<Self, Warning> {
        let read = |attribute: &'static str| -> Result<f64, Warning> {
            match node.attribute(attribute) {
                None => Ok(0.0),
                Some(value) => parse_length(value).ok_or_else(|| Warning::InvalidAttribute {
                    name: name.to_string(),
                    attribute,
                    value: value.to_string(),
                }),
            }
        };
        Ok(Self::new(read("x")?, read("y")?, read("width")?, read("height")?))
    }

    fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Turn a rectangle and its global transform into a region on `canvas`.
///
/// The rectangle is rejected when it has no area or when the transform
/// shears it. The angle is that of the transformed vertical axis, so a
/// `rotate(θ)` yields `-θ`: positive region angles turn counter-clockwise
/// on screen.
pub fn region_from_rect(
    name: &str,
    rect: &RectGeometry,
    transform: &AffineMatrix,
    canvas: &CanvasSpec,
) -> Result<Region, Warning> {
    let degenerate = || Warning::DegenerateRegion {
        name: name.to_string(),
    };
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return Err(degenerate());
    }

    let p0 = transform.transform_point((rect.x, rect.y));
    let p1 = transform.transform_point((rect.x + rect.width, rect.y));
    let p2 = transform.transform_point((rect.x + rect.width, rect.y + rect.height));
    let edge1 = (p1.0 - p0.0, p1.1 - p0.1);
    let edge2 = (p2.0 - p1.0, p2.1 - p1.1);
    let len1 = edge1.0.hypot(edge1.1);
    let len2 = edge2.0.hypot(edge2.1);
    if !(len1 > 0.0 && len2 > 0.0 && len1.is_finite() && len2.is_finite()) {
        return Err(degenerate());
    }

    let cos = ((edge1.0 * edge2.0 + edge1.1 * edge2.1) / (len1 * len2)).clamp(-1.0, 1.0);
    let corner_angle = cos.acos().to_degrees();
    if (corner_angle - 90.0).abs() > SHEAR_TOLERANCE_DEGREES {
        return Err(Warning::ShearDetected {
            name: name.to_string(),
            corner_angle,
        });
    }

    let mut center = transform.transform_point(rect.center());
    let (scale_x, scale_y) = transform.axis_scales();
    let mut size = (rect.width * scale_x, rect.height * scale_y);

    let (up_x, up_y) = transform.transform_vector((0.0, 1.0));
    let mut angle = up_x.atan2(up_y).to_degrees();
    if angle == 0.0 {
        // folds -0.0
        angle = 0.0;
    }

    if canvas.coordinate_system == CoordinateSystem::Relative {
        center = (center.0 / canvas.width, center.1 / canvas.height);
        size = (size.0 / canvas.width, size.1 / canvas.height);
    }

    tracing::debug!(
        region = name,
        cx = center.0,
        cy = center.1,
        w = size.0,
        h = size.1,
        angle,
        "extracted region"
    );
    Ok(Region::new(name, center, size, angle))
}
