//! Conversion between relative and absolute coordinates.

use super::{Annotation, AnnotationError, CanvasSpec, CoordinateSystem, Region};

/// Scale a relative region to pixels on a `width` x `height` canvas.
pub fn denormalize_region(region: &Region, (width, height): (f64, f64)) -> Region {
    Region {
        name: region.name.clone(),
        center: (region.center.0 * width, region.center.1 * height),
        size: (region.size.0 * width, region.size.1 * height),
        angle: region.angle,
    }
}

/// Divide an absolute region by the canvas size.
pub fn normalize_region(region: &Region, (width, height): (f64, f64)) -> Region {
    Region {
        name: region.name.clone(),
        center: (region.center.0 / width, region.center.1 / height),
        size: (region.size.0 / width, region.size.1 / height),
        angle: region.angle,
    }
}

/// Move `annotation` into `target` coordinates using `canvas_size`.
///
/// An annotation already in `target` is returned unchanged apart from its
/// canvas size, which becomes `canvas_size` when converting. Angles never
/// change.
pub fn convert(
    annotation: &Annotation,
    target: CoordinateSystem,
    canvas_size: (f64, f64),
) -> Result<Annotation, AnnotationError> {
    if annotation.coordinate_system() == target {
        return Ok(annotation.clone());
    }
    let canvas = CanvasSpec::new(canvas_size.0, canvas_size.1, target)?;
    let converted = match target {
        CoordinateSystem::Absolute => {
            annotation.map_regions(canvas, |r| denormalize_region(r, canvas_size))
        }
        CoordinateSystem::Relative => {
            annotation.map_regions(canvas, |r| normalize_region(r, canvas_size))
        }
    };
    Ok(converted)
}

/// Absolute copy of `annotation` for a canvas of `canvas_size` pixels.
///
/// Absolute annotations are returned as they are: their pixel values do not
/// depend on the canvas they are drawn on.
pub fn to_absolute(
    annotation: &Annotation,
    canvas_size: (f64, f64),
) -> Result<Annotation, AnnotationError> {
    convert(annotation, CoordinateSystem::Absolute, canvas_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relative() -> Annotation {
        let canvas = CanvasSpec::new(100.0, 100.0, CoordinateSystem::Relative).unwrap();
        let mut ann = Annotation::new(canvas);
        ann.insert(Region::new("head", (0.5, 0.25), (0.2, 0.1), 30.0)).unwrap();
        ann.insert(Region::new("tail", (0.1, 0.9), (0.05, 0.05), -15.0)).unwrap();
        ann
    }

    #[test]
    fn test_relative_to_absolute() {
        let abs = to_absolute(&relative(), (400.0, 200.0)).unwrap();

        assert_eq!(abs.coordinate_system(), CoordinateSystem::Absolute);
        assert_eq!(abs.canvas().width, 400.0);
        assert_eq!(abs.canvas().height, 200.0);

        let head = abs.get("head").unwrap();
        assert_eq!(head.center, (200.0, 50.0));
        assert_eq!(head.size, (80.0, 20.0));
        assert_eq!(head.angle, 30.0);

        let names: Vec<_> = abs.regions().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["head", "tail"]);
    }

    #[test]
    fn test_absolute_is_untouched() {
        let abs = to_absolute(&relative(), (400.0, 200.0)).unwrap();
        let again = to_absolute(&abs, (10.0, 10.0)).unwrap();
        assert_eq!(again, abs);
    }

    #[test]
    fn test_absolute_to_relative() {
        let abs = to_absolute(&relative(), (400.0, 200.0)).unwrap();
        let rel = convert(&abs, CoordinateSystem::Relative, (400.0, 200.0)).unwrap();

        assert_eq!(rel.coordinate_system(), CoordinateSystem::Relative);
        let head = rel.get("head").unwrap();
        assert!((head.center.0 - 0.5).abs() < 1e-12);
        assert!((head.size.1 - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_target_canvas() {
        let err = to_absolute(&relative(), (0.0, 100.0)).unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidCanvas { .. }));
    }
}
