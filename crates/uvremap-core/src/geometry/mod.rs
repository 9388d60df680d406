//! 2D affine transforms as written in vector drawings.
//!
//! A `transform` attribute is a list of tokens such as
//! `translate(10 20) rotate(30)`. [`parse_transform`] turns one attribute
//! into an [`AffineMatrix`]; [`compose_chain`] folds the attributes of an
//! element and all of its ancestors into the single matrix that maps the
//! element's local coordinates onto the canvas.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downwards
//! - Angles are in degrees; `rotate(θ)` turns clockwise on screen

mod affine;
mod parse;

pub use affine::AffineMatrix;
pub use parse::{parse_transform, TransformError};

/// Compose the transforms of an element chain into one global transform.
///
/// `transforms` yields the `transform` attribute of the element itself first,
/// then of each ancestor up to the root (`None` where an element has none).
/// Each one is left-multiplied onto the accumulated matrix, so the child's
/// transform applies to a point before its parent's does.
pub fn compose_chain<'a, I>(transforms: I) -> Result<AffineMatrix, TransformError>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    transforms
        .into_iter()
        .flatten()
        .try_fold(AffineMatrix::IDENTITY, |global, expr| {
            Ok(parse_transform(expr)? * global)
        })
}
