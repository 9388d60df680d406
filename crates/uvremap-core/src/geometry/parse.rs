//! Parser for `transform` attribute values.
//!
//! Grammar (separators are whitespace and/or commas):
//! ```text
//! transform-list := token*
//! token          := name '(' number* ')'
//! name           := translate | scale | rotate | matrix | skewX | skewY
//! ```
//! Tokens compose left to right: `translate(10) scale(2)` scales first and
//! then translates a point, like nested groups would.

use thiserror::Error;

use super::AffineMatrix;
use crate::error::ErrorCategory;

/// Errors raised while parsing a transform expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The token name is not one of the supported transforms.
    #[error("unsupported transform: {0}")]
    Unsupported(String),

    /// The text does not follow the `name(args)` shape.
    #[error("malformed transform expression: '{0}'")]
    Malformed(String),

    /// An argument is not a number.
    #[error("invalid number '{value}' in {name}()")]
    InvalidNumber { name: String, value: String },

    /// Wrong number of arguments for the token.
    #[error("{name}() takes {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: &'static str,
        got: usize,
    },
}

impl TransformError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Geometry
    }
}

/// Parse a transform attribute value into one matrix.
///
/// An empty or blank expression is the identity.
///
/// # Errors
///
/// - [`TransformError::Unsupported`] for an unknown token name
/// - [`TransformError::Malformed`] for unbalanced or garbled text
/// - [`TransformError::InvalidNumber`] / [`TransformError::Arity`] for bad arguments
pub fn parse_transform(expr: &str) -> Result<AffineMatrix, TransformError> {
    let mut matrix = AffineMatrix::IDENTITY;
    let mut rest = expr.trim_start_matches(is_separator);

    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| TransformError::Malformed(rest.trim().to_string()))?;
        let close = rest[open..]
            .find(')')
            .map(|i| open + i)
            .ok_or_else(|| TransformError::Malformed(rest.trim().to_string()))?;

        let name = rest[..open].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TransformError::Malformed(rest[..=close].trim().to_string()));
        }

        let args = parse_args(name, &rest[open + 1..close])?;
        matrix = matrix * token_matrix(name, &args)?;

        rest = rest[close + 1..].trim_start_matches(is_separator);
    }

    Ok(matrix)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn parse_args(name: &str, text: &str) -> Result<Vec<f64>, TransformError> {
    text.split(is_separator)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| TransformError::InvalidNumber {
                    name: name.to_string(),
                    value: s.to_string(),
                })
        })
        .collect()
}

fn token_matrix(name: &str, args: &[f64]) -> Result<AffineMatrix, TransformError> {
    let arity = |expected: &'static str| TransformError::Arity {
        name: name.to_string(),
        expected,
        got: args.len(),
    };

    match name {
        "translate" => match *args {
            [tx] => Ok(AffineMatrix::translate(tx, 0.0)),
            [tx, ty] => Ok(AffineMatrix::translate(tx, ty)),
            _ => Err(arity("1 or 2")),
        },
        "scale" => match *args {
            [s] => Ok(AffineMatrix::scale(s, s)),
            [sx, sy] => Ok(AffineMatrix::scale(sx, sy)),
            _ => Err(arity("1 or 2")),
        },
        "rotate" => match *args {
            [angle] => Ok(AffineMatrix::rotate(angle)),
            [angle, cx, cy] => Ok(AffineMatrix::rotate_about(angle, cx, cy)),
            _ => Err(arity("1 or 3")),
        },
        "matrix" => match *args {
            [a, b, c, d, e, f] => Ok(AffineMatrix::new(a, b, c, d, e, f)),
            _ => Err(arity("6")),
        },
        "skewX" => match *args {
            [angle] => Ok(AffineMatrix::skew_x(angle)),
            _ => Err(arity("1")),
        },
        "skewY" => match *args {
            [angle] => Ok(AffineMatrix::skew_y(angle)),
            _ => Err(arity("1")),
        },
        other => Err(TransformError::Unsupported(other.to_string())),
    }
}
