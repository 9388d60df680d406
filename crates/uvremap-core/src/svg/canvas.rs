//! Canvas size of an SVG document.

use roxmltree::Node;

/// Numeric prefix of an SVG length such as `"500"`, `"500px"` or `"-2.5e1mm"`.
///
/// Percentages are relative to a viewport we do not know and yield `None`,
/// as does text without a leading number.
pub fn parse_length(text: &str) -> Option<f64> {
    let text = text.trim();
    let end = number_prefix_len(text);
    if end == 0 || text[end..].trim_start().starts_with('%') {
        return None;
    }
    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Length in bytes of the leading `[+-]digits[.digits][(e|E)[+-]digits]`.
fn number_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

/// `(width, height)` of the `viewBox` attribute, if it holds four numbers.
fn view_box_size(root: Node) -> Option<(f64, f64)> {
    let values: Vec<f64> = root
        .attribute("viewBox")?
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f64>().ok())
        .collect::<Option<_>>()?;
    match values.as_slice() {
        [_, _, w, h] => Some((*w, *h)),
        _ => None,
    }
}

fn usable(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Canvas size of the document rooted at `root`.
///
/// Each dimension comes from the `viewBox` when it is positive there and
/// from the `width`/`height` attribute otherwise. `None` when a dimension
/// is available from neither.
pub fn canvas_size(root: Node) -> Option<(f64, f64)> {
    let (vb_width, vb_height) = match view_box_size(root) {
        Some((w, h)) => (usable(w), usable(h)),
        None => (None, None),
    };
    let attr = |name: &str| root.attribute(name).and_then(parse_length).and_then(usable);

    let width = vb_width.or_else(|| attr("width"))?;
    let height = vb_height.or_else(|| attr("height"))?;
    Some((width, height))
}
