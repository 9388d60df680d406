//! Region names of SVG elements.
//!
//! Editors store layer names in different places. Inkscape writes
//! `inkscape:label`, Affinity Designer writes `serif:id` (or drops it and
//! names the enclosing group), most others only have a plain `id`.

use roxmltree::Node;

use super::{INKSCAPE_NS, SERIF_NS, SVG_NS};

/// Name of `node` itself: `inkscape:label`, then `serif:id`, then `id`.
///
/// Empty attribute values count as absent.
pub fn element_name<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    [
        node.attribute((INKSCAPE_NS, "label")),
        node.attribute((SERIF_NS, "id")),
        node.attribute("id"),
    ]
    .into_iter()
    .flatten()
    .find(|name| !name.is_empty())
}

/// Name of a rectangle, falling back to its parent `<g>`.
pub fn resolve_name<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    element_name(node).or_else(|| {
        node.parent_element()
            .filter(|parent| parent.has_tag_name((SVG_NS, "g")))
            .and_then(element_name)
    })
}
