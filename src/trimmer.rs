use crate::track_document::TrackDocument;
use crate::xml_doc::{Element, XmlNode};

/// Number of points to drop from the front and back of every segment.
/// Built via [`TrimCounts::clamped`] so negative inputs degrade to zero
/// instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimCounts {
    pub start: usize,
    pub end: usize,
}

impl TrimCounts {
    pub fn new(start: usize, end: usize) -> TrimCounts {
        TrimCounts { start, end }
    }

    pub fn clamped(start: i64, end: i64) -> TrimCounts {
        TrimCounts {
            start: start.max(0) as usize,
            end: end.max(0) as usize,
        }
    }
}

/// Produces a cleaned copy of `doc`: per segment, drops the first
/// `counts.start` and last `counts.end` points (the whole segment's
/// points when the counts cover it), and strips the `extensions`
/// payload from every retained point document-wide. The input document
/// is never mutated. Total function, no error path.
pub fn trim(doc: &TrackDocument, counts: TrimCounts) -> TrackDocument {
    TrackDocument {
        nodes: doc.nodes.iter().map(|node| trim_node(node, counts)).collect(),
    }
}

fn trim_node(node: &XmlNode, counts: TrimCounts) -> XmlNode {
    match node {
        XmlNode::Element(el) if el.local_name() == "trkseg" => {
            XmlNode::Element(trim_segment(el, counts))
        }
        // A point outside any segment still loses its extensions.
        XmlNode::Element(el) if el.local_name() == "trkpt" => {
            XmlNode::Element(strip_extensions(el, counts))
        }
        XmlNode::Element(el) => XmlNode::Element(Element {
            name: el.name.clone(),
            attributes: el.attributes.clone(),
            children: el.children.iter().map(|c| trim_node(c, counts)).collect(),
            self_closing: el.self_closing,
        }),
        other => other.clone(),
    }
}

fn trim_segment(segment: &Element, counts: TrimCounts) -> Element {
    let total = segment
        .children
        .iter()
        .filter(|c| is_track_point(c))
        .count();

    // Counts covering the whole segment empty it; the segment node
    // itself is retained. Otherwise keep the middle run untouched.
    let keep = if counts.start.saturating_add(counts.end) >= total {
        0..0
    } else {
        counts.start..(total - counts.end)
    };

    let mut children = Vec::with_capacity(segment.children.len());
    let mut point_index = 0;
    let mut just_dropped = false;
    for child in &segment.children {
        if is_track_point(child) {
            let kept = keep.contains(&point_index);
            point_index += 1;
            if kept {
                if let XmlNode::Element(el) = child {
                    children.push(XmlNode::Element(strip_extensions(el, counts)));
                }
                just_dropped = false;
            } else {
                just_dropped = true;
            }
        } else if just_dropped && child.is_whitespace_text() {
            // Layout whitespace belonging to a dropped point goes with it.
            just_dropped = false;
        } else {
            children.push(trim_node(child, counts));
            just_dropped = false;
        }
    }

    Element {
        name: segment.name.clone(),
        attributes: segment.attributes.clone(),
        children,
        self_closing: segment.self_closing,
    }
}

/// Removes any `extensions` child of a retained point. Happens for
/// every point in every segment, independent of the trim counts.
fn strip_extensions(point: &Element, counts: TrimCounts) -> Element {
    let mut children = Vec::with_capacity(point.children.len());
    let mut just_dropped = false;
    for child in &point.children {
        let is_extensions = child
            .as_element()
            .is_some_and(|el| el.local_name() == "extensions");
        if is_extensions {
            just_dropped = true;
        } else if just_dropped && child.is_whitespace_text() {
            just_dropped = false;
        } else {
            children.push(trim_node(child, counts));
            just_dropped = false;
        }
    }
    Element {
        name: point.name.clone(),
        attributes: point.attributes.clone(),
        children,
        self_closing: point.self_closing,
    }
}

fn is_track_point(node: &XmlNode) -> bool {
    node.as_element().is_some_and(|el| el.local_name() == "trkpt")
}
