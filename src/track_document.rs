use crate::xml_doc::{self, Element, ParseError, XmlNode};

/// One parsed recording. The ownership root for everything derived from
/// it; a cleaned copy is always a new `TrackDocument`, never an in-place
/// edit of this one.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDocument {
    pub(crate) nodes: Vec<XmlNode>,
}

impl TrackDocument {
    /// Parses input text into a document. Fails when the markup is not
    /// well-formed, or when no track point can be structurally located
    /// anywhere in the tree.
    pub fn parse(input: &str) -> Result<TrackDocument, ParseError> {
        let nodes = xml_doc::parse(input)?;
        let doc = TrackDocument { nodes };
        if doc.point_count() == 0 {
            return Err(ParseError::NoTrackPoints);
        }
        Ok(doc)
    }

    /// Raw serialized form, no formatting guarantees. Unrecognized
    /// structure (headers, namespaces, unrelated elements) round-trips
    /// unchanged.
    pub fn to_xml(&self) -> String {
        xml_doc::serialize(&self.nodes)
    }

    /// Total number of `trkpt` elements in document order, including
    /// points with missing or malformed coordinates.
    pub fn point_count(&self) -> usize {
        let mut count = 0;
        self.for_each_element(&mut |el| {
            if el.local_name() == "trkpt" {
                count += 1;
            }
        });
        count
    }

    /// Depth-first walk over every element in document order.
    pub(crate) fn for_each_element<F: FnMut(&Element)>(&self, f: &mut F) {
        fn walk<F: FnMut(&Element)>(nodes: &[XmlNode], f: &mut F) {
            for node in nodes {
                if let XmlNode::Element(el) = node {
                    f(el);
                    walk(&el.children, f);
                }
            }
        }
        walk(&self.nodes, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_POINT: &str =
        "<gpx><trk><trkseg><trkpt lat=\"1\" lon=\"2\"></trkpt></trkseg></trk></gpx>";

    #[test]
    fn parse_counts_points() {
        let doc = TrackDocument::parse(ONE_POINT).unwrap();
        assert_eq!(doc.point_count(), 1);
    }

    #[test]
    fn document_without_points_is_a_parse_error() {
        assert!(matches!(
            TrackDocument::parse("<gpx><trk><trkseg></trkseg></trk></gpx>"),
            Err(ParseError::NoTrackPoints)
        ));
    }

    #[test]
    fn malformed_point_still_counts() {
        let doc = TrackDocument::parse(
            "<gpx><trkseg><trkpt lat=\"oops\" lon=\"2\"></trkpt></trkseg></gpx>",
        )
        .unwrap();
        assert_eq!(doc.point_count(), 1);
    }

    #[test]
    fn namespaced_points_are_located() {
        let doc = TrackDocument::parse(
            "<g:gpx xmlns:g=\"urn:x\"><g:trkseg><g:trkpt lat=\"1\" lon=\"2\"></g:trkpt></g:trkseg></g:gpx>",
        )
        .unwrap();
        assert_eq!(doc.point_count(), 1);
    }
}
