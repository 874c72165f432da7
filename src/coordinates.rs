use itertools::Itertools;
use itertools::MinMaxResult;

use crate::track_document::TrackDocument;

/// Flattened lat/lon projection of a document, in document order across
/// segments (segment boundaries are intentionally not preserved). Used
/// for statistics and for before/after rendering; always recomputed,
/// never stored alongside the document.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSeries {
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

impl CoordinateSeries {
    pub fn extract(doc: &TrackDocument) -> CoordinateSeries {
        let mut latitudes = Vec::new();
        let mut longitudes = Vec::new();
        doc.for_each_element(&mut |el| {
            if el.local_name() != "trkpt" {
                return;
            }
            let lat = el.attribute("lat").and_then(parse_coordinate);
            let lon = el.attribute("lon").and_then(parse_coordinate);
            // A point missing either coordinate is skipped, not an error.
            if let (Some(lat), Some(lon)) = (lat, lon) {
                latitudes.push(lat);
                longitudes.push(lon);
            }
        });
        CoordinateSeries {
            latitudes,
            longitudes,
        }
    }

    pub fn len(&self) -> usize {
        self.latitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latitudes.is_empty()
    }

    /// `(min_lat, max_lat, min_lon, max_lon)` over the whole series, for
    /// the presentation layer's viewport scaling. `None` when empty.
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let (min_lat, max_lat) = minmax(&self.latitudes)?;
        let (min_lon, max_lon) = minmax(&self.longitudes)?;
        Some((min_lat, max_lat, min_lon, max_lon))
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn minmax(values: &[f64]) -> Option<(f64, f64)> {
    match values.iter().copied().minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}
