use crate::coordinates::CoordinateSeries;
use crate::formatter;
use crate::track_document::TrackDocument;
use crate::trimmer::{self, TrimCounts};
use crate::xml_doc::ParseError;

/// MIME type for the downloadable artifact.
pub const GPX_MIME_TYPE: &str = "application/gpx+xml";

/// One loaded recording and everything the presentation layer needs to
/// drive a cleaning session. Immutable; cleaning returns a separate
/// [`CleaningOutcome`] so the "before" view stays valid afterwards.
#[derive(Debug, Clone)]
pub struct CleaningSession {
    file_name: String,
    original: TrackDocument,
}

impl CleaningSession {
    /// Parses fully-materialized input text into a session. On failure
    /// no session exists and the caller keeps downstream actions
    /// disabled. The `.gpx` extension is advisory only.
    pub fn load(file_name: &str, input: &str) -> Result<CleaningSession, ParseError> {
        if !file_name.to_lowercase().ends_with(".gpx") {
            warn!("file {file_name} does not have .gpx extension");
        }
        let original = TrackDocument::parse(input)?;
        let session = CleaningSession {
            file_name: file_name.to_owned(),
            original,
        };
        info!(
            "loaded {} with {} track points",
            session.file_name,
            session.original_coordinates().len()
        );
        Ok(session)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn original(&self) -> &TrackDocument {
        &self.original
    }

    /// The "before" series for statistics and visualization.
    pub fn original_coordinates(&self) -> CoordinateSeries {
        CoordinateSeries::extract(&self.original)
    }

    /// Runs the trim-and-strip transformation. Cannot fail: counts are
    /// clamped and an emptied document is a valid result.
    pub fn clean(&self, counts: TrimCounts) -> CleaningOutcome {
        let cleaned = trimmer::trim(&self.original, counts);
        let cleaned_coordinates = CoordinateSeries::extract(&cleaned);
        let stats = CleaningStats::new(
            self.original_coordinates().len(),
            cleaned_coordinates.len(),
        );
        info!(
            "removed {} points, {} track points remaining",
            stats.removed_points, stats.cleaned_points
        );
        CleaningOutcome {
            file_name: self.file_name.clone(),
            cleaned,
            cleaned_coordinates,
            stats,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleaningStats {
    pub original_points: usize,
    pub cleaned_points: usize,
    pub removed_points: usize,
}

impl CleaningStats {
    fn new(original_points: usize, cleaned_points: usize) -> CleaningStats {
        CleaningStats {
            original_points,
            cleaned_points,
            removed_points: original_points - cleaned_points,
        }
    }
}

/// Result of one cleaning run: the cleaned document, its coordinate
/// projection, and summary statistics.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    file_name: String,
    pub cleaned: TrackDocument,
    pub cleaned_coordinates: CoordinateSeries,
    pub stats: CleaningStats,
}

impl CleaningOutcome {
    /// Formatted output text, ready to be saved as a file.
    pub fn document_text(&self) -> String {
        formatter::format(&self.cleaned)
    }

    /// Download name: `_cleaned` spliced in before the `.gpx`
    /// extension. A name without the extension is left unchanged.
    pub fn download_file_name(&self) -> String {
        self.file_name.replacen(".gpx", "_cleaned.gpx", 1)
    }
}
