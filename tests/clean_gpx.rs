use assert_float_eq::assert_float_absolute_eq;
use gpxtrim_core::api::session::{CleaningSession, GPX_MIME_TYPE};
use gpxtrim_core::coordinates::CoordinateSeries;
use gpxtrim_core::track_document::TrackDocument;
use gpxtrim_core::trimmer::TrimCounts;
use std::fs;

fn load_fixture(name: &str) -> CleaningSession {
    let input = fs::read_to_string(format!("./tests/data/{name}")).unwrap();
    CleaningSession::load(name, &input).unwrap()
}

fn read_back(text: &str) -> gpx::Gpx {
    gpx::read(text.as_bytes()).unwrap()
}

#[test]
fn clean_short_ride() {
    let session = load_fixture("short_ride.gpx");
    assert_eq!(session.original_coordinates().len(), 5);

    let outcome = session.clean(TrimCounts::new(2, 1));
    assert_eq!(outcome.stats.original_points, 5);
    assert_eq!(outcome.stats.cleaned_points, 2);
    assert_eq!(outcome.stats.removed_points, 3);
    assert_eq!(outcome.download_file_name(), "short_ride_cleaned.gpx");

    // Points at indices 2 and 3 of the original survive.
    assert_float_absolute_eq!(outcome.cleaned_coordinates.latitudes[0], 37.7751);
    assert_float_absolute_eq!(outcome.cleaned_coordinates.latitudes[1], 37.7752);
    assert_float_absolute_eq!(outcome.cleaned_coordinates.longitudes[0], -122.4196);

    let text = outcome.document_text();
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(!text.contains("<extensions>"));
    assert!(text.contains("<ele>102</ele>"));

    // The emitted document is real GPX again.
    let gpx = read_back(&text);
    assert_eq!(gpx.tracks.len(), 1);
    assert_eq!(gpx.tracks[0].segments.len(), 1);
    let points = &gpx.tracks[0].segments[0].points;
    assert_eq!(points.len(), 2);
    assert_float_absolute_eq!(points[0].point().y(), 37.7751);
    assert_float_absolute_eq!(points[0].point().x(), -122.4196);
    assert!(points[0].time.is_some());
}

#[test]
fn segments_are_trimmed_independently() {
    let session = load_fixture("two_segments.gpx");
    assert_eq!(session.original_coordinates().len(), 10);

    let outcome = session.clean(TrimCounts::new(1, 1));
    assert_eq!(outcome.stats.cleaned_points, 6);

    let gpx = read_back(&outcome.document_text());
    assert_eq!(gpx.tracks[0].segments.len(), 2);
    assert_eq!(gpx.tracks[0].segments[0].points.len(), 2);
    assert_eq!(gpx.tracks[0].segments[1].points.len(), 4);
}

#[test]
fn counts_covering_every_segment_empty_the_document() {
    let session = load_fixture("two_segments.gpx");
    let outcome = session.clean(TrimCounts::new(3, 3));

    assert_eq!(outcome.stats.cleaned_points, 0);
    assert_eq!(outcome.stats.removed_points, 10);
    assert!(outcome.cleaned_coordinates.is_empty());
    assert_eq!(outcome.cleaned_coordinates.bounding_box(), None);

    // Segment nodes survive, emptied.
    let gpx = read_back(&outcome.document_text());
    assert_eq!(gpx.tracks[0].segments.len(), 2);
    assert!(gpx.tracks[0].segments[0].points.is_empty());
    assert!(gpx.tracks[0].segments[1].points.is_empty());
}

#[test]
fn formatting_does_not_alter_coordinates() {
    let input = fs::read_to_string("./tests/data/short_ride.gpx").unwrap();
    let original = TrackDocument::parse(&input).unwrap();
    let before = CoordinateSeries::extract(&original);

    let session = CleaningSession::load("short_ride.gpx", &input).unwrap();
    let text = session.clean(TrimCounts::default()).document_text();
    let after = CoordinateSeries::extract(&TrackDocument::parse(&text).unwrap());

    assert_eq!(before, after);
}

#[test]
fn unrecognized_structure_round_trips() {
    let session = load_fixture("short_ride.gpx");
    let text = session.clean(TrimCounts::default()).document_text();
    assert!(text.contains("<metadata>"));
    assert!(text.contains("<name>Short ride</name>"));
    assert!(text.contains("xmlns:ns3=\"http://www.garmin.com/xmlschemas/TrackPointExtension/v1\""));
}

#[test]
fn malformed_input_produces_no_session() {
    assert!(CleaningSession::load("broken.gpx", "<gpx><trk></gpx>").is_err());
    assert!(CleaningSession::load("broken.gpx", "not xml at all").is_err());
}

#[test]
fn mime_type_is_gpx() {
    assert_eq!(GPX_MIME_TYPE, "application/gpx+xml");
}
