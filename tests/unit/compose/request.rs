use super::*;
use crate::layout::planner::plan_layout;
use crate::transform::affine::translate;

fn source(path: &str, secs: f64) -> VideoSource {
    VideoSource::new(
        path,
        MediaTime::from_secs_f64(secs, 600).unwrap(),
        Size::new(640.0, 480.0),
        Affine::IDENTITY,
    )
}

#[test]
fn request_for_matched_landscape_pair() {
    // Source A runs 5s, B runs 8s: A's opacity drops at its own end while
    // B continues to the end of the combined timeline.
    let a = source("a.mov", 5.0);
    let b = source("b.mov", 8.0);
    let plan = plan_layout(&a, &b);
    let request = build_request(&a, &b, &plan).unwrap();

    assert_eq!(request.canvas_size, Size::new(640.0, 960.0));
    assert_eq!(request.fps, MERGE_FPS);
    assert_eq!(request.duration, b.duration);

    let [first, second] = &request.tracks;
    assert_eq!(first.time_range, TimeRange::from_start(a.duration).unwrap());
    assert_eq!(first.fade_out_at, a.duration);
    assert_eq!(first.placement, Affine::IDENTITY);
    assert_eq!(second.time_range, TimeRange::from_start(b.duration).unwrap());
    assert_eq!(second.fade_out_at, b.duration);
    assert_eq!(second.placement, translate(0.0, 480.0));
    assert_eq!(second.natural_size, Size::new(640.0, 480.0));
}

#[test]
fn missing_track_surfaces_build_failed() {
    let a = source("a.mov", 5.0);
    let b = VideoSource::without_video_track("b.mov", MediaTime::from_secs_f64(8.0, 600).unwrap());
    let plan = plan_layout(&a, &b);
    let err = build_request(&a, &b, &plan).unwrap_err();
    assert!(matches!(err, MergeError::BuildFailed(_)));
}

#[test]
fn degenerate_plan_is_rejected_even_for_readable_sources() {
    let a = source("a.mov", 5.0);
    let b = source("b.mov", 8.0);
    let err = build_request(&a, &b, &LayoutPlan::degenerate()).unwrap_err();
    assert!(matches!(err, MergeError::BuildFailed(_)));
}

#[test]
fn zero_duration_source_is_rejected() {
    let a = source("a.mov", 5.0);
    let b = VideoSource::new(
        "b.mov",
        MediaTime::ZERO,
        Size::new(640.0, 480.0),
        Affine::IDENTITY,
    );
    let plan = plan_layout(&a, &b);
    let err = build_request(&a, &b, &plan).unwrap_err();
    assert!(matches!(err, MergeError::BuildFailed(_)));
}

#[test]
fn request_round_trips_through_json() {
    let a = source("a.mov", 5.0);
    let b = source("b.mov", 8.0);
    let plan = plan_layout(&a, &b);
    let request = build_request(&a, &b, &plan).unwrap();
    let json = serde_json::to_string(&request).unwrap();
    let back: CompositionRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, request);
}
