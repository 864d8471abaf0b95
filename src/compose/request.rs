//! Assembly of the immutable composition request handed to the exporter.

use std::path::PathBuf;

use crate::foundation::core::{Affine, Fps, MERGE_FPS, MediaTime, Size, TimeRange};
use crate::foundation::error::{MergeError, MergeResult};
use crate::layout::planner::LayoutPlan;
use crate::media::source::VideoSource;

/// One timed track of the merged composition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositionTrack {
    /// Location of the track's container file.
    pub source_path: PathBuf,
    /// Stored pixel dimensions of the track, pre-orientation.
    pub natural_size: Size,
    /// Portion of the source on the timeline; always the full source
    /// duration starting at zero.
    pub time_range: TimeRange,
    /// Scale-and-place transform onto the canvas.
    pub placement: Affine,
    /// Point at which the track's opacity drops to zero: the end of the
    /// track's *own* duration, not the combined timeline. Whichever clip
    /// is shorter visually drops out while the other runs to the end.
    pub fade_out_at: MediaTime,
}

/// The full, immutable description of one merge: two timed tracks, the
/// canvas, and the fixed output frame rate. Built once per invocation and
/// consumed by at most one export.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositionRequest {
    /// The two tracks, in input order.
    pub tracks: [CompositionTrack; 2],
    /// Pixel dimensions of the output frame.
    pub canvas_size: Size,
    /// Output frame rate; fixed at 30 fps.
    pub fps: Fps,
    /// Combined timeline length: the longer of the two source durations.
    pub duration: MediaTime,
}

/// Assemble a [`CompositionRequest`] from two sources and their layout
/// plan.
///
/// Unlike the system this reimplements, every unbuildable input surfaces
/// an explicit error instead of silently dropping the merge: callers get a
/// [`MergeError::BuildFailed`] they can report rather than a completion
/// that never arrives.
pub fn build_request(
    first: &VideoSource,
    second: &VideoSource,
    plan: &LayoutPlan,
) -> MergeResult<CompositionRequest> {
    if plan.is_degenerate() {
        return Err(MergeError::build_failed(
            "layout plan is degenerate: a source has no decodable video track",
        ));
    }
    let tracks = [
        composition_track("first", first, plan.placements[0])?,
        composition_track("second", second, plan.placements[1])?,
    ];

    Ok(CompositionRequest {
        tracks,
        canvas_size: plan.canvas_size,
        fps: MERGE_FPS,
        duration: first.duration.max(second.duration),
    })
}

fn composition_track(
    label: &str,
    source: &VideoSource,
    placement: Affine,
) -> MergeResult<CompositionTrack> {
    let Some(info) = source.track else {
        return Err(MergeError::build_failed(format!(
            "{label} source '{}' has no decodable video track",
            source.source_path.display()
        )));
    };
    if !source.duration.is_positive() {
        return Err(MergeError::build_failed(format!(
            "{label} source '{}' has a non-positive duration",
            source.source_path.display()
        )));
    }
    Ok(CompositionTrack {
        source_path: source.source_path.clone(),
        natural_size: info.natural_size,
        time_range: TimeRange::from_start(source.duration)?,
        placement,
        fade_out_at: source.duration,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/request.rs"]
mod tests;
