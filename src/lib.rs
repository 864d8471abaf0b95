//! vmerge merges two independently-shot video clips into a single output
//! file without distorting either one.
//!
//! The pipeline has three steps:
//!
//! 1. **Plan**: `two VideoSources -> LayoutPlan` — classify each source's
//!    orientation, derive the output canvas (side by side for a portrait
//!    pair, stacked otherwise), and compose a scale-and-place transform
//!    per source ([`plan_layout`]).
//! 2. **Build**: `sources + LayoutPlan -> CompositionRequest` — two
//!    full-duration tracks, each with an opacity drop at the end of its
//!    own runtime, on a fixed 30 fps timeline ([`build_request`]).
//! 3. **Export**: `CompositionRequest -> MergeOutcome` — an
//!    [`Exporter`] writes the container file on a worker thread and the
//!    [`MergeOrchestrator`] delivers the terminal outcome exactly once
//!    through a [`MergeHandle`].
//!
//! Planning is pure computation with no IO; all external IO lives behind
//! the [`Exporter`] seam. The bundled ffmpeg exporter and `ffprobe`
//! source probing are feature-gated behind `media-ffmpeg`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compose;
mod export;
mod foundation;
mod layout;
mod media;
mod merge;

/// Shared affine transform helpers.
pub mod transform;

pub use compose::request::{CompositionRequest, CompositionTrack, build_request};
pub use export::exporter::{
    CancelToken, ContainerFormat, ExportDestination, ExportStatus, Exporter, MergeOutcome,
    QualityPreset,
};
#[cfg(feature = "media-ffmpeg")]
pub use export::ffmpeg::{FfmpegExporter, is_ffmpeg_on_path};
pub use foundation::core::{Affine, Fps, MERGE_FPS, MediaTime, Size, TimeRange, Vec2};
pub use foundation::error::{MergeError, MergeResult};
pub use layout::orientation::{Orientation, OrientationInfo, classify_orientation};
pub use layout::planner::{
    LayoutPlan, canvas_size, is_pair_portrait, placement_transform, plan_layout,
    preferred_track_size,
};
pub use media::source::{VideoSource, VideoTrackInfo, probe_source};
pub use merge::orchestrator::{MergeHandle, MergeOrchestrator};
