use std::path::{Path, PathBuf};

use crate::foundation::core::{Affine, MediaTime, Size};
use crate::foundation::error::MergeResult;

#[cfg(feature = "media-ffmpeg")]
use crate::foundation::error::MergeError;

/// Metadata of a source's first decodable video track.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoTrackInfo {
    /// Stored pixel dimensions, before the orientation transform is applied.
    pub natural_size: Size,
    /// Stored-vs-displayed orientation as a 2D affine transform.
    pub preferred_transform: Affine,
}

/// A decodable media stream plus the metadata the planner needs.
///
/// Sources are immutable once loaded and are only ever borrowed read-only
/// by the planner and the orchestrator. `track` is `None` when the
/// container has no decodable video track; the planner degrades to a
/// degenerate plan in that case rather than failing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoSource {
    /// Location of the underlying container file.
    pub source_path: PathBuf,
    /// Total stream duration.
    pub duration: MediaTime,
    /// First video track, if the container has one.
    pub track: Option<VideoTrackInfo>,
}

impl VideoSource {
    /// Build a source with a video track.
    pub fn new(
        source_path: impl Into<PathBuf>,
        duration: MediaTime,
        natural_size: Size,
        preferred_transform: Affine,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            duration,
            track: Some(VideoTrackInfo {
                natural_size,
                preferred_transform,
            }),
        }
    }

    /// Build a source whose container has no decodable video track.
    pub fn without_video_track(source_path: impl Into<PathBuf>, duration: MediaTime) -> Self {
        Self {
            source_path: source_path.into(),
            duration,
            track: None,
        }
    }
}

/// Timescale used for probed durations, in units per second.
#[cfg(feature = "media-ffmpeg")]
const PROBE_TIMESCALE: u32 = 600;

/// Probe a container with `ffprobe` and build a [`VideoSource`].
///
/// Stream rotation side-data (or the legacy `rotate` tag) is folded into
/// the track's `preferred_transform` the same way camera containers store
/// it: a quarter-turn matrix plus the translation that keeps the displayed
/// frame in the positive quadrant.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_source(source_path: &Path) -> MergeResult<VideoSource> {
    #[derive(serde::Deserialize)]
    struct ProbeSideData {
        rotation: Option<f64>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeTags {
        rotate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<f64>,
        height: Option<f64>,
        side_data_list: Option<Vec<ProbeSideData>>,
        tags: Option<ProbeTags>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| MergeError::unreadable_source(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(MergeError::unreadable_source(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| MergeError::serde(format!("ffprobe json parse failed: {e}")))?;

    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let duration = MediaTime::from_secs_f64(duration_sec, PROBE_TIMESCALE)?;

    let Some(video) = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
    else {
        return Ok(VideoSource::without_video_track(source_path, duration));
    };

    let (Some(width), Some(height)) = (video.width, video.height) else {
        return Ok(VideoSource::without_video_track(source_path, duration));
    };
    let natural_size = Size::new(width, height);

    // Tag value and display-matrix rotation use opposite signs for the
    // same display rotation.
    let rotation_deg = video
        .tags
        .as_ref()
        .and_then(|t| t.rotate.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| {
            video
                .side_data_list
                .as_ref()
                .and_then(|l| l.iter().find_map(|d| d.rotation))
                .map(|r| -r)
        })
        .unwrap_or(0.0);

    Ok(VideoSource::new(
        source_path,
        duration,
        natural_size,
        transform_for_rotation(rotation_deg, natural_size),
    ))
}

/// Stub used when the `media-ffmpeg` feature is disabled.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_source(_source_path: &Path) -> MergeResult<VideoSource> {
    Err(crate::foundation::error::MergeError::unreadable_source(
        "probing sources requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
fn transform_for_rotation(rotation_deg: f64, natural: Size) -> Affine {
    let quarter = (rotation_deg / 90.0).round();
    if (rotation_deg / 90.0 - quarter).abs() > 1e-3 {
        return Affine::IDENTITY;
    }
    match (quarter as i64).rem_euclid(4) {
        1 => Affine::new([0.0, 1.0, -1.0, 0.0, natural.height, 0.0]),
        2 => Affine::new([-1.0, 0.0, 0.0, -1.0, natural.width, natural.height]),
        3 => Affine::new([0.0, -1.0, 1.0, 0.0, 0.0, natural.width]),
        _ => Affine::IDENTITY,
    }
}
