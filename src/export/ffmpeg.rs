//! System-ffmpeg compositor/exporter.
//!
//! Each placement transform is lowered to a transpose/scale chain plus an
//! overlay position, composited over a black canvas with per-track
//! `enable` windows for the end-of-clip opacity drop, then encoded with
//! libx264. We intentionally use the system `ffmpeg` binary rather than
//! native bindings to avoid FFmpeg dev header/lib requirements.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use kurbo::Rect;
use tracing::{debug, info, warn};

use crate::compose::request::{CompositionRequest, CompositionTrack};
use crate::export::exporter::{CancelToken, Exporter, QualityPreset};
use crate::foundation::error::{MergeError, MergeResult};
use crate::transform::affine::decompose_quarter_turn;

/// Poll interval for child status and cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exporter backed by the system `ffmpeg` binary.
#[derive(Clone, Copy, Debug)]
pub struct FfmpegExporter {
    quality: QualityPreset,
}

impl FfmpegExporter {
    /// Build an exporter, verifying `ffmpeg` is reachable on `PATH`.
    pub fn new(quality: QualityPreset) -> MergeResult<Self> {
        if !is_ffmpeg_on_path() {
            return Err(MergeError::export(
                "ffmpeg is required for merging, but was not found on PATH",
            ));
        }
        Ok(Self { quality })
    }
}

/// True when an `ffmpeg` binary responds on `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

impl Exporter for FfmpegExporter {
    fn export(
        &self,
        request: &CompositionRequest,
        out_path: &Path,
        cancel: &CancelToken,
    ) -> MergeResult<PathBuf> {
        let args = command_args(request, out_path, self.quality)?;
        debug!(?args, "spawning ffmpeg");

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| MergeError::export(format!("failed to spawn ffmpeg: {e}")))?;

        let status = loop {
            if cancel.is_cancelled() {
                warn!("export cancelled; killing ffmpeg");
                let _ = child.kill();
                let _ = child.wait();
                let _ = std::fs::remove_file(out_path);
                return Err(MergeError::Cancelled);
            }
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    return Err(MergeError::export(format!(
                        "failed to poll ffmpeg status: {e}"
                    )));
                }
            }
        };

        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            return Err(MergeError::export(format!(
                "ffmpeg merge failed for '{}': {}",
                out_path.display(),
                stderr.trim()
            )));
        }

        info!(out = %out_path.display(), "merge export completed");
        Ok(out_path.to_path_buf())
    }
}

/// Full `ffmpeg` argument list for one merge, excluding the binary name.
fn command_args(
    request: &CompositionRequest,
    out_path: &Path,
    quality: QualityPreset,
) -> MergeResult<Vec<String>> {
    validate_canvas(request)?;

    let mut args: Vec<String> = vec!["-y".into(), "-loglevel".into(), "error".into()];
    for track in &request.tracks {
        args.push("-i".into());
        args.push(track.source_path.display().to_string());
    }
    args.push("-filter_complex".into());
    args.push(filter_graph(request)?);

    let (preset, crf) = match quality {
        QualityPreset::Highest => ("slow", "18"),
        QualityPreset::Medium => ("medium", "23"),
        QualityPreset::Low => ("veryfast", "28"),
    };

    args.extend(
        [
            "-map",
            "[vout]",
            "-t",
            &format!("{:.3}", request.duration.as_secs_f64()),
            "-an",
            "-c:v",
            "libx264",
            "-preset",
            preset,
            "-crf",
            crf,
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .map(String::from),
    );
    args.push(out_path.display().to_string());
    Ok(args)
}

/// The overlay graph: a black base the size of the canvas, one
/// transpose/scale chain per input, and two chained overlays with
/// per-track visibility windows.
fn filter_graph(request: &CompositionRequest) -> MergeResult<String> {
    let (w, h) = (
        request.canvas_size.width.round() as i64,
        request.canvas_size.height.round() as i64,
    );
    let mut graph = format!(
        "color=c=black:s={w}x{h}:r={}/{}:d={:.3}[base]",
        request.fps.num,
        request.fps.den,
        request.duration.as_secs_f64()
    );

    let mut layers = Vec::with_capacity(request.tracks.len());
    for (idx, track) in request.tracks.iter().enumerate() {
        let layer = track_layer(track)?;
        graph.push_str(&format!(";[{idx}:v]{}[v{idx}]", layer.chain));
        layers.push(layer);
    }

    let mut base = "base".to_string();
    for (idx, layer) in layers.iter().enumerate() {
        let label = if idx + 1 == layers.len() {
            "vout".to_string()
        } else {
            format!("m{idx}")
        };
        graph.push_str(&format!(
            ";[{base}][v{idx}]overlay=x={}:y={}:enable='lt(t,{:.3})'[{label}]",
            layer.x, layer.y, layer.visible_until
        ));
        base = label;
    }
    Ok(graph)
}

struct TrackLayer {
    chain: String,
    x: i64,
    y: i64,
    visible_until: f64,
}

fn track_layer(track: &CompositionTrack) -> MergeResult<TrackLayer> {
    let rst = decompose_quarter_turn(track.placement)?;
    let bbox = track.placement.transform_rect_bbox(Rect::new(
        0.0,
        0.0,
        track.natural_size.width,
        track.natural_size.height,
    ));

    let scaled_w = (bbox.width().round() as i64).max(1);
    let scaled_h = (bbox.height().round() as i64).max(1);
    let mut chain = match rst.quarter_turns {
        1 => "transpose=1,".to_string(),
        2 => "hflip,vflip,".to_string(),
        3 => "transpose=2,".to_string(),
        _ => String::new(),
    };
    chain.push_str(&format!("scale={scaled_w}:{scaled_h}"));

    Ok(TrackLayer {
        chain,
        x: bbox.x0.round() as i64,
        y: bbox.y0.round() as i64,
        visible_until: track.fade_out_at.as_secs_f64(),
    })
}

fn validate_canvas(request: &CompositionRequest) -> MergeResult<()> {
    let w = request.canvas_size.width.round() as i64;
    let h = request.canvas_size.height.round() as i64;
    if w <= 0 || h <= 0 {
        return Err(MergeError::validation("canvas width/height must be non-zero"));
    }
    if w % 2 != 0 || h % 2 != 0 {
        // We target yuv420p output for maximum player compatibility.
        return Err(MergeError::validation(
            "canvas width/height must be even (required for yuv420p output)",
        ));
    }
    Ok(())
}
