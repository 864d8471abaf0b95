use super::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::compose::request::build_request;
use crate::export::exporter::ExportStatus;
use crate::foundation::core::{Affine, MediaTime, Size};
use crate::layout::planner::plan_layout;
use crate::media::source::VideoSource;

fn request() -> CompositionRequest {
    let a = VideoSource::new(
        "a.mov",
        MediaTime::from_secs_f64(5.0, 600).unwrap(),
        Size::new(640.0, 480.0),
        Affine::IDENTITY,
    );
    let b = VideoSource::new(
        "b.mov",
        MediaTime::from_secs_f64(8.0, 600).unwrap(),
        Size::new(640.0, 480.0),
        Affine::IDENTITY,
    );
    let plan = plan_layout(&a, &b);
    build_request(&a, &b, &plan).unwrap()
}

/// Writes an empty file and reports it, after an optional pause.
struct StubExporter {
    delay: Duration,
}

impl Exporter for StubExporter {
    fn export(
        &self,
        _request: &CompositionRequest,
        out_path: &Path,
        cancel: &CancelToken,
    ) -> MergeResult<PathBuf> {
        let deadline = std::time::Instant::now() + self.delay;
        while std::time::Instant::now() < deadline {
            if cancel.is_cancelled() {
                return Err(MergeError::Cancelled);
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        std::fs::write(out_path, b"").map_err(|e| MergeError::export(e.to_string()))?;
        Ok(out_path.to_path_buf())
    }
}

struct FailingExporter;

impl Exporter for FailingExporter {
    fn export(
        &self,
        _request: &CompositionRequest,
        _out_path: &Path,
        _cancel: &CancelToken,
    ) -> MergeResult<PathBuf> {
        Err(MergeError::export("track attach failed"))
    }
}

fn dest(dir: &tempfile::TempDir) -> ExportDestination {
    ExportDestination::new(dir.path())
}

#[test]
fn completed_export_reports_the_written_path() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = MergeOrchestrator::new(StubExporter {
        delay: Duration::ZERO,
    });
    let handle = orchestrator.merge(request(), &dest(&dir)).unwrap();
    let outcome = handle.wait().unwrap();
    assert_eq!(outcome.status, ExportStatus::Completed);
    let path = outcome.output.unwrap();
    assert!(path.exists());
    assert!(!orchestrator.is_running());
}

#[test]
fn failed_export_reports_failure_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = MergeOrchestrator::new(FailingExporter);
    let handle = orchestrator.merge(request(), &dest(&dir)).unwrap();
    let outcome = handle.wait().unwrap();
    assert_eq!(outcome.status, ExportStatus::Failed);
    assert!(outcome.output.is_none());
    assert!(outcome.failure.unwrap().contains("track attach failed"));
}

#[test]
fn cancellation_skips_the_success_path() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = MergeOrchestrator::new(StubExporter {
        delay: Duration::from_secs(30),
    });
    let handle = orchestrator.merge(request(), &dest(&dir)).unwrap();
    handle.cancel();
    let outcome = handle.wait().unwrap();
    assert_eq!(outcome.status, ExportStatus::Cancelled);
    assert!(outcome.output.is_none());
}

#[test]
fn second_merge_while_running_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = MergeOrchestrator::new(StubExporter {
        delay: Duration::from_secs(30),
    });
    let handle = orchestrator.merge(request(), &dest(&dir)).unwrap();
    assert!(orchestrator.is_running());

    let err = orchestrator.merge(request(), &dest(&dir)).unwrap_err();
    assert!(matches!(err, MergeError::Validation(_)));

    handle.cancel();
    let _ = handle.wait().unwrap();
}

#[test]
fn orchestrator_is_reusable_after_a_terminal_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = MergeOrchestrator::new(StubExporter {
        delay: Duration::ZERO,
    });
    let first = orchestrator.merge(request(), &dest(&dir)).unwrap();
    assert_eq!(first.wait().unwrap().status, ExportStatus::Completed);
    let second = orchestrator.merge(request(), &dest(&dir)).unwrap();
    assert_eq!(second.wait().unwrap().status, ExportStatus::Completed);
}

#[test]
fn try_poll_returns_none_until_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let orchestrator = MergeOrchestrator::new(StubExporter {
        delay: Duration::from_millis(500),
    });
    let handle = orchestrator.merge(request(), &dest(&dir)).unwrap();
    assert!(handle.try_poll().is_none());
    let outcome = handle.wait().unwrap();
    assert_eq!(outcome.status, ExportStatus::Completed);
}
