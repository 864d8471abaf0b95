//! The exporter seam: terminal statuses, output destinations, and the
//! cancellation token threaded through an export.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::compose::request::CompositionRequest;
use crate::foundation::error::{MergeError, MergeResult};

/// Terminal status of an asynchronous export, delivered exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ExportStatus {
    /// The output file was written.
    Completed,
    /// The exporter reported an error.
    Failed,
    /// The export was cancelled before completion.
    Cancelled,
}

/// Terminal outcome of one merge invocation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MergeOutcome {
    /// Terminal status.
    pub status: ExportStatus,
    /// Written file location; present iff `status` is `Completed`.
    pub output: Option<PathBuf>,
    /// Failure description when `status` is `Failed`.
    pub failure: Option<String>,
}

impl MergeOutcome {
    /// A completed outcome carrying the written file's location.
    pub fn completed(output: impl Into<PathBuf>) -> Self {
        Self {
            status: ExportStatus::Completed,
            output: Some(output.into()),
            failure: None,
        }
    }

    /// A failed outcome carrying the exporter's error text.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: ExportStatus::Failed,
            output: None,
            failure: Some(reason.into()),
        }
    }

    /// A cancelled outcome.
    pub fn cancelled() -> Self {
        Self {
            status: ExportStatus::Cancelled,
            output: None,
            failure: None,
        }
    }
}

/// Output container format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ContainerFormat {
    /// QuickTime container.
    #[default]
    Mov,
    /// MP4 container.
    Mp4,
}

impl ContainerFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ContainerFormat::Mov => "mov",
            ContainerFormat::Mp4 => "mp4",
        }
    }
}

/// Encoder quality preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QualityPreset {
    /// Highest quality the encoder offers.
    #[default]
    Highest,
    /// Balanced quality/size.
    Medium,
    /// Smallest output.
    Low,
}

/// Where and how an export writes its output.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportDestination {
    /// Caller-writable directory for the output file.
    pub directory: PathBuf,
    /// Output container format.
    pub container: ContainerFormat,
    /// Encoder quality preset.
    pub quality: QualityPreset,
}

impl ExportDestination {
    /// Destination in `directory` with the default container and quality.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            container: ContainerFormat::default(),
            quality: QualityPreset::default(),
        }
    }

    /// Create the directory if needed and derive the timestamped output
    /// path for one merge. Second-resolution timestamps keep successive
    /// merges on distinct paths.
    pub fn resolve_output_path(&self) -> MergeResult<PathBuf> {
        use anyhow::Context as _;
        std::fs::create_dir_all(&self.directory).with_context(|| {
            format!(
                "failed to create output directory '{}'",
                self.directory.display()
            )
        })?;
        let stamp = chrono::Local::now().format("%Y-%m-%d %H.%M.%S");
        Ok(self
            .directory
            .join(format!("merged-video-{stamp}.{}", self.container.extension())))
    }
}

/// One-shot cancellation flag shared between a caller and an in-flight
/// export. Cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once [`CancelToken::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The compositor/exporter collaborator: consumes a composition request
/// and writes a single container file.
///
/// `export` blocks; the orchestrator owns the worker thread and the
/// exactly-once completion delivery. Implementations must return
/// [`MergeError::Cancelled`] when they stop in response to the token, and
/// must not leave a partial file behind on the returned path in that case.
pub trait Exporter: Send + Sync {
    /// Run the export to `out_path`, checking `cancel` periodically.
    fn export(
        &self,
        request: &CompositionRequest,
        out_path: &Path,
        cancel: &CancelToken,
    ) -> MergeResult<PathBuf>;
}

impl MergeOutcome {
    /// Map an exporter's return value to its terminal outcome.
    pub(crate) fn from_export_result(result: MergeResult<PathBuf>) -> Self {
        match result {
            Ok(path) => MergeOutcome::completed(path),
            Err(MergeError::Cancelled) => MergeOutcome::cancelled(),
            Err(e) => MergeOutcome::failed(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
