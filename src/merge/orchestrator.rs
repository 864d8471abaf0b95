//! Driving one asynchronous export and delivering its terminal outcome
//! exactly once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError, sync_channel};

use tracing::{info, warn};

use crate::compose::request::CompositionRequest;
use crate::export::exporter::{CancelToken, ExportDestination, Exporter, MergeOutcome};
use crate::foundation::error::{MergeError, MergeResult};

/// Drives exports against one [`Exporter`].
///
/// A single export may be in flight per orchestrator instance; a second
/// [`MergeOrchestrator::merge`] while one is running is a validation
/// error. Callers that want concurrent merges use separate instances,
/// which share no mutable state.
pub struct MergeOrchestrator<E: Exporter> {
    exporter: Arc<E>,
    in_flight: Arc<AtomicBool>,
}

impl<E: Exporter + 'static> MergeOrchestrator<E> {
    /// Build an orchestrator around an exporter.
    pub fn new(exporter: E) -> Self {
        Self {
            exporter: Arc::new(exporter),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True while an export is running.
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submit a composition request for export.
    ///
    /// Non-blocking: the export runs on its own worker thread and the
    /// returned [`MergeHandle`] resumes the caller exactly once with the
    /// terminal outcome. The request is consumed; it cannot be exported
    /// twice.
    pub fn merge(
        &self,
        request: CompositionRequest,
        destination: &ExportDestination,
    ) -> MergeResult<MergeHandle> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(MergeError::validation(
                "a merge is already in flight on this orchestrator",
            ));
        }

        let out_path = match destination.resolve_output_path() {
            Ok(path) => path,
            Err(e) => {
                self.in_flight.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        info!(out = %out_path.display(), "starting merge export");

        let (tx, rx) = sync_channel::<MergeOutcome>(1);
        let cancel = CancelToken::new();
        let exporter = Arc::clone(&self.exporter);
        let in_flight = Arc::clone(&self.in_flight);
        let worker_cancel = cancel.clone();

        std::thread::spawn(move || {
            let result = exporter.export(&request, &out_path, &worker_cancel);
            let outcome = MergeOutcome::from_export_result(result);
            if let Some(reason) = &outcome.failure {
                warn!(%reason, "merge export failed");
            }
            in_flight.store(false, Ordering::SeqCst);
            // The handle may already be dropped; the outcome is then
            // discarded, which is the caller's choice.
            let _ = tx.send(outcome);
        });

        Ok(MergeHandle { rx, cancel })
    }
}

/// One-shot handle to an in-flight export.
///
/// The terminal [`MergeOutcome`] is delivered exactly once; `wait`
/// consumes the handle so a completion cannot be observed twice.
#[derive(Debug)]
pub struct MergeHandle {
    rx: Receiver<MergeOutcome>,
    cancel: CancelToken,
}

impl MergeHandle {
    /// Block until the export terminates and return its outcome.
    pub fn wait(self) -> MergeResult<MergeOutcome> {
        self.rx.recv().map_err(|_| {
            MergeError::export("exporter terminated without reporting an outcome")
        })
    }

    /// Outcome if the export already terminated, without blocking.
    pub fn try_poll(&self) -> Option<MergeOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Request cancellation of the in-flight export.
    ///
    /// The export transitions to `Cancelled` once the exporter observes
    /// the token; the success path, including any downstream save side
    /// effect, is skipped.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// The cancellation token shared with the exporter.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/merge/orchestrator.rs"]
mod tests;
