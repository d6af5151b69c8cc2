//! Background thread driving a conversion run.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::batch::{panic_message, run_batches, RunSummary, WorkerEvent};
use super::ffmpeg::Transcoder;
use super::job::ConversionJob;

/// Handle for a running conversion.
///
/// The scheduler runs on its own thread so the UI event loop stays
/// responsive; results come back only through the event channel.
pub struct ConversionRunner {
    /// Event channel from worker
    event_rx: Receiver<WorkerEvent>,
    /// Worker thread handle
    worker_handle: Option<JoinHandle<RunSummary>>,
    /// Set once the run thread failed to start or died without finishing
    aborted: Option<String>,
}

impl ConversionRunner {
    /// Spawn the run thread for `jobs`.
    pub fn start(jobs: Vec<ConversionJob>, transcoder: Arc<dyn Transcoder>) -> Self {
        log::info!("Starting conversion of {} file(s)", jobs.len());
        Self::spawn(move |events| run_batches(&jobs, transcoder.as_ref(), events))
    }

    /// Spawn `run` on the run thread, handing it the event sender.
    pub fn spawn<F>(run: F) -> Self
    where
        F: FnOnce(&Sender<WorkerEvent>) -> RunSummary + Send + 'static,
    {
        let (event_tx, event_rx) = unbounded::<WorkerEvent>();

        let spawned = thread::Builder::new()
            .name("conversion-run".to_string())
            .spawn(move || run(&event_tx));

        match spawned {
            Ok(handle) => Self {
                event_rx,
                worker_handle: Some(handle),
                aborted: None,
            },
            Err(e) => {
                log::error!("Failed to spawn conversion thread: {}", e);
                Self {
                    event_rx,
                    worker_handle: None,
                    aborted: Some(format!("Failed to start conversion: {}", e)),
                }
            }
        }
    }

    /// Poll for worker events (non-blocking).
    ///
    /// A run thread that exits without `RunFinished` yields `RunAborted`.
    pub fn poll_events(&mut self) -> Vec<WorkerEvent> {
        // Checked before draining so every event sent before exit is seen
        let exited = self.is_finished();
        let mut events: Vec<WorkerEvent> = self.event_rx.try_iter().collect();

        if exited && !events.contains(&WorkerEvent::RunFinished) {
            if let Some(handle) = self.worker_handle.take() {
                let error = match handle.join() {
                    Ok(_) => "Conversion thread stopped unexpectedly".to_string(),
                    Err(payload) => {
                        format!("Conversion thread panicked: {}", panic_message(payload.as_ref()))
                    }
                };
                log::error!("{}", error);
                self.aborted = Some(error);
            }
            if let Some(error) = self.aborted.clone() {
                events.push(WorkerEvent::RunAborted { error });
            }
        }
        events
    }

    /// Whether the run thread has exited (or never started).
    pub fn is_finished(&self) -> bool {
        self.worker_handle
            .as_ref()
            .map(|h| h.is_finished())
            .unwrap_or(true)
    }

    /// Block until the run completes and return its totals.
    pub fn wait(mut self) -> Option<RunSummary> {
        self.worker_handle.take().and_then(|h| match h.join() {
            Ok(summary) => Some(summary),
            Err(payload) => {
                log::error!("Conversion thread panicked: {}", panic_message(payload.as_ref()));
                None
            }
        })
    }
}

impl Drop for ConversionRunner {
    fn drop(&mut self) {
        if let Some(handle) = self.worker_handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                // No cancellation: the run keeps going until the process exits
                log::warn!("Conversion still running; detaching run thread");
            }
        }
    }
}
