//! Batch scheduling of conversion jobs onto a bounded worker pool.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crossbeam_channel::{bounded, Sender};

use super::ffmpeg::Transcoder;
use super::job::{ConversionJob, JobResult};

/// Jobs per batch. A batch must finish before the next one starts.
pub const BATCH_SIZE: usize = 5;

/// Concurrent workers per batch.
pub const WORKER_POOL_SIZE: usize = 5;

/// Events from the scheduler to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// A batch was submitted to the pool
    BatchStarted { index: usize, names: Vec<String> },
    /// A job finished; `active` lists the jobs of the batch still running
    JobFinished {
        result: JobResult,
        active: Vec<String>,
    },
    /// All batches are done
    RunFinished,
    /// The run thread stopped before finishing
    RunAborted { error: String },
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Run every job, `BATCH_SIZE` at a time, reporting through `events`.
///
/// Blocks until the last batch completes. A failing or panicking job is
/// reported as failed and never stops the run.
pub fn run_batches(
    jobs: &[ConversionJob],
    transcoder: &dyn Transcoder,
    events: &Sender<WorkerEvent>,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for (index, batch) in jobs.chunks(BATCH_SIZE).enumerate() {
        let names: Vec<String> = batch.iter().map(|j| j.display_name.clone()).collect();
        log::info!("Batch {}: {} file(s)", index + 1, batch.len());
        let _ = events.send(WorkerEvent::BatchStarted {
            index,
            names: names.clone(),
        });

        run_batch(batch, transcoder, |finished, result| {
            if result.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }

            let active = names
                .iter()
                .enumerate()
                .filter(|(i, _)| !finished[*i])
                .map(|(_, n)| n.clone())
                .collect();
            let _ = events.send(WorkerEvent::JobFinished { result, active });
        });

        summary.batches += 1;
    }

    log::info!(
        "Run finished: {} succeeded, {} failed in {} batch(es)",
        summary.succeeded,
        summary.failed,
        summary.batches
    );
    let _ = events.send(WorkerEvent::RunFinished);
    summary
}

/// Run one batch on the pool, calling `on_done` in completion order.
///
/// `on_done` receives the per-slot "finished" flags and the job result.
fn run_batch<F>(batch: &[ConversionJob], transcoder: &dyn Transcoder, mut on_done: F)
where
    F: FnMut(&[bool], JobResult),
{
    let (job_tx, job_rx) = bounded::<(usize, &ConversionJob)>(batch.len());
    let (result_tx, result_rx) = bounded::<(usize, JobResult)>(batch.len());

    for item in batch.iter().enumerate() {
        let _ = job_tx.send(item);
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..WORKER_POOL_SIZE.min(batch.len()) {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for (slot, job) in job_rx.iter() {
                    let _ = result_tx.send((slot, execute(job, transcoder)));
                }
            });
        }
        drop(result_tx);

        let mut finished = vec![false; batch.len()];
        for (slot, result) in result_rx.iter() {
            finished[slot] = true;
            on_done(&finished, result);
        }
    });
}

/// Run a single job, turning errors and panics into a failed result.
fn execute(job: &ConversionJob, transcoder: &dyn Transcoder) -> JobResult {
    match panic::catch_unwind(AssertUnwindSafe(|| transcoder.transcode(job))) {
        Ok(Ok(())) => {
            log::info!("Converted {}", job.display_name);
            JobResult::succeeded(&job.display_name)
        }
        Ok(Err(e)) => {
            log::error!("Failed to convert {}: {}", job.display_name, e);
            JobResult::failed(&job.display_name, e.to_string())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("Worker panicked on {}: {}", job.display_name, message);
            JobResult::failed(&job.display_name, message)
        }
    }
}

pub(super) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
