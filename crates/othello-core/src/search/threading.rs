//! Resident two-worker coordination.
//!
//! The pool owns one secondary worker thread, created with the engine and
//! kept for its lifetime; each turn submits a job over a channel instead of
//! spawning threads per turn. The primary "worker" is the calling thread
//! itself. When the secondary cannot be started the pool degrades to serial
//! operation; correctness never depends on the second worker existing.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;

use crate::board::Board;
use crate::constants::MAX_WORKERS;
use crate::disc::Disc;
use crate::eval::MoveEvaluator;
use crate::move_list::ConcurrentMoveIterator;
use crate::search::context::SearchContext;
use crate::search::search_result::SearchResult;
use crate::search::{SearchProgressCallback, WorkerId};
use crate::strategy::{EvalMode, StrategyProfile};

/// One root-search assignment for the secondary worker.
///
/// Both workers run the identical loop over the same shared cursor; the job
/// only carries the read-only inputs.
pub(crate) struct WorkerJob {
    pub board: Board,
    pub color: Disc,
    pub cursor: Arc<ConcurrentMoveIterator>,
    pub profile: StrategyProfile,
    pub mode: EvalMode,
    pub evaluator: MoveEvaluator,
    pub callback: Option<Arc<SearchProgressCallback>>,
}

struct Worker {
    job_tx: Sender<WorkerJob>,
    result_rx: Receiver<Option<SearchResult>>,
    handle: JoinHandle<()>,
}

/// Fixed-size pool holding the resident secondary worker, if one exists.
pub(crate) struct WorkerPool {
    worker: Option<Worker>,
}

impl WorkerPool {
    /// Creates the pool, clamping the worker count to the machine and to the
    /// two-worker protocol. Spawn failure is non-fatal: it is logged and the
    /// pool runs serial.
    pub fn new(n_threads: usize) -> WorkerPool {
        let n_workers = n_threads.min(num_cpus::get()).clamp(1, MAX_WORKERS);
        if n_workers < 2 {
            return WorkerPool { worker: None };
        }

        let (job_tx, job_rx) = channel::<WorkerJob>();
        let (result_tx, result_rx) = channel::<Option<SearchResult>>();
        match std::thread::Builder::new()
            .name("search-worker".into())
            .spawn(move || worker_loop(job_rx, result_tx))
        {
            Ok(handle) => WorkerPool {
                worker: Some(Worker {
                    job_tx,
                    result_rx,
                    handle,
                }),
            },
            Err(err) => {
                log::warn!("could not start secondary search worker, running serial: {err}");
                WorkerPool { worker: None }
            }
        }
    }

    /// Whether a secondary worker is available.
    pub fn has_secondary(&self) -> bool {
        self.worker.is_some()
    }

    /// Hands a job to the secondary worker.
    ///
    /// Returns `false` when there is no worker (or it has died); the caller
    /// then processes the entire cursor alone.
    pub fn submit(&self, job: WorkerJob) -> bool {
        match &self.worker {
            Some(worker) => worker.job_tx.send(job).is_ok(),
            None => false,
        }
    }

    /// Blocks until the secondary worker reports its best result for the
    /// previously submitted job.
    pub fn await_result(&self) -> Option<SearchResult> {
        match &self.worker {
            Some(worker) => match worker.result_rx.recv() {
                Ok(result) => result,
                Err(err) => {
                    log::warn!("secondary search worker dropped its result: {err}");
                    None
                }
            },
            None => None,
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            // Closing the job channel ends the loop; then reap the thread.
            drop(worker.job_tx);
            drop(worker.result_rx);
            let _ = worker.handle.join();
        }
    }
}

fn worker_loop(jobs: Receiver<WorkerJob>, results: Sender<Option<SearchResult>>) {
    while let Ok(job) = jobs.recv() {
        let mut ctx = SearchContext::new(
            job.profile,
            job.mode,
            job.evaluator,
            job.callback.clone(),
            WorkerId::Secondary,
        );
        let best = ctx.evaluate_candidates(&job.board, job.color, &job.cursor);
        if results.send(best).is_err() {
            break;
        }
    }
}
