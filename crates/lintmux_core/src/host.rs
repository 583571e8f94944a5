//! Host-context scheduling and the exclusive rendezvous.
//!
//! The presentation layer lives on a single serialized "host" context that
//! must never be touched from worker threads. Some checkers need state that
//! only exists there, so their lint work is handed to the host through a
//! single-use, single-slot rendezvous: the worker enqueues a token,
//! schedules the job, and blocks until the host has run it and signaled
//! completion. Latency is traded for correctness, and the whole mechanism
//! is opt-in per definition.

use crossbeam_channel::bounded;

/// A job queued onto the host context.
pub type HostJob = Box<dyn FnOnce() + Send>;

/// Queues work to run later on the single serialized host context.
pub trait HostScheduler: Send + Sync {
    /// Enqueues `job`; the host runs queued jobs in order.
    fn schedule(&self, job: HostJob);
}

/// Runs jobs immediately on the calling thread.
///
/// Suitable for tests and single-threaded embeddings where the caller
/// already is the host context.
#[derive(Debug, Default)]
pub struct InlineHost;

impl HostScheduler for InlineHost {
    fn schedule(&self, job: HostJob) {
        job();
    }
}

/// Runs `job` on the host context and blocks until it completes.
///
/// One producer, one consumer, exactly one handoff. Returns `None` when the
/// host dropped the job without running it (e.g. shutdown), which callers
/// surface as a host-unavailable error.
pub fn run_exclusive<T, F>(scheduler: &dyn HostScheduler, job: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (token_tx, token_rx) = bounded::<()>(1);
    let (done_tx, done_rx) = bounded::<T>(1);

    // The token is in the slot before the job is visible to the host; the
    // receiver is still alive, so the send cannot fail.
    let _ = token_tx.send(());

    scheduler.schedule(Box::new(move || {
        if token_rx.recv().is_ok() {
            let _ = done_tx.send(job());
        }
    }));

    done_rx.recv().ok()
}
