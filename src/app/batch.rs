// SocLookup - app/batch.rs
//
// Batch lookup lifecycle. Classifies, resolves and opens many artifacts on a
// background thread, sending progress messages to the caller via an mpsc
// channel.
//
// Architecture:
//   - `BatchManager` lives on the caller's thread; `run_batch` runs on a
//     background thread.
//   - An `Arc<AtomicBool>` cancel flag stops the batch cooperatively. It is
//     checked before each item and between sleep slices of the throttle.
//   - Items are processed strictly one after another. No item failure
//     aborts the batch: invalid lines are skipped, opener errors are logged.

use crate::core::classifier;
use crate::core::dispatch::{self, UrlOpener};
use crate::core::history::HistoryStore;
use crate::core::model::{ArtifactType, ClassificationOutcome, LookupService};
use crate::core::resolver;
use crate::util::constants::BATCH_SLEEP_SLICE_MS;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use url::Url;

// =============================================================================
// Request and progress types
// =============================================================================

/// Everything the worker needs to know about one batch.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Raw input lines, untrimmed.
    pub lines: Vec<String>,
    /// Type the user is looking up; services are resolved under this type.
    pub kind: ArtifactType,
    /// Upper bound on processed lines.
    pub max_items: usize,
    /// Open URLs without stealing focus.
    pub open_in_background: bool,
    /// Pause between items.
    pub delay: Duration,
}

impl BatchRequest {
    /// Build a request from newline-separated text.
    pub fn from_text(text: &str, kind: ArtifactType, max_items: usize, delay: Duration) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            kind,
            max_items,
            open_in_background: true,
            delay,
        }
    }
}

/// Counters reported when a batch ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Items that classified as valid and were looked up.
    pub processed: usize,
    /// Items skipped because they did not classify.
    pub skipped: usize,
    /// Non-empty lines after truncation to `max_items`.
    pub queued: usize,
    /// Non-empty lines before truncation.
    pub submitted: usize,
}

/// Messages sent from the batch worker.
#[derive(Debug, Clone)]
pub enum BatchProgress {
    /// Input prepared; `queued` items will be attempted.
    Started { submitted: usize, queued: usize },

    /// An item was looked up and recorded in history.
    ItemProcessed {
        value: String,
        urls: Vec<Url>,
        processed: usize,
        queued: usize,
    },

    /// An item did not classify and was left out.
    ItemSkipped { value: String, reason: String },

    /// Every queued item was attempted.
    Completed(BatchSummary),

    /// The cancel flag was raised before the batch finished.
    Cancelled(BatchSummary),
}

/// Trim lines, drop empty ones and cap at `max_items`.
///
/// Returns the queued items and the number of non-empty lines submitted.
pub fn prepare_items<S: AsRef<str>>(lines: &[S], max_items: usize) -> (Vec<String>, usize) {
    let mut items: Vec<String> = lines
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    let submitted = items.len();
    items.truncate(max_items);
    (items, submitted)
}

// =============================================================================
// BatchManager
// =============================================================================

/// Manages a batch operation on a background thread.
pub struct BatchManager {
    /// Channel receiver for progress messages.
    progress_rx: Option<mpsc::Receiver<BatchProgress>>,

    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,

    worker: Option<JoinHandle<()>>,
}

impl BatchManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
            worker: None,
        }
    }

    /// Start a batch using a snapshot of enabled services.
    ///
    /// Spawns a background thread immediately; progress is sent over the
    /// channel. If a batch is already running it is cancelled first.
    pub fn start(
        &mut self,
        request: BatchRequest,
        services: Vec<LookupService>,
        history: Arc<Mutex<HistoryStore>>,
        opener: Arc<dyn UrlOpener>,
    ) {
        self.cancel();
        self.join_worker();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        let kind = request.kind;
        self.worker = Some(std::thread::spawn(move || {
            run_batch(request, &services, &history, opener.as_ref(), &tx, &cancel);
        }));

        tracing::info!(kind = %kind, "Batch started");
    }

    /// Request cancellation of the running batch.
    /// The background thread sends `BatchProgress::Cancelled` and exits.
    pub fn cancel(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
        }
        self.cancel_flag = None;
    }

    /// Wait for the previous worker to exit so two batches never overlap.
    /// Its cancel flag must already be raised.
    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("Previous batch worker panicked");
            }
        }
    }

    /// Shared handle to the cancel flag of the running batch, e.g. for a
    /// Ctrl-C handler.
    pub fn cancel_handle(&self) -> Option<Arc<AtomicBool>> {
        self.cancel_flag.clone()
    }

    /// Poll for progress messages without blocking. Returns all pending messages.
    pub fn poll_progress(&self) -> Vec<BatchProgress> {
        let mut messages = Vec::new();
        if let Some(ref rx) = self.progress_rx {
            while let Ok(msg) = rx.try_recv() {
                messages.push(msg);
            }
        }
        messages
    }

    /// Block until the next progress message. `None` once the worker has
    /// exited and every message has been received.
    pub fn recv_progress(&self) -> Option<BatchProgress> {
        self.progress_rx.as_ref().and_then(|rx| rx.recv().ok())
    }

    /// Whether the worker thread is still alive.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }
}

impl Default for BatchManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Background batch pipeline
// =============================================================================

/// Full batch pipeline: prepare → per item classify, resolve, open, record.
///
/// Sends `BatchProgress` messages to `tx`. Returns early if the receiver
/// goes away.
pub fn run_batch(
    request: BatchRequest,
    services: &[LookupService],
    history: &Mutex<HistoryStore>,
    opener: &dyn UrlOpener,
    tx: &mpsc::Sender<BatchProgress>,
    cancel: &AtomicBool,
) {
    let (items, submitted) = prepare_items(&request.lines, request.max_items);
    let mut summary = BatchSummary {
        queued: items.len(),
        submitted,
        ..Default::default()
    };

    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                return; // Receiver dropped; exit quietly.
            }
        };
    }

    macro_rules! check_cancel {
        () => {
            if cancel.load(Ordering::SeqCst) {
                tracing::info!(processed = summary.processed, "Batch cancelled");
                send!(BatchProgress::Cancelled(summary));
                return;
            }
        };
    }

    if submitted > items.len() {
        tracing::info!(
            submitted,
            queued = items.len(),
            "Batch input truncated to max_items"
        );
    }

    send!(BatchProgress::Started {
        submitted,
        queued: summary.queued,
    });

    let batch_start = Instant::now();
    let last = items.len().saturating_sub(1);

    for (idx, item) in items.into_iter().enumerate() {
        check_cancel!();

        match classifier::classify(&item) {
            ClassificationOutcome::Valid(detected) => {
                if detected != request.kind {
                    tracing::debug!(
                        detected = %detected,
                        target = %request.kind,
                        "Item type differs from batch type; resolving under batch type"
                    );
                }

                let urls = resolver::resolve_with(services, request.kind, &item);
                dispatch::open_all(opener, &urls, request.open_in_background);

                lock_history(history).add_search(&item, request.kind);

                summary.processed += 1;
                send!(BatchProgress::ItemProcessed {
                    value: item,
                    urls,
                    processed: summary.processed,
                    queued: summary.queued,
                });
            }
            other => {
                summary.skipped += 1;
                let reason = other.to_string();
                tracing::debug!(reason = %reason, "Batch item skipped");
                send!(BatchProgress::ItemSkipped {
                    value: item,
                    reason,
                });
                continue;
            }
        }

        if idx < last && !throttle(request.delay, cancel) {
            check_cancel!();
        }
    }

    tracing::info!(
        processed = summary.processed,
        skipped = summary.skipped,
        queued = summary.queued,
        elapsed_ms = batch_start.elapsed().as_millis() as u64,
        "Batch complete"
    );

    send!(BatchProgress::Completed(summary));
}

/// Sleep for `delay` in short slices. Returns false if cancelled meanwhile.
fn throttle(delay: Duration, cancel: &AtomicBool) -> bool {
    let slice = Duration::from_millis(BATCH_SLEEP_SLICE_MS);
    let deadline = Instant::now() + delay;
    loop {
        if cancel.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep(slice.min(deadline - now));
    }
}

/// Lock the shared history, recovering from a poisoned mutex.
///
/// History writes are single operations that leave the list consistent, so
/// a panic elsewhere never leaves it half-updated.
pub fn lock_history(history: &Mutex<HistoryStore>) -> std::sync::MutexGuard<'_, HistoryStore> {
    history.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("History lock was poisoned; continuing with inner value");
        poisoned.into_inner()
    })
}
