//! Fixed-interval status polling for submitted documents

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::PollHandle;
use super::ProcessingState;
use crate::api::DocumentStatus;
use crate::error::Error;
use crate::model::DocumentId;

/// Interval between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Remote operations the controller drives.
#[async_trait]
pub trait ProcessingBackend: Send + Sync {
    /// Queues the documents for processing.
    async fn start(&self, ids: &[DocumentId]) -> Result<(), Error>;

    /// Returns the current status of the documents.
    async fn status(&self, ids: &[DocumentId]) -> Result<Vec<DocumentStatus>, Error>;
}

/// Something the poll task observed.
#[derive(Debug)]
pub enum PollEvent {
    /// The backend reported a status for a document.
    Status(DocumentStatus),
    /// Every submitted document reached a terminal status; polling stopped.
    Finished,
    /// A status check failed; polling stopped. `stuck` lists the documents
    /// still marked processing.
    Failed { error: Error, stuck: Vec<DocumentId> },
}

/// Drives the poll loop for one page.
///
/// At most one poll task runs per controller: every successful submission
/// replaces the running task with a fresh one covering the union of all
/// processing documents. Dropping the controller cancels the task.
///
/// # Example
///
/// ```ignore
/// let (mut controller, mut events) = PollingController::new(Arc::new(client));
/// controller.submit(&[5, 9]).await?;
///
/// while let Some(event) = events.recv().await {
///     match event {
///         PollEvent::Status(s) => println!("{} is {}", s.id, s.status),
///         PollEvent::Finished => break,
///         PollEvent::Failed { error, .. } => return Err(error),
///     }
/// }
/// ```
pub struct PollingController<B: ProcessingBackend + 'static> {
    backend: Arc<B>,
    state: Arc<Mutex<ProcessingState>>,
    events: mpsc::UnboundedSender<PollEvent>,
    handle: Option<PollHandle>,
    interval: Duration,
}

impl<B: ProcessingBackend + 'static> PollingController<B> {
    /// Creates an idle controller and the receiver for its events.
    pub fn new(backend: Arc<B>) -> (Self, mpsc::UnboundedReceiver<PollEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            backend,
            state: Arc::new(Mutex::new(ProcessingState::new())),
            events,
            handle: None,
            interval: DEFAULT_POLL_INTERVAL,
        };
        (controller, rx)
    }

    /// Sets the interval between status checks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Submits documents for processing and (re)starts polling.
    ///
    /// The documents are marked processing before the start request is
    /// sent. If the request fails, the marks added by this call are
    /// removed, any running poll task is left alone and the error is
    /// returned.
    pub async fn submit(&mut self, ids: &[DocumentId]) -> Result<(), Error> {
        let added: Vec<DocumentId> = {
            let mut state = lock(&self.state);
            ids.iter().copied().filter(|id| state.mark(*id)).collect()
        };

        if let Err(e) = self.backend.start(ids).await {
            log::error!("failed to start processing of {ids:?}: {e}");
            let mut state = lock(&self.state);
            for id in added {
                state.unmark(id);
            }
            return Err(e);
        }

        log::info!("processing started for {ids:?}");
        self.restart();
        Ok(())
    }

    /// Restarts polling of documents left processing by a failed status
    /// check. Returns `false` if there is nothing to resume or a poll task
    /// is already running.
    pub fn resume(&mut self) -> bool {
        if self.is_polling() || lock(&self.state).is_empty() {
            return false;
        }
        log::info!("resuming status polling");
        self.restart();
        true
    }

    /// Returns `true` while a poll task is running.
    pub fn is_polling(&self) -> bool {
        self.handle.as_ref().is_some_and(PollHandle::is_active)
    }

    pub fn is_processing(&self, id: DocumentId) -> bool {
        lock(&self.state).contains(id)
    }

    /// Documents currently marked processing, ascending.
    pub fn processing(&self) -> Vec<DocumentId> {
        lock(&self.state).ids()
    }

    /// Snapshot of the processing state.
    pub fn state(&self) -> ProcessingState {
        lock(&self.state).clone()
    }

    /// Stops polling. Processing marks are kept.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
        }
    }

    fn restart(&mut self) {
        self.shutdown();

        let token = CancellationToken::new();
        let task = tokio::spawn(poll_loop(
            self.backend.clone(),
            self.state.clone(),
            self.events.clone(),
            self.interval,
            token.clone(),
        ));
        self.handle = Some(PollHandle::new(token, task));
    }
}

impl<B: ProcessingBackend + 'static> std::fmt::Debug for PollingController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingController")
            .field("processing", &self.processing())
            .field("polling", &self.is_polling())
            .field("interval", &self.interval)
            .finish()
    }
}

fn lock(state: &Mutex<ProcessingState>) -> MutexGuard<'_, ProcessingState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn poll_loop<B: ProcessingBackend>(
    backend: Arc<B>,
    state: Arc<Mutex<ProcessingState>>,
    events: mpsc::UnboundedSender<PollEvent>,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }

        let ids = lock(&state).ids();
        if ids.is_empty() {
            cancel.cancel();
            let _ = events.send(PollEvent::Finished);
            return;
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => return,
            result = backend.status(&ids) => result,
        };

        match result {
            Ok(statuses) => {
                let done = {
                    let mut state = lock(&state);
                    for s in statuses.iter().filter(|s| s.status.is_terminal()) {
                        state.unmark(s.id);
                    }
                    state.is_empty()
                };
                for status in statuses {
                    let _ = events.send(PollEvent::Status(status));
                }
                if done {
                    log::info!("all documents processed, polling stopped");
                    cancel.cancel();
                    let _ = events.send(PollEvent::Finished);
                    return;
                }
            }
            Err(error) => {
                cancel.cancel();
                let stuck = lock(&state).ids();
                log::error!("status check failed, {} documents left processing: {error}", stuck.len());
                let _ = events.send(PollEvent::Failed { error, stuck });
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use tokio::time::Instant;

    use super::*;
    use crate::error::ApiError;

    type StatusReply = Result<Vec<DocumentStatus>, Error>;

    #[derive(Default)]
    struct ScriptedBackend {
        fail_start: bool,
        replies: Mutex<VecDeque<StatusReply>>,
        starts: Mutex<Vec<Vec<DocumentId>>>,
        checks: Mutex<Vec<(Instant, Vec<DocumentId>)>>,
    }

    impl ScriptedBackend {
        fn with_replies(replies: Vec<StatusReply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                ..Default::default()
            })
        }

        fn checks(&self) -> Vec<(Instant, Vec<DocumentId>)> {
            self.checks.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessingBackend for ScriptedBackend {
        async fn start(&self, ids: &[DocumentId]) -> Result<(), Error> {
            self.starts.lock().unwrap().push(ids.to_vec());
            if self.fail_start {
                return Err(Error::Api(ApiError::http(500, "queue unavailable")));
            }
            Ok(())
        }

        async fn status(&self, ids: &[DocumentId]) -> Result<Vec<DocumentStatus>, Error> {
            self.checks.lock().unwrap().push((Instant::now(), ids.to_vec()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn status(id: DocumentId, status: &str) -> DocumentStatus {
        DocumentStatus::new(id, status)
    }

    /// Timer deadlines are rounded to the millisecond.
    fn assert_about(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual <= expected + Duration::from_millis(2),
            "{actual:?} vs {expected:?}"
        );
    }

    fn expect_status(event: Option<PollEvent>) -> DocumentStatus {
        match event {
            Some(PollEvent::Status(s)) => s,
            other => panic!("expected a status event, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_every_document_is_terminal() {
        let backend = ScriptedBackend::with_replies(vec![
            Ok(vec![status(5, "processed"), status(9, "pending")]),
            Ok(vec![status(9, "failed")]),
        ]);
        let (mut controller, mut events) = PollingController::new(backend.clone());
        let started = Instant::now();

        controller.submit(&[5, 9]).await.unwrap();
        assert_eq!(controller.processing(), vec![5, 9]);
        assert!(controller.is_polling());

        // first tick
        assert_eq!(expect_status(events.recv().await), status(5, "processed"));
        assert_eq!(expect_status(events.recv().await), status(9, "pending"));
        assert_eq!(controller.processing(), vec![9]);
        assert!(controller.is_polling());

        // second tick
        assert_eq!(expect_status(events.recv().await), status(9, "failed"));
        assert!(matches!(events.recv().await, Some(PollEvent::Finished)));
        assert!(controller.processing().is_empty());
        assert!(!controller.is_polling());

        let checks = backend.checks();
        assert_eq!(checks.len(), 2);
        assert_about(checks[0].0 - started, DEFAULT_POLL_INTERVAL);
        assert_about(checks[1].0 - checks[0].0, DEFAULT_POLL_INTERVAL);
        assert_eq!(checks[1].1, vec![9]);
    }

    #[tokio::test(start_paused = true)]
    async fn resubmitting_keeps_a_single_task_over_the_union() {
        let backend = ScriptedBackend::with_replies(Vec::new());
        let (mut controller, _events) = PollingController::new(backend.clone());

        controller.submit(&[1, 2]).await.unwrap();
        controller.submit(&[2, 3]).await.unwrap();
        assert_eq!(controller.processing(), vec![1, 2, 3]);

        tokio::time::sleep(DEFAULT_POLL_INTERVAL + Duration::from_millis(1)).await;
        let checks = backend.checks();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].1, vec![1, 2, 3]);
        assert!(controller.is_polling());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_check_stops_and_leaves_ids_stuck() {
        let backend = ScriptedBackend::with_replies(vec![
            Err(Error::Api(ApiError::http(502, "bad gateway"))),
            Ok(vec![status(4, "completed")]),
        ]);
        let (mut controller, mut events) = PollingController::new(backend.clone());
        controller.submit(&[4]).await.unwrap();

        match events.recv().await {
            Some(PollEvent::Failed { error, stuck }) => {
                assert_eq!(error.status_code(), Some(502));
                assert_eq!(stuck, vec![4]);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!controller.is_polling());
        assert!(controller.is_processing(4));

        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 3).await;
        assert_eq!(backend.checks().len(), 1);

        assert!(controller.resume());
        assert!(!controller.resume());
        assert_eq!(expect_status(events.recv().await), status(4, "completed"));
        assert!(matches!(events.recv().await, Some(PollEvent::Finished)));
        assert!(!controller.is_processing(4));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_submit_does_not_poll() {
        let backend = Arc::new(ScriptedBackend {
            fail_start: true,
            ..Default::default()
        });
        let (mut controller, _events) = PollingController::new(backend.clone());

        assert!(controller.submit(&[7]).await.is_err());
        assert!(controller.processing().is_empty());
        assert!(!controller.is_polling());

        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 2).await;
        assert!(backend.checks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_controller_cancels_polling() {
        let backend = ScriptedBackend::with_replies(Vec::new());
        let (mut controller, _events) = PollingController::new(backend.clone());
        controller.submit(&[1]).await.unwrap();
        drop(controller);

        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 3).await;
        assert!(backend.checks().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn custom_interval_is_honoured() {
        let backend = ScriptedBackend::with_replies(vec![Ok(vec![status(1, "done")])]);
        let (controller, mut events) = PollingController::new(backend.clone());
        let mut controller = controller.with_interval(Duration::from_secs(1));
        let started = Instant::now();

        controller.submit(&[1]).await.unwrap();
        expect_status(events.recv().await);
        assert_about(backend.checks()[0].0 - started, Duration::from_secs(1));
    }
}
