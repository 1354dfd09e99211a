//! Documents of a folder, with processing status polling

use std::sync::Arc;

use tokio::sync::mpsc;

use super::ListPage;
use super::ListSource;
use crate::error::Error;
use crate::model::Document;
use crate::model::DocumentId;
use crate::model::JobStatus;
use crate::polling::PollEvent;
use crate::polling::PollingController;
use crate::polling::ProcessingBackend;
use crate::query::LocationSync;

/// The document list of one folder plus the processing poller.
///
/// Poll events are applied to the loaded records as they arrive; the
/// poller is cancelled when the page is dropped.
pub struct DocumentsPage<S, B>
where
    S: ListSource<Record = Document>,
    B: ProcessingBackend + 'static,
{
    list: ListPage<S>,
    controller: PollingController<B>,
    events: mpsc::UnboundedReceiver<PollEvent>,
}

impl<S, B> DocumentsPage<S, B>
where
    S: ListSource<Record = Document>,
    B: ProcessingBackend + 'static,
{
    pub fn new(source: S, backend: Arc<B>, location: LocationSync) -> Self {
        let (controller, events) = PollingController::new(backend);
        Self::with_controller(source, controller, events, location)
    }

    /// Uses a preconfigured controller, e.g. with a custom interval.
    pub fn with_controller(
        source: S,
        controller: PollingController<B>,
        events: mpsc::UnboundedReceiver<PollEvent>,
        location: LocationSync,
    ) -> Self {
        Self {
            list: ListPage::new(source, location),
            controller,
            events,
        }
    }

    pub fn list(&self) -> &ListPage<S> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListPage<S> {
        &mut self.list
    }

    pub fn controller(&self) -> &PollingController<B> {
        &self.controller
    }

    pub fn is_processing(&self, id: DocumentId) -> bool {
        self.controller.is_processing(id)
    }

    /// Submits documents for processing.
    ///
    /// On success the loaded records are shown as processing until the
    /// poller reports otherwise.
    pub async fn process(&mut self, ids: &[DocumentId]) -> Result<(), Error> {
        self.controller.submit(ids).await?;
        for document in self.list.records_mut() {
            if ids.contains(&document.id) {
                document.status = JobStatus::Processing;
            }
        }
        Ok(())
    }

    /// Restarts polling after a failed status check.
    pub fn resume_polling(&mut self) -> bool {
        self.controller.resume()
    }

    /// Applies a poll event to the loaded records.
    pub fn apply(&mut self, event: &PollEvent) {
        if let PollEvent::Status(update) = event
            && let Some(document) = self
                .list
                .records_mut()
                .iter_mut()
                .find(|d| d.id == update.id)
        {
            document.status = update.status.clone();
        }
    }

    /// Waits for the next poll event and applies it.
    ///
    /// Returns `None` once the controller is gone.
    pub async fn next_event(&mut self) -> Option<PollEvent> {
        let event = self.events.recv().await?;
        self.apply(&event);
        Some(event)
    }

    /// Applies every event already received without waiting.
    pub fn drain_events(&mut self) -> Vec<PollEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            self.apply(&event);
            drained.push(event);
        }
        drained
    }
}
