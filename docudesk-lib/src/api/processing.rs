//! Document processing endpoints

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde::Serialize;

use crate::ConsoleClient;
use crate::error::Error;
use crate::error::ValidationError;
use crate::model::DocumentId;
use crate::model::JobStatus;
use crate::polling::ProcessingBackend;

/// Status of one document, as returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStatus {
    pub id: DocumentId,
    pub status: JobStatus,
}

impl DocumentStatus {
    pub fn new(id: DocumentId, status: impl Into<JobStatus>) -> Self {
        Self {
            id,
            status: status.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentIds<'a> {
    document_ids: &'a [DocumentId],
}

#[derive(Deserialize)]
struct StatusList {
    #[serde(default)]
    documents: Vec<DocumentStatus>,
}

fn require_ids(ids: &[DocumentId]) -> Result<(), ValidationError> {
    if ids.is_empty() {
        return Err(ValidationError::single(
            "documentIds",
            "Select at least one document",
        ));
    }
    Ok(())
}

impl ConsoleClient {
    /// Queues documents for extraction.
    ///
    /// `POST /documents/process`
    pub async fn process_documents(&self, ids: &[DocumentId]) -> Result<(), Error> {
        require_ids(ids)?;
        let url = self.endpoint(&["documents", "process"])?;
        self.send_empty(Method::POST, url, Some(&DocumentIds { document_ids: ids }))
            .await
    }

    /// Fetches the processing status of documents.
    ///
    /// `POST /documents/process/status`
    pub async fn processing_status(
        &self,
        ids: &[DocumentId],
    ) -> Result<Vec<DocumentStatus>, Error> {
        require_ids(ids)?;
        let url = self.endpoint(&["documents", "process", "status"])?;
        let body: StatusList = self
            .send_json(Method::POST, url, &DocumentIds { document_ids: ids })
            .await?;
        Ok(body.documents)
    }
}

#[async_trait]
impl ProcessingBackend for ConsoleClient {
    async fn start(&self, ids: &[DocumentId]) -> Result<(), Error> {
        self.process_documents(ids).await
    }

    async fn status(&self, ids: &[DocumentId]) -> Result<Vec<DocumentStatus>, Error> {
        self.processing_status(ids).await
    }
}
