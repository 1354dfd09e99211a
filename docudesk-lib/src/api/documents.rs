//! Document endpoints

use reqwest::Method;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::ConsoleClient;
use crate::error::Error;
use crate::model::Document;
use crate::model::DocumentId;
use crate::model::validate_corrected_data;
use crate::model::validate_document_name;

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentBody {
    Wrapped { document: Document },
    Bare(Document),
}

impl From<DocumentBody> for Document {
    fn from(body: DocumentBody) -> Self {
        match body {
            DocumentBody::Wrapped { document } | DocumentBody::Bare(document) => document,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CorrectedDataBody<'a> {
    corrected_data: &'a Value,
}

#[derive(Serialize)]
struct RenameBody<'a> {
    name: &'a str,
}

impl ConsoleClient {
    /// `GET /documents/:id`
    pub async fn get_document(&self, id: DocumentId) -> Result<Document, Error> {
        let url = self.endpoint(&["documents", &id.to_string()])?;
        let body: DocumentBody = self.get_json(url).await?;
        Ok(body.into())
    }

    /// Saves corrections to a document's extracted data.
    ///
    /// Malformed amounts are rejected before the request is sent.
    ///
    /// `PATCH /documents/:id/correctedData`
    pub async fn update_corrected_data(
        &self,
        id: DocumentId,
        data: &Value,
    ) -> Result<Document, Error> {
        validate_corrected_data(data)?;
        let url = self.endpoint(&["documents", &id.to_string(), "correctedData"])?;
        let body: DocumentBody = self
            .send_json(Method::PATCH, url, &CorrectedDataBody { corrected_data: data })
            .await?;
        Ok(body.into())
    }

    /// `PATCH /documents/:id/name`
    pub async fn rename_document(&self, id: DocumentId, name: &str) -> Result<Document, Error> {
        let name = validate_document_name(name)?;
        let url = self.endpoint(&["documents", &id.to_string(), "name"])?;
        let body: DocumentBody = self
            .send_json(Method::PATCH, url, &RenameBody { name: &name })
            .await?;
        Ok(body.into())
    }

    /// `DELETE /documents/:id`
    pub async fn delete_document(&self, id: DocumentId) -> Result<(), Error> {
        let url = self.endpoint(&["documents", &id.to_string()])?;
        self.send_empty::<()>(Method::DELETE, url, None).await
    }
}
