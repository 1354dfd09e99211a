//! Internal note endpoints

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde::Serialize;

use crate::ConsoleClient;
use crate::error::Error;
use crate::model::CallLogId;
use crate::model::InternalNote;
use crate::model::NewNote;
use crate::model::NoteId;
use crate::model::validate_note_content;
use crate::page::NoteStore;

#[derive(Deserialize)]
#[serde(untagged)]
enum NoteListBody {
    Wrapped {
        #[serde(alias = "items")]
        notes: Vec<InternalNote>,
    },
    Bare(Vec<InternalNote>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NoteBody {
    Wrapped { note: InternalNote },
    Bare(InternalNote),
}

impl From<NoteBody> for InternalNote {
    fn from(body: NoteBody) -> Self {
        match body {
            NoteBody::Wrapped { note } | NoteBody::Bare(note) => note,
        }
    }
}

#[derive(Serialize)]
struct NoteContent<'a> {
    content: &'a str,
}

impl ConsoleClient {
    /// `GET /internal-notes/call-log/:callLogId`
    pub async fn list_notes(&self, call_log_id: CallLogId) -> Result<Vec<InternalNote>, Error> {
        let url = self.endpoint(&["internal-notes", "call-log", &call_log_id.to_string()])?;
        let body: NoteListBody = self.get_json(url).await?;
        Ok(match body {
            NoteListBody::Wrapped { notes } | NoteListBody::Bare(notes) => notes,
        })
    }

    /// `POST /internal-notes/`
    pub async fn create_note(
        &self,
        call_log_id: CallLogId,
        content: &str,
    ) -> Result<InternalNote, Error> {
        let content = validate_note_content(content)?;
        let url = self.endpoint(&["internal-notes", ""])?;
        let body: NoteBody = self
            .send_json(Method::POST, url, &NewNote { call_log_id, content })
            .await?;
        Ok(body.into())
    }

    /// `PUT /internal-notes/:id`
    pub async fn update_note(&self, id: NoteId, content: &str) -> Result<InternalNote, Error> {
        let content = validate_note_content(content)?;
        let url = self.endpoint(&["internal-notes", &id.to_string()])?;
        let body: NoteBody = self
            .send_json(Method::PUT, url, &NoteContent { content: &content })
            .await?;
        Ok(body.into())
    }

    /// `DELETE /internal-notes/:id`
    pub async fn delete_note(&self, id: NoteId) -> Result<(), Error> {
        let url = self.endpoint(&["internal-notes", &id.to_string()])?;
        self.send_empty::<()>(Method::DELETE, url, None).await
    }
}

#[async_trait]
impl NoteStore for ConsoleClient {
    async fn list(&self, call_log_id: CallLogId) -> Result<Vec<InternalNote>, Error> {
        self.list_notes(call_log_id).await
    }

    async fn create(&self, call_log_id: CallLogId, content: &str) -> Result<InternalNote, Error> {
        self.create_note(call_log_id, content).await
    }

    async fn update(&self, id: NoteId, content: &str) -> Result<InternalNote, Error> {
        self.update_note(id, content).await
    }

    async fn delete(&self, id: NoteId) -> Result<(), Error> {
        self.delete_note(id).await
    }
}
