//! Internal notes of a call, with optimistic adds

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Error;
use crate::model::CallLogId;
use crate::model::InternalNote;
use crate::model::NoteId;
use crate::model::validate_note_content;

/// Storage for internal notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list(&self, call_log_id: CallLogId) -> Result<Vec<InternalNote>, Error>;
    async fn create(&self, call_log_id: CallLogId, content: &str) -> Result<InternalNote, Error>;
    async fn update(&self, id: NoteId, content: &str) -> Result<InternalNote, Error>;
    async fn delete(&self, id: NoteId) -> Result<(), Error>;
}

/// One entry of the notes thread.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteEntry {
    /// Sent, waiting for the server.
    Pending { temp_id: Uuid, content: String },
    /// Stored by the server.
    Committed(InternalNote),
    /// The server rejected it; `content` can be restored into the editor.
    Failed {
        temp_id: Uuid,
        content: String,
        error: String,
    },
}

impl NoteEntry {
    pub fn content(&self) -> &str {
        match self {
            Self::Pending { content, .. } | Self::Failed { content, .. } => content,
            Self::Committed(note) => &note.content,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    fn temp_id(&self) -> Option<Uuid> {
        match self {
            Self::Pending { temp_id, .. } | Self::Failed { temp_id, .. } => Some(*temp_id),
            Self::Committed(_) => None,
        }
    }
}

/// The notes of one call log, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesThread {
    call_log_id: CallLogId,
    entries: Vec<NoteEntry>,
}

impl NotesThread {
    pub fn new(call_log_id: CallLogId) -> Self {
        Self {
            call_log_id,
            entries: Vec::new(),
        }
    }

    pub fn call_log_id(&self) -> CallLogId {
        self.call_log_id
    }

    pub fn entries(&self) -> &[NoteEntry] {
        &self.entries
    }

    /// Replaces the thread with the stored notes. Entries not yet
    /// committed are kept at the end.
    pub async fn load<S: NoteStore + ?Sized>(&mut self, store: &S) -> Result<(), Error> {
        let notes = store.list(self.call_log_id).await?;
        let unsent: Vec<NoteEntry> = self
            .entries
            .drain(..)
            .filter(|e| !matches!(e, NoteEntry::Committed(_)))
            .collect();
        self.entries = notes.into_iter().map(NoteEntry::Committed).collect();
        self.entries.extend(unsent);
        Ok(())
    }

    /// Shows `content` as a pending entry and returns its temporary id.
    pub fn begin_add(&mut self, content: impl Into<String>) -> Uuid {
        let temp_id = Uuid::new_v4();
        self.entries.push(NoteEntry::Pending {
            temp_id,
            content: content.into(),
        });
        temp_id
    }

    /// Replaces a pending entry with the stored note.
    pub fn commit(&mut self, temp_id: Uuid, note: InternalNote) -> bool {
        match self.position(temp_id) {
            Some(i) => {
                self.entries[i] = NoteEntry::Committed(note);
                true
            }
            None => false,
        }
    }

    /// Marks a pending entry as failed.
    pub fn fail(&mut self, temp_id: Uuid, error: impl Into<String>) -> bool {
        let Some(i) = self.position(temp_id) else {
            return false;
        };
        let content = self.entries[i].content().to_string();
        self.entries[i] = NoteEntry::Failed {
            temp_id,
            content,
            error: error.into(),
        };
        true
    }

    /// Removes a failed entry and returns its content for the editor.
    pub fn take_failed_content(&mut self, temp_id: Uuid) -> Option<String> {
        let i = self.position(temp_id)?;
        match self.entries.remove(i) {
            NoteEntry::Failed { content, .. } => Some(content),
            other => {
                self.entries.insert(i, other);
                None
            }
        }
    }

    /// Adds a note optimistically.
    ///
    /// Invalid content is rejected without touching the thread. On a
    /// server error the pending entry turns into a failed one and the
    /// error is returned.
    pub async fn add<S: NoteStore + ?Sized>(
        &mut self,
        store: &S,
        content: &str,
    ) -> Result<Uuid, Error> {
        let content = validate_note_content(content)?;
        let temp_id = self.begin_add(content.clone());
        match store.create(self.call_log_id, &content).await {
            Ok(note) => {
                self.commit(temp_id, note);
                Ok(temp_id)
            }
            Err(e) => {
                log::warn!("adding note to call {} failed: {e}", self.call_log_id);
                self.fail(temp_id, e.to_string());
                Err(e)
            }
        }
    }

    /// Edits a stored note. The thread changes only on success.
    pub async fn edit<S: NoteStore + ?Sized>(
        &mut self,
        store: &S,
        id: NoteId,
        content: &str,
    ) -> Result<(), Error> {
        let note = store.update(id, content).await?;
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| matches!(e, NoteEntry::Committed(n) if n.id == id))
        {
            *entry = NoteEntry::Committed(note);
        }
        Ok(())
    }

    /// Deletes a stored note. The thread changes only on success.
    pub async fn delete<S: NoteStore + ?Sized>(&mut self, store: &S, id: NoteId) -> Result<(), Error> {
        store.delete(id).await?;
        self.entries
            .retain(|e| !matches!(e, NoteEntry::Committed(n) if n.id == id));
        Ok(())
    }

    fn position(&self, temp_id: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.temp_id() == Some(temp_id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::ApiError;

    #[derive(Default)]
    struct MemoryNotes {
        notes: Mutex<Vec<InternalNote>>,
        reject: Mutex<bool>,
    }

    fn note(id: NoteId, content: &str) -> InternalNote {
        InternalNote {
            id,
            call_log_id: 1,
            content: content.to_string(),
            author: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[async_trait]
    impl NoteStore for MemoryNotes {
        async fn list(&self, _call_log_id: CallLogId) -> Result<Vec<InternalNote>, Error> {
            Ok(self.notes.lock().unwrap().clone())
        }

        async fn create(&self, _call_log_id: CallLogId, content: &str) -> Result<InternalNote, Error> {
            if *self.reject.lock().unwrap() {
                return Err(Error::Api(ApiError::http(400, "rejected")));
            }
            let mut notes = self.notes.lock().unwrap();
            let created = note(notes.len() as NoteId + 1, content);
            notes.push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: NoteId, content: &str) -> Result<InternalNote, Error> {
            let mut notes = self.notes.lock().unwrap();
            let stored = notes
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or_else(|| Error::Api(ApiError::http(404, "missing")))?;
            stored.content = content.to_string();
            Ok(stored.clone())
        }

        async fn delete(&self, id: NoteId) -> Result<(), Error> {
            self.notes.lock().unwrap().retain(|n| n.id != id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn successful_add_commits_the_pending_entry() {
        let store = MemoryNotes::default();
        let mut thread = NotesThread::new(1);
        thread.add(&store, "  call the patient back ").await.unwrap();
        assert_eq!(thread.entries(), &[NoteEntry::Committed(note(1, "call the patient back"))]);
    }

    #[tokio::test]
    async fn failed_add_keeps_content_for_the_editor() {
        let store = MemoryNotes::default();
        *store.reject.lock().unwrap() = true;
        let mut thread = NotesThread::new(1);

        let err = thread.add(&store, "draft").await.unwrap_err();
        assert_eq!(err.status_code(), Some(400));
        let temp_id = match &thread.entries()[0] {
            NoteEntry::Failed { temp_id, content, .. } => {
                assert_eq!(content, "draft");
                *temp_id
            }
            other => panic!("expected failed entry, got {other:?}"),
        };

        assert_eq!(thread.take_failed_content(temp_id).as_deref(), Some("draft"));
        assert!(thread.entries().is_empty());
    }

    #[tokio::test]
    async fn blank_note_is_never_sent() {
        let store = MemoryNotes::default();
        let mut thread = NotesThread::new(1);
        assert!(matches!(thread.add(&store, "   ").await, Err(Error::Validation(_))));
        assert!(thread.entries().is_empty());
        assert!(store.notes.lock().unwrap().is_empty());
    }

    #[test]
    fn pending_entry_is_not_taken_as_failed() {
        let mut thread = NotesThread::new(1);
        let temp_id = thread.begin_add("x");
        assert_eq!(thread.take_failed_content(temp_id), None);
        assert!(thread.entries()[0].is_pending());
    }

    #[tokio::test]
    async fn load_edit_and_delete() {
        let store = MemoryNotes::default();
        store.notes.lock().unwrap().extend([note(1, "a"), note(2, "b")]);
        let mut thread = NotesThread::new(1);
        thread.begin_add("unsent");

        thread.load(&store).await.unwrap();
        assert_eq!(thread.entries().len(), 3);
        assert!(thread.entries()[2].is_pending());

        thread.edit(&store, 2, "b2").await.unwrap();
        assert_eq!(thread.entries()[1].content(), "b2");

        thread.delete(&store, 1).await.unwrap();
        assert_eq!(thread.entries()[0].content(), "b2");
        assert!(thread.edit(&store, 1, "gone").await.is_err());
    }
}
