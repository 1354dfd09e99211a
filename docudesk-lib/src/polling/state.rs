//! Set of documents with an in-flight processing job

use std::collections::BTreeSet;

use crate::model::DocumentId;

/// Which documents are currently being processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingState {
    ids: BTreeSet<DocumentId>,
}

impl ProcessingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a document as processing. Returns `false` if it already was.
    pub fn mark(&mut self, id: DocumentId) -> bool {
        self.ids.insert(id)
    }

    /// Clears the processing mark. Returns `false` if it was not set.
    pub fn unmark(&mut self, id: DocumentId) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Processing ids in ascending order.
    pub fn ids(&self) -> Vec<DocumentId> {
        self.ids.iter().copied().collect()
    }
}
