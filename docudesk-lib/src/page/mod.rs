//! Page-level containers
//!
//! A page owns everything one screen of the console shows: the records,
//! their pagination and sort, the URL parameters, a poller for document
//! processing, the notes of a call. Pages talk to the API through the
//! [`ListSource`], [`ProcessingBackend`](crate::polling::ProcessingBackend)
//! and [`NoteStore`] traits.

mod debounce;
mod documents;
mod list;
mod notes;
mod sources;

pub use debounce::DEFAULT_DEBOUNCE;
pub use debounce::Debouncer;
pub use documents::DocumentsPage;
pub use list::FetchOutcome;
pub use list::ListPage;
pub use list::ListSource;
pub use list::PageError;
pub use list::PendingFetch;
pub use notes::NoteEntry;
pub use notes::NoteStore;
pub use notes::NotesThread;
pub use sources::ClinicCallLogs;
pub use sources::FolderDocuments;
pub use sources::FolderList;
