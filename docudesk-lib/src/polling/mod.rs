//! Polling of asynchronous document processing jobs.
//!
//! After a batch of documents is submitted for processing, a
//! [`PollingController`] queries their status at a fixed interval until
//! every one reaches a terminal status. Status changes are reported as
//! [`PollEvent`]s for the owning page to apply to its records.
//!
//! ```text
//!   Idle --submit ok--> Polling --all terminal--> Idle
//!                          |
//!                          +--status error--> Idle (ids stay processing)
//!                          +--drop/shutdown--> Idle
//! ```

mod controller;
mod handle;
mod state;

pub use controller::*;
pub use handle::PollHandle;
pub use state::ProcessingState;
