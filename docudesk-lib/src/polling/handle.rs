//! Cancellable handle to a running poll task

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns one spawned poll task. Dropping the handle cancels the task.
#[derive(Debug)]
pub struct PollHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub(crate) fn new(token: CancellationToken, task: JoinHandle<()>) -> Self {
        Self { token, task }
    }

    /// Stops the task at its next suspension point.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` while the task is neither cancelled nor finished.
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled() && !self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
