use tokio::task::JoinHandle;

/// Keeps a background listener alive. The listener task is aborted when this guard is dropped.
#[derive(Debug)]
#[must_use = "the listener stops as soon as the subscription is dropped"]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Whether the listener is still running.
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
