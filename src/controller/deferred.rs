//! One-shot delayed tasks and seek suppression windows

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::AbortHandle;

/// A single pending delayed task. Scheduling again cancels the previous one.
#[derive(Debug, Default)]
pub struct Deferred {
    handle: Option<AbortHandle>,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let join = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        self.handle = Some(join.abort_handle());
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Forget the pending task without cancelling it (used by the task itself when it fires)
    pub fn detach(&mut self) {
        self.handle = None;
    }

    pub fn is_pending(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Window during which progress reports must not overwrite a just-committed seek.
///
/// Only one window is open per scope; opening again restarts it.
#[derive(Debug, Default)]
pub struct SuppressionWindow {
    active: Arc<AtomicBool>,
    timer: Deferred,
}

impl SuppressionWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, length: Duration) {
        // cancel first so the old timer cannot clear the new window
        self.timer.cancel();
        self.active.store(true, Ordering::SeqCst);
        let active = self.active.clone();
        self.timer.schedule(length, async move {
            active.store(false, Ordering::SeqCst);
        });
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn close(&mut self) {
        self.timer.cancel();
        self.active.store(false, Ordering::SeqCst);
    }
}
