//! Serialised execution on the UI thread.
//!
//! Bridge calls and script callbacks can arrive on any thread; they post a
//! [`UiTask`] through a [`UiHandle`] and the owning activity drains the
//! [`UiQueue`] on the UI thread.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::host::ScriptResult;

#[derive(Debug, PartialEq)]
pub enum UiTask {
    EnterImmersive,
    ExitImmersive,
    ProbeCompleted { id: u64, result: ScriptResult },
}

#[derive(Default)]
pub struct UiQueue {
    tasks: Arc<Mutex<VecDeque<UiTask>>>,
}

impl UiQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> UiHandle {
        UiHandle {
            tasks: self.tasks.clone(),
        }
    }

    /// Takes everything posted so far, oldest first. Tasks posted while the
    /// batch runs land in the next drain.
    pub fn drain(&self) -> Vec<UiTask> {
        self.tasks.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

/// Cloneable, thread-safe poster into a [`UiQueue`].
#[derive(Clone)]
pub struct UiHandle {
    tasks: Arc<Mutex<VecDeque<UiTask>>>,
}

impl UiHandle {
    pub fn post(&self, task: UiTask) {
        self.tasks.lock().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_post_order() {
        let q = UiQueue::new();
        let h = q.handle();
        h.post(UiTask::EnterImmersive);
        h.post(UiTask::ExitImmersive);
        assert_eq!(q.drain(), vec![UiTask::EnterImmersive, UiTask::ExitImmersive]);
        assert!(q.is_empty());
    }

    #[test]
    fn posts_from_other_threads() {
        let q = UiQueue::new();
        let h = q.handle();
        std::thread::spawn(move || h.post(UiTask::EnterImmersive))
            .join()
            .unwrap();
        assert_eq!(q.drain(), vec![UiTask::EnterImmersive]);
    }
}
