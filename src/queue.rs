//! Serial presentation queue
//!
//! Tasks run strictly one after another in admission order. A task leaves
//! the queue as soon as it is Finished or Cancelled, which is what lets the
//! next one start.

use log::{debug, info};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::dispatch::Dispatcher;
use crate::task::{TaskState, ToastTask};
use crate::toast::ToastId;

pub struct ToastQueue {
    dispatcher: Arc<Dispatcher>,
    tasks: Mutex<VecDeque<Arc<ToastTask>>>,
    enabled: AtomicBool,
    this: Weak<ToastQueue>,
}

impl ToastQueue {
    pub fn new(dispatcher: Arc<Dispatcher>, enabled: bool) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            dispatcher,
            tasks: Mutex::new(VecDeque::new()),
            enabled: AtomicBool::new(enabled),
            this: this.clone(),
        })
    }

    /// Admit `task` on the main thread. With queueing disabled every other
    /// task is cancelled first and `task` starts right away.
    pub fn enqueue(&self, task: Arc<ToastTask>) {
        let queue = self.this.clone();
        self.dispatcher.run_on_main(move || {
            if let Some(queue) = queue.upgrade() {
                queue.admit(task);
            }
        });
    }

    fn admit(&self, task: Arc<ToastTask>) {
        if !self.is_enabled() {
            let cancelled = self.cancel_all_now();
            if cancelled > 0 {
                debug!("Queueing disabled, cancelled {} toasts for {}", cancelled, task.id());
            }
        }

        let queue = self.this.clone();
        task.set_on_done(move |id| {
            if let Some(queue) = queue.upgrade() {
                queue.task_done(id);
            }
        });

        let len = {
            let mut tasks = self.tasks.lock();
            tasks.push_back(task);
            tasks.len()
        };
        debug!("Queued toast, {} in queue", len);
        self.advance();
    }

    fn task_done(&self, id: ToastId) {
        let queue = self.this.clone();
        self.dispatcher.run_on_main(move || {
            if let Some(queue) = queue.upgrade() {
                queue.tasks.lock().retain(|t| t.id() != id);
                queue.advance();
            }
        });
    }

    /// Drop terminal tasks and start the head if it hasn't started yet
    fn advance(&self) {
        let next = {
            let mut tasks = self.tasks.lock();
            tasks.retain(|t| !t.state().is_terminal());
            tasks
                .front()
                .filter(|t| t.state() == TaskState::Pending)
                .cloned()
        };
        if let Some(task) = next {
            task.start();
        }
    }

    /// Cancel and remove every pending or executing task, on the main
    /// thread
    pub fn cancel_all(&self) {
        let queue = self.this.clone();
        self.dispatcher.run_on_main(move || {
            if let Some(queue) = queue.upgrade() {
                queue.cancel_all_now();
            }
        });
    }

    fn cancel_all_now(&self) -> usize {
        // Empty the queue first so no cancellation can start a sibling
        let drained: Vec<_> = self.tasks.lock().drain(..).collect();
        let count = drained.len();
        for task in drained {
            task.cancel();
        }
        if count > 0 {
            info!("Cancelled all {} queued toasts", count);
        }
        count
    }

    /// Cancel one task on the main thread. Returns `false` if it isn't
    /// queued at the time of the call.
    pub fn cancel(&self, id: ToastId) -> bool {
        if !self.tasks.lock().iter().any(|t| t.id() == id) {
            debug!("{} is not queued", id);
            return false;
        }

        let queue = self.this.clone();
        self.dispatcher.run_on_main(move || {
            let Some(queue) = queue.upgrade() else {
                return;
            };
            let task = queue.tasks.lock().iter().find(|t| t.id() == id).cloned();
            if let Some(task) = task {
                task.cancel();
            }
        });
        true
    }

    /// First task that is neither cancelled nor finished
    pub fn current_task(&self) -> Option<Arc<ToastTask>> {
        self.tasks
            .lock()
            .iter()
            .find(|t| !t.state().is_terminal())
            .cloned()
    }

    /// Most recently admitted task still in the queue
    pub fn last_task(&self) -> Option<Arc<ToastTask>> {
        self.tasks.lock().back().cloned()
    }

    pub fn tasks(&self) -> Vec<Arc<ToastTask>> {
        self.tasks.lock().iter().cloned().collect()
    }

    pub fn task_ids(&self) -> Vec<ToastId> {
        self.tasks.lock().iter().map(|t| t.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        info!("Toast queueing {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}
