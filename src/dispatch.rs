//! Main-thread executor
//!
//! All view mutation, animation timers and queue admission run on the thread
//! the dispatcher is bound to. Work submitted from any other thread goes
//! through a channel and runs on the next `run_pending` turn.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, warn};
use parking_lot::Mutex;
use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Monotonic time source for the dispatcher's timers
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Block (or jump) until `deadline` has been reached
    fn sleep_until(&self, deadline: Duration);
}

/// Wall clock backed by `Instant`
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep_until(&self, deadline: Duration) {
        let now = self.now();
        if deadline > now {
            thread::sleep(deadline - now);
        }
    }
}

/// Virtual clock; sleeping moves time forward instantly
#[derive(Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }

    fn sleep_until(&self, deadline: Duration) {
        let mut now = self.now.lock();
        if deadline > *now {
            *now = deadline;
        }
    }
}

struct Timer {
    deadline: Duration,
    seq: u64,
    job: Job,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the earliest deadline, then the earliest
// scheduled among equal deadlines
impl Ord for Timer {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

pub struct Dispatcher {
    clock: Arc<dyn Clock>,
    job_tx: Sender<Job>,
    job_rx: Receiver<Job>,
    timers: Mutex<BinaryHeap<Timer>>,
    next_seq: AtomicU64,
    main_thread: Mutex<ThreadId>,
}

impl Dispatcher {
    /// Create a dispatcher bound to the calling thread
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (job_tx, job_rx) = unbounded::<Job>();
        Self {
            clock,
            job_tx,
            job_rx,
            timers: Mutex::new(BinaryHeap::new()),
            next_seq: AtomicU64::new(0),
            main_thread: Mutex::new(thread::current().id()),
        }
    }

    /// Move the main-thread binding to the calling thread
    pub fn bind_to_current_thread(&self) {
        *self.main_thread.lock() = thread::current().id();
    }

    pub fn is_main_thread(&self) -> bool {
        *self.main_thread.lock() == thread::current().id()
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Queue `job` for the next main-thread turn. Never runs inline.
    pub fn post(&self, job: impl FnOnce() + Send + 'static) {
        // The receiver lives as long as `self`, so sending cannot fail
        let _ = self.job_tx.send(Box::new(job));
    }

    /// Run `job` now when already on the main thread, otherwise post it
    pub fn run_on_main(&self, job: impl FnOnce() + Send + 'static) {
        if self.is_main_thread() {
            job();
        } else {
            self.post(job);
        }
    }

    /// Run `job` on the main thread once `after` has elapsed
    pub fn schedule(&self, after: Duration, job: impl FnOnce() + Send + 'static) {
        let deadline = self.clock.now().saturating_add(after);
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.timers.lock().push(Timer {
            deadline,
            seq,
            job: Box::new(job),
        });
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.lock().peek().map(|t| t.deadline)
    }

    pub fn has_pending_work(&self) -> bool {
        !self.job_rx.is_empty() || !self.timers.lock().is_empty()
    }

    /// Run posted jobs and every timer that is due, until nothing runnable
    /// is left at the current time. Returns the number of jobs run.
    pub fn run_pending(&self) -> usize {
        if !self.is_main_thread() {
            warn!("run_pending called off the main thread, ignoring");
            return 0;
        }

        let mut ran = 0;
        loop {
            while let Ok(job) = self.job_rx.try_recv() {
                job();
                ran += 1;
            }

            let now = self.clock.now();
            let due = {
                let mut timers = self.timers.lock();
                match timers.peek() {
                    Some(timer) if timer.deadline <= now => timers.pop(),
                    _ => None,
                }
            };

            match due {
                Some(timer) => {
                    (timer.job)();
                    ran += 1;
                }
                None if self.job_rx.is_empty() => break,
                None => {}
            }
        }
        ran
    }

    /// Drive the loop for `span` of clock time, firing timers in deadline
    /// order
    pub fn run_for(&self, span: Duration) -> usize {
        let target = self.clock.now().saturating_add(span);
        let mut ran = self.run_pending();

        while let Some(deadline) = self.next_deadline() {
            if deadline > target {
                break;
            }
            self.clock.sleep_until(deadline);
            ran += self.run_pending();
        }

        self.clock.sleep_until(target);
        ran += self.run_pending();
        ran
    }

    /// Drive the loop until no jobs or timers remain
    pub fn run_until_idle(&self) -> usize {
        let mut ran = self.run_pending();
        while let Some(deadline) = self.next_deadline() {
            self.clock.sleep_until(deadline);
            ran += self.run_pending();
        }
        debug!("Dispatcher idle after {} jobs", ran);
        ran
    }
}
