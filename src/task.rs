//! One toast's presentation lifecycle
//!
//! A task walks `Pending -> Executing -> Finished` (or is cancelled on the
//! way). While executing it runs three timed phases on the dispatcher:
//! fade in, hold, fade out. Every timer continuation re-checks the state so
//! a cancelled task stops where it is.

use log::{debug, info};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use std::time::Duration;

use crate::runtime::Runtime;
use crate::toast::{Toast, ToastEvent, ToastId};
use crate::ui::{SharedView, ToastView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Executing,
    Finished,
    Cancelled,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Finished | TaskState::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FadeIn,
    Hold,
    FadeOut,
}

type DoneHook = Box<dyn FnOnce(ToastId) + Send>;

struct Lifecycle {
    state: TaskState,
    phase: Option<Phase>,
}

pub struct ToastTask {
    id: ToastId,
    runtime: Arc<Runtime>,
    view: SharedView,
    delay: Duration,
    duration: Duration,
    announcement: Option<String>,
    lifecycle: Mutex<Lifecycle>,
    on_done: Mutex<Option<DoneHook>>,
}

impl ToastTask {
    pub fn new(runtime: Arc<Runtime>, toast: Toast) -> Arc<Self> {
        let (id, attributes, on_tap) = toast.into_parts();
        let delay = attributes.delay_duration();
        let duration = attributes.display_duration();
        let announcement = attributes.announcement_text();

        let mut view = ToastView::new(attributes);
        view.set_on_button_tap(on_tap);

        Arc::new(Self {
            id,
            runtime,
            view: Arc::new(Mutex::new(view)),
            delay,
            duration,
            announcement,
            lifecycle: Mutex::new(Lifecycle {
                state: TaskState::Pending,
                phase: None,
            }),
            on_done: Mutex::new(None),
        })
    }

    pub fn id(&self) -> ToastId {
        self.id
    }

    pub fn state(&self) -> TaskState {
        self.lifecycle.lock().state
    }

    /// Current phase; `None` unless executing or fading out
    pub fn phase(&self) -> Option<Phase> {
        self.lifecycle.lock().phase
    }

    pub fn view(&self) -> &SharedView {
        &self.view
    }

    /// Called once, when the task becomes Finished or Cancelled
    pub fn set_on_done(&self, hook: impl FnOnce(ToastId) + Send + 'static) {
        *self.on_done.lock() = Some(Box::new(hook));
    }

    fn finish_hook(&self) {
        let hook = self.on_done.lock().take();
        if let Some(hook) = hook {
            hook(self.id);
        }
    }

    /// Attach the view and begin fading in
    pub fn start(self: &Arc<Self>) {
        let dispatcher = self.runtime.dispatcher();
        if !dispatcher.is_main_thread() {
            let task = Arc::clone(self);
            dispatcher.post(move || task.start());
            return;
        }

        {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.state != TaskState::Pending {
                debug!("Ignoring start of {} in state {:?}", self.id, lifecycle.state);
                return;
            }
            lifecycle.state = TaskState::Executing;
            lifecycle.phase = Some(Phase::FadeIn);
        }

        info!("Showing {}", self.id);
        let now = dispatcher.now();
        let fade = self.runtime.fade_duration();
        {
            let mut view = self.view.lock();
            view.set_needs_layout();
            view.set_opacity(0.0);
            view.animate_opacity(1.0, now, self.delay, fade);
        }
        self.runtime.overlay().attach(self.id, Arc::clone(&self.view));
        self.runtime.notify(ToastEvent::Started(self.id));

        let task = Arc::clone(self);
        dispatcher.schedule(self.delay.saturating_add(fade), move || {
            task.fade_in_finished()
        });
    }

    /// Move from `from` to `to` if the task is still executing in `from`.
    /// The lock stays held so the caller can finish the transition.
    fn advance_phase(&self, from: Phase, to: Phase) -> Option<MutexGuard<'_, Lifecycle>> {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != TaskState::Executing || lifecycle.phase != Some(from) {
            debug!(
                "{} left {:?} early ({:?}), stopping",
                self.id, from, lifecycle.state
            );
            return None;
        }
        lifecycle.phase = Some(to);
        Some(lifecycle)
    }

    fn fade_in_finished(self: &Arc<Self>) {
        if self.advance_phase(Phase::FadeIn, Phase::Hold).is_none() {
            return;
        }

        if self.runtime.is_accessibility_enabled() {
            if let Some(text) = &self.announcement {
                self.runtime.platform().announce(text);
            }
        }
        self.runtime.notify(ToastEvent::Presented(self.id));

        let task = Arc::clone(self);
        self.runtime
            .dispatcher()
            .schedule(self.duration, move || task.hold_finished());
    }

    fn hold_finished(self: &Arc<Self>) {
        {
            let Some(mut lifecycle) = self.advance_phase(Phase::Hold, Phase::FadeOut) else {
                return;
            };
            lifecycle.state = TaskState::Finished;
        }
        debug!("{} finished, fading out", self.id);
        self.runtime.notify(ToastEvent::Finished(self.id));

        let dispatcher = self.runtime.dispatcher();
        let fade = self.runtime.fade_duration();
        self.view
            .lock()
            .animate_opacity(0.0, dispatcher.now(), Duration::ZERO, fade);
        let task = Arc::clone(self);
        dispatcher.schedule(fade, move || task.fade_out_finished());

        // Lets the queue start the next toast while this one fades out
        self.finish_hook();
    }

    fn fade_out_finished(&self) {
        self.lifecycle.lock().phase = None;
        if self.runtime.overlay().detach(self.id) {
            self.runtime.notify(ToastEvent::Removed(self.id));
        }
    }

    /// Stop the task where it is and detach its view on the next turn
    pub fn cancel(&self) {
        {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.state.is_terminal() {
                debug!("Ignoring cancel of {} in state {:?}", self.id, lifecycle.state);
                return;
            }
            lifecycle.state = TaskState::Cancelled;
            lifecycle.phase = None;
        }

        info!("Cancelled {}", self.id);
        self.runtime.notify(ToastEvent::Cancelled(self.id));
        self.finish_hook();

        let runtime = Arc::clone(&self.runtime);
        let id = self.id;
        self.runtime.dispatcher().post(move || {
            if runtime.overlay().detach(id) {
                runtime.notify(ToastEvent::Removed(id));
            }
        });
    }
}

impl std::fmt::Debug for ToastTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lifecycle = self.lifecycle.lock();
        f.debug_struct("ToastTask")
            .field("id", &self.id)
            .field("state", &lifecycle.state)
            .field("phase", &lifecycle.phase)
            .field("delay", &self.delay)
            .field("duration", &self.duration)
            .finish()
    }
}
