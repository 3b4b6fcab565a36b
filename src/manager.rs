//! Public entry point owning the toast queue

use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Weak};

use crossbeam_channel::Receiver;

use crate::attributes::ToastAttributes;
use crate::events::{PlatformEvent, SubscriptionId};
use crate::geometry::Point;
use crate::queue::ToastQueue;
use crate::runtime::Runtime;
use crate::task::ToastTask;
use crate::toast::{Toast, ToastEvent, ToastId};
use crate::ui::{OverlaySurface, TapOutcome};

static DEFAULT: OnceCell<Arc<ToastManager>> = OnceCell::new();

/// Shows toasts one at a time on a runtime's overlay
pub struct ToastManager {
    runtime: Arc<Runtime>,
    queue: Arc<ToastQueue>,
    subscription: SubscriptionId,
}

impl ToastManager {
    pub fn new(runtime: Arc<Runtime>) -> Arc<Self> {
        let queue = ToastQueue::new(
            Arc::clone(runtime.dispatcher()),
            runtime.settings().queue_enabled,
        );

        let weak_queue: Weak<ToastQueue> = Arc::downgrade(&queue);
        let weak_overlay: Weak<OverlaySurface> = Arc::downgrade(runtime.overlay());
        let subscription = runtime.bus().subscribe(move |event| {
            if *event != PlatformEvent::DeviceOrientationDidChange {
                return;
            }
            if let (Some(queue), Some(overlay)) = (weak_queue.upgrade(), weak_overlay.upgrade()) {
                relayout_last(&queue, &overlay);
            }
        });

        Arc::new(Self {
            runtime,
            queue,
            subscription,
        })
    }

    /// Make `manager` the process-wide default used by `Toast::show`. Only
    /// the first call wins.
    pub fn install(manager: Arc<Self>) -> bool {
        match DEFAULT.set(manager) {
            Ok(()) => {
                info!("Installed default toast manager");
                true
            }
            Err(_) => {
                warn!("A default toast manager is already installed");
                false
            }
        }
    }

    pub fn shared() -> Option<Arc<Self>> {
        DEFAULT.get().cloned()
    }

    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    pub fn queue(&self) -> &Arc<ToastQueue> {
        &self.queue
    }

    /// A message-only toast styled with the runtime's default attributes
    pub fn toast(&self, message: impl Into<String>) -> Toast {
        Toast::new(ToastAttributes {
            title: None,
            message: message.into(),
            ..self.runtime.default_attributes().clone()
        })
    }

    pub fn show(&self, toast: Toast) -> ToastId {
        let task = ToastTask::new(Arc::clone(&self.runtime), toast);
        let id = task.id();
        debug!("Enqueueing {}", id);
        self.queue.enqueue(task);
        id
    }

    pub fn cancel(&self, id: ToastId) -> bool {
        self.queue.cancel(id)
    }

    pub fn cancel_all(&self) {
        self.queue.cancel_all();
    }

    /// The toast being shown, or next in line
    pub fn current(&self) -> Option<ToastId> {
        self.queue.current_task().map(|task| task.id())
    }

    pub fn set_queue_enabled(&self, enabled: bool) {
        self.queue.set_enabled(enabled);
    }

    pub fn is_queue_enabled(&self) -> bool {
        self.queue.is_enabled()
    }

    pub fn set_accessibility_enabled(&self, enabled: bool) {
        self.runtime.set_accessibility_enabled(enabled);
    }

    pub fn is_accessibility_enabled(&self) -> bool {
        self.runtime.is_accessibility_enabled()
    }

    pub fn events(&self) -> Receiver<ToastEvent> {
        self.runtime.events()
    }

    /// Route a tap from the host. Taps outside any toast return `None` and
    /// belong to the content underneath.
    pub fn handle_tap(&self, point: Point) -> Option<TapOutcome> {
        let outcome = self.runtime.overlay().dispatch_tap(point)?;
        if outcome.on_button {
            self.runtime.notify(ToastEvent::Tapped(outcome.toast));
        }
        Some(outcome)
    }
}

impl Drop for ToastManager {
    fn drop(&mut self) {
        self.runtime.bus().unsubscribe(self.subscription);
    }
}

fn relayout_last(queue: &ToastQueue, overlay: &OverlaySurface) {
    let Some(task) = queue.last_task() else {
        return;
    };
    debug!("Device rotated, laying out {} again", task.id());
    task.view().lock().set_needs_layout();
    overlay.layout_views();
}
