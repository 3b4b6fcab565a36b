//! Keyboard visibility tracking

use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::events::{EventBus, PlatformEvent, SubscriptionId};

/// Flips to visible on keyboard will-show and back on will-hide
#[derive(Debug, Default)]
pub struct KeyboardTracker {
    visible: AtomicBool,
}

impl KeyboardTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Start following keyboard events for as long as the tracker lives
    pub fn subscribe(self: &Arc<Self>, bus: &EventBus) -> SubscriptionId {
        let tracker: Weak<Self> = Arc::downgrade(self);
        bus.subscribe(move |event| {
            if let Some(tracker) = tracker.upgrade() {
                tracker.handle_event(event);
            }
        })
    }

    fn handle_event(&self, event: &PlatformEvent) {
        match event {
            PlatformEvent::KeyboardWillShow => {
                debug!("Keyboard will show");
                self.visible.store(true, Ordering::SeqCst);
            }
            PlatformEvent::KeyboardWillHide => {
                debug!("Keyboard will hide");
                self.visible.store(false, Ordering::SeqCst);
            }
            _ => {}
        }
    }
}
