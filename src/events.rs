//! Platform event subscription
//!
//! Orientation, keyboard and app-activity notifications from the host are
//! published here; components subscribe explicitly instead of looking up a
//! global notification center.

use log::debug;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dispatch::Dispatcher;
use crate::geometry::Orientation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The interface is about to rotate
    InterfaceOrientationWillChange,
    /// The interface finished rotating to the given orientation
    InterfaceOrientationDidChange(Orientation),
    /// The physical device orientation changed
    DeviceOrientationDidChange,
    /// The application became active
    DidBecomeActive,
    KeyboardWillShow,
    KeyboardWillHide,
    KeyboardDidHide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&PlatformEvent) + Send + Sync>;

pub struct EventBus {
    dispatcher: Arc<Dispatcher>,
    handlers: RwLock<Vec<(SubscriptionId, Handler)>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a handler. Handlers run on the main thread in subscription
    /// order.
    pub fn subscribe(
        &self,
        handler: impl Fn(&PlatformEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, Arc::new(handler)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(sid, _)| *sid != id);
        handlers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Deliver `event` to every subscriber, on the main thread
    pub fn publish(self: &Arc<Self>, event: PlatformEvent) {
        let bus = Arc::clone(self);
        self.dispatcher.run_on_main(move || bus.deliver(&event));
    }

    fn deliver(&self, event: &PlatformEvent) {
        debug!("Delivering platform event {:?}", event);
        // Snapshot so handlers may (un)subscribe while running
        let handlers: Vec<Handler> = self
            .handlers
            .read()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();

        for handler in handlers {
            handler(event);
        }
    }
}
