//! Shared services behind a toast manager
//!
//! A `Runtime` bundles the main-thread dispatcher, the host platform, the
//! event bus and the per-process UI state (overlay, keyboard tracker). It is
//! built once and handed to a `ToastManager`; tests build their own with a
//! `ManualClock` and a `HeadlessPlatform`.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::attributes::ToastAttributes;
use crate::dispatch::{Clock, Dispatcher, SystemClock};
use crate::events::{EventBus, PlatformEvent};
use crate::keyboard::KeyboardTracker;
use crate::platform::{Platform, WindowId};
use crate::settings::Settings;
use crate::toast::ToastEvent;
use crate::ui::OverlaySurface;

const EVENT_CAPACITY: usize = 256;

/// Window id the overlay reports unless told otherwise
pub const DEFAULT_OVERLAY_WINDOW: WindowId = WindowId(0);

pub struct Runtime {
    settings: Settings,
    dispatcher: Arc<Dispatcher>,
    platform: Arc<dyn Platform>,
    bus: Arc<EventBus>,
    keyboard: Arc<KeyboardTracker>,
    overlay: Arc<OverlaySurface>,
    accessibility: AtomicBool,
    event_tx: Sender<ToastEvent>,
    event_rx: Receiver<ToastEvent>,
}

pub struct RuntimeBuilder {
    platform: Arc<dyn Platform>,
    clock: Option<Arc<dyn Clock>>,
    settings: Settings,
    overlay_window: WindowId,
}

impl RuntimeBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn settings(mut self, settings: &Settings) -> Self {
        self.settings = settings.clone();
        self
    }

    pub fn overlay_window(mut self, id: WindowId) -> Self {
        self.overlay_window = id;
        self
    }

    /// Build the runtime. The calling thread becomes the main thread.
    pub fn build(self) -> Arc<Runtime> {
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()));
        let dispatcher = Arc::new(Dispatcher::new(clock));
        let bus = Arc::new(EventBus::new(Arc::clone(&dispatcher)));

        // The tracker must see keyboard events before the overlay does
        let keyboard = Arc::new(KeyboardTracker::new());
        keyboard.subscribe(&bus);

        let overlay = Arc::new(OverlaySurface::new(
            self.overlay_window,
            Arc::clone(&self.platform),
            Arc::clone(&keyboard),
            Arc::clone(&dispatcher),
        ));
        overlay.subscribe(&bus);

        let (event_tx, event_rx) = bounded(EVENT_CAPACITY);

        info!(
            "Toast runtime ready (device: {:?}, fade: {:?}, queue: {}, announcements: {})",
            self.platform.device_class(),
            self.settings.fade_duration(),
            self.settings.queue_enabled,
            self.settings.accessibility_announcements
        );

        Arc::new(Runtime {
            accessibility: AtomicBool::new(self.settings.accessibility_announcements),
            settings: self.settings,
            dispatcher,
            platform: self.platform,
            bus,
            keyboard,
            overlay,
            event_tx,
            event_rx,
        })
    }
}

impl Runtime {
    pub fn builder(platform: Arc<dyn Platform>) -> RuntimeBuilder {
        RuntimeBuilder {
            platform,
            clock: None,
            settings: Settings::default(),
            overlay_window: DEFAULT_OVERLAY_WINDOW,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn keyboard(&self) -> &Arc<KeyboardTracker> {
        &self.keyboard
    }

    pub fn overlay(&self) -> &Arc<OverlaySurface> {
        &self.overlay
    }

    /// Forward a host notification to every subscriber
    pub fn publish(&self, event: PlatformEvent) {
        self.bus.publish(event);
    }

    pub fn fade_duration(&self) -> Duration {
        self.settings.fade_duration()
    }

    pub fn default_attributes(&self) -> &ToastAttributes {
        &self.settings.default_attributes
    }

    pub fn set_accessibility_enabled(&self, enabled: bool) {
        self.accessibility.store(enabled, Ordering::SeqCst);
    }

    pub fn is_accessibility_enabled(&self) -> bool {
        self.accessibility.load(Ordering::SeqCst)
    }

    /// Lifecycle events. Receivers share one channel, so with several
    /// consumers each event reaches only one of them.
    pub fn events(&self) -> Receiver<ToastEvent> {
        self.event_rx.clone()
    }

    pub(crate) fn notify(&self, event: ToastEvent) {
        debug!("Toast event {:?}", event);
        if let Err(TrySendError::Full(event)) = self.event_tx.try_send(event) {
            debug!("Event channel full, dropping {:?}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ManualClock;
    use crate::platform::HeadlessPlatform;
    use crate::toast::ToastId;

    fn runtime(settings: &Settings) -> Arc<Runtime> {
        Runtime::builder(Arc::new(HeadlessPlatform::phone()))
            .clock(Arc::new(ManualClock::new()))
            .settings(settings)
            .build()
    }

    #[test]
    fn test_builder_applies_settings() {
        let settings = Settings {
            accessibility_announcements: false,
            fade_duration_ms: 200,
            ..Settings::default()
        };
        let rt = runtime(&settings);

        assert!(!rt.is_accessibility_enabled());
        assert_eq!(rt.fade_duration(), Duration::from_millis(200));
        assert_eq!(rt.overlay().window_id(), DEFAULT_OVERLAY_WINDOW);
        // keyboard tracker and overlay
        assert_eq!(rt.bus().subscriber_count(), 2);
    }

    #[test]
    fn test_accessibility_toggle() {
        let rt = runtime(&Settings::default());
        assert!(rt.is_accessibility_enabled());
        rt.set_accessibility_enabled(false);
        assert!(!rt.is_accessibility_enabled());
    }

    #[test]
    fn test_events_are_delivered_in_order() {
        let rt = runtime(&Settings::default());
        let events = rt.events();
        let id = ToastId::next();

        rt.notify(ToastEvent::Started(id));
        rt.notify(ToastEvent::Removed(id));

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(received, vec![ToastEvent::Started(id), ToastEvent::Removed(id)]);
    }

    #[test]
    fn test_full_event_channel_drops_instead_of_blocking() {
        let rt = runtime(&Settings::default());
        let id = ToastId::next();
        for _ in 0..EVENT_CAPACITY + 10 {
            rt.notify(ToastEvent::Presented(id));
        }
        assert_eq!(rt.events().len(), EVENT_CAPACITY);
    }

    #[test]
    fn test_keyboard_events_reach_tracker_and_overlay() {
        let platform = Arc::new(HeadlessPlatform::phone());
        let rt = Runtime::builder(platform)
            .clock(Arc::new(ManualClock::new()))
            .overlay_window(WindowId(42))
            .build();

        rt.publish(PlatformEvent::KeyboardWillShow);
        assert!(rt.keyboard().is_visible());
        assert_eq!(rt.overlay().host(), crate::ui::ViewHost::Window(WindowId(1)));

        rt.publish(PlatformEvent::KeyboardWillHide);
        rt.publish(PlatformEvent::KeyboardDidHide);
        assert!(!rt.keyboard().is_visible());
        assert_eq!(rt.overlay().host(), crate::ui::ViewHost::Overlay);
    }
}
