//! Topmost overlay hosting the active toast views
//!
//! The overlay passes every touch through except those landing on a visible
//! toast. It follows interface rotation (by hand when the host can't rotate
//! it) and moves its views onto the top window while a keyboard is shown.

use log::{debug, info};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use super::view::{LayoutEnv, ToastView};
use crate::dispatch::Dispatcher;
use crate::events::{EventBus, PlatformEvent, SubscriptionId};
use crate::geometry::{Orientation, Point, Rect};
use crate::keyboard::KeyboardTracker;
use crate::platform::{Platform, WindowId};
use crate::toast::ToastId;

pub type SharedView = Arc<Mutex<ToastView>>;

/// Where the overlay's views currently live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewHost {
    Overlay,
    Window(WindowId),
}

/// Result of routing a tap through the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapOutcome {
    pub toast: ToastId,
    pub on_button: bool,
}

struct AttachedView {
    id: ToastId,
    view: SharedView,
}

struct OverlayState {
    frame: Rect,
    rotation: f64,
    rotating: bool,
    host: ViewHost,
    views: Vec<AttachedView>,
}

pub struct OverlaySurface {
    window_id: WindowId,
    platform: Arc<dyn Platform>,
    keyboard: Arc<KeyboardTracker>,
    dispatcher: Arc<Dispatcher>,
    state: Mutex<OverlayState>,
}

impl OverlaySurface {
    pub fn new(
        window_id: WindowId,
        platform: Arc<dyn Platform>,
        keyboard: Arc<KeyboardTracker>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        let frame = Rect {
            origin: Point::ZERO,
            size: platform.screen_size(),
        };
        Self {
            window_id,
            platform,
            keyboard,
            dispatcher,
            state: Mutex::new(OverlayState {
                frame,
                rotation: 0.0,
                rotating: false,
                host: ViewHost::Overlay,
                views: Vec::new(),
            }),
        }
    }

    pub fn subscribe(self: &Arc<Self>, bus: &EventBus) -> SubscriptionId {
        let overlay: Weak<Self> = Arc::downgrade(self);
        bus.subscribe(move |event| {
            if let Some(overlay) = overlay.upgrade() {
                overlay.handle_event(event);
            }
        })
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn frame(&self) -> Rect {
        self.state.lock().frame
    }

    /// Rotation (radians) applied to the overlay itself
    pub fn rotation(&self) -> f64 {
        self.state.lock().rotation
    }

    pub fn is_rotating(&self) -> bool {
        self.state.lock().rotating
    }

    pub fn host(&self) -> ViewHost {
        self.state.lock().host
    }

    pub fn should_rotate_manually(&self) -> bool {
        self.platform
            .rotation_traits()
            .should_rotate_manually(self.platform.device_class())
    }

    pub fn layout_env(&self) -> LayoutEnv {
        LayoutEnv {
            screen: self.platform.screen_size(),
            orientation: self.platform.interface_orientation(),
            device_class: self.platform.device_class(),
            safe_area_bottom: self.platform.safe_area_insets().bottom,
            rotate_manually: self.should_rotate_manually(),
        }
    }

    /// Add a view on top of the attached ones and lay it out
    pub fn attach(&self, id: ToastId, view: SharedView) {
        {
            let mut state = self.state.lock();
            if state.views.iter().any(|v| v.id == id) {
                debug!("{} already attached", id);
                return;
            }
            state.views.push(AttachedView {
                id,
                view: Arc::clone(&view),
            });
            debug!("Attached {} to {:?}", id, state.host);
        }

        let env = self.layout_env();
        view.lock().layout_if_needed(self.platform.as_ref(), &env);
    }

    pub fn detach(&self, id: ToastId) -> bool {
        let mut state = self.state.lock();
        let before = state.views.len();
        state.views.retain(|v| v.id != id);
        let removed = state.views.len() != before;
        if removed {
            debug!("Detached {}", id);
        }
        removed
    }

    pub fn is_attached(&self, id: ToastId) -> bool {
        self.state.lock().views.iter().any(|v| v.id == id)
    }

    pub fn attached_ids(&self) -> Vec<ToastId> {
        self.state.lock().views.iter().map(|v| v.id).collect()
    }

    pub fn attached_count(&self) -> usize {
        self.state.lock().views.len()
    }

    fn snapshot(&self) -> Vec<(ToastId, SharedView)> {
        self.state
            .lock()
            .views
            .iter()
            .map(|v| (v.id, Arc::clone(&v.view)))
            .collect()
    }

    /// Lay out every attached view that asked for it
    pub fn layout_views(&self) {
        let env = self.layout_env();
        for (_, view) in self.snapshot() {
            view.lock().layout_if_needed(self.platform.as_ref(), &env);
        }
    }

    /// Force a fresh layout of every attached view
    pub fn relayout_all(&self) {
        for (_, view) in self.snapshot() {
            view.lock().set_needs_layout();
        }
        self.layout_views();
    }

    /// The topmost visible toast claiming `point`; `None` means the touch
    /// passes through to the content below
    pub fn hit_test(&self, point: Point) -> Option<ToastId> {
        let now = self.dispatcher.now();
        self.snapshot()
            .into_iter()
            .rev()
            .find(|(_, view)| {
                let view = view.lock();
                view.opacity_at(now) > 0.0 && view.hit_test(point)
            })
            .map(|(id, _)| id)
    }

    /// Route a tap: fires the button callback when the tap lands on a
    /// toast's button
    pub fn dispatch_tap(&self, point: Point) -> Option<TapOutcome> {
        let toast = self.hit_test(point)?;
        let view = self
            .snapshot()
            .into_iter()
            .find(|(id, _)| *id == toast)
            .map(|(_, view)| view)?;

        // Release the view before running user code
        let callback = view.lock().button_tap_target(point);
        let on_button = callback.is_some();
        if let Some(callback) = callback {
            info!("Button tapped on {}", toast);
            callback();
        }
        Some(TapOutcome { toast, on_button })
    }

    /// Most recently added window that is opaque, or any window while the
    /// keyboard is up; never the overlay itself
    pub fn top_window(&self) -> Option<WindowId> {
        let keyboard_visible = self.keyboard.is_visible();
        self.platform
            .windows()
            .into_iter()
            .rev()
            .filter(|w| w.id != self.window_id)
            .find(|w| keyboard_visible || w.is_opaque)
            .map(|w| w.id)
    }

    fn handle_event(self: &Arc<Self>, event: &PlatformEvent) {
        match event {
            PlatformEvent::InterfaceOrientationWillChange => {
                self.state.lock().rotating = true;
            }
            PlatformEvent::InterfaceOrientationDidChange(orientation) => {
                self.handle_rotate(*orientation);
                self.state.lock().rotating = false;
            }
            PlatformEvent::DidBecomeActive => {
                self.handle_rotate(self.platform.interface_orientation());
            }
            PlatformEvent::KeyboardWillShow => self.keyboard_will_show(),
            PlatformEvent::KeyboardDidHide => self.keyboard_did_hide(),
            PlatformEvent::DeviceOrientationDidChange | PlatformEvent::KeyboardWillHide => {}
        }
    }

    fn handle_rotate(self: &Arc<Self>, orientation: Orientation) {
        let manual = self.should_rotate_manually();
        let window_size = self.platform.main_window_size();

        {
            let mut state = self.state.lock();
            state.rotation = if manual {
                orientation.rotation_angle()
            } else {
                0.0
            };
            if let Some(size) = window_size {
                state.frame.size = if orientation.is_portrait() || !manual {
                    size
                } else {
                    size.swapped()
                };
            }
            state.frame.origin = Point::ZERO;
            debug!(
                "Overlay rotated to {:?} (manual: {}, frame: {:?})",
                orientation, manual, state.frame
            );
        }

        let overlay = Arc::downgrade(self);
        self.dispatcher.post(move || {
            if let Some(overlay) = overlay.upgrade() {
                overlay.relayout_all();
            }
        });
    }

    fn keyboard_will_show(&self) {
        let Some(top) = self.top_window() else {
            return;
        };
        if self.set_host(ViewHost::Window(top)) {
            self.platform.reparent_views(Some(top));
        }
    }

    fn keyboard_did_hide(&self) {
        if self.set_host(ViewHost::Overlay) {
            self.platform.reparent_views(None);
        }
    }

    /// Returns whether the host changed
    fn set_host(&self, host: ViewHost) -> bool {
        let mut state = self.state.lock();
        if state.host == host {
            return false;
        }
        state.host = host;
        info!("Moved {} toast views onto {:?}", state.views.len(), host);
        true
    }
}
