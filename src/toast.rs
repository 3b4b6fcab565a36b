//! Public toast builder

use log::warn;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::attributes::{StyledText, ToastAttributes};
use crate::manager::ToastManager;
use crate::ui::TapCallback;

/// Process-unique toast identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl ToastId {
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast#{}", self.0)
    }
}

/// Lifecycle notifications published by a runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastEvent {
    /// Attached to the overlay and fading in
    Started(ToastId),
    /// Fade-in complete, holding for its display duration
    Presented(ToastId),
    /// Display duration elapsed; the next toast may start
    Finished(ToastId),
    Cancelled(ToastId),
    /// View detached from the overlay
    Removed(ToastId),
    /// Action button tapped
    Tapped(ToastId),
}

impl ToastEvent {
    pub fn id(&self) -> ToastId {
        match self {
            ToastEvent::Started(id)
            | ToastEvent::Presented(id)
            | ToastEvent::Finished(id)
            | ToastEvent::Cancelled(id)
            | ToastEvent::Removed(id)
            | ToastEvent::Tapped(id) => *id,
        }
    }
}

/// A toast waiting to be shown
///
/// ```no_run
/// use toaster::Toast;
/// use std::time::Duration;
///
/// Toast::text("Copied to clipboard")
///     .duration(Duration::from_secs(3))
///     .show();
/// ```
pub struct Toast {
    id: ToastId,
    attributes: ToastAttributes,
    on_tap: Option<TapCallback>,
}

impl Toast {
    pub fn new(attributes: ToastAttributes) -> Self {
        Self {
            id: ToastId::next(),
            attributes,
            on_tap: None,
        }
    }

    /// Message-only toast with default styling
    pub fn text(message: impl Into<String>) -> Self {
        Self::new(ToastAttributes::for_message(message))
    }

    /// Message-only toast rendered with its own font and color
    pub fn styled(text: StyledText) -> Self {
        let defaults = ToastAttributes::default();
        Self::new(ToastAttributes {
            title: None,
            message: text.text,
            message_font: text.font,
            foreground_color: text.color,
            use_styled_text: true,
            underline_message: text.underline,
            ..defaults
        })
    }

    /// Show the action button with `title`
    pub fn button(mut self, title: impl Into<String>) -> Self {
        self.attributes.button_title = title.into();
        self.attributes.show_button = true;
        self
    }

    /// Called when the action button is tapped
    pub fn on_tap(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_tap = Some(Arc::new(callback));
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.attributes.delay = delay.as_secs_f64();
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.attributes.duration = duration.as_secs_f64();
        self
    }

    pub fn id(&self) -> ToastId {
        self.id
    }

    pub fn attributes(&self) -> &ToastAttributes {
        &self.attributes
    }

    /// Enqueue on the process-wide manager. Returns `None` when no manager
    /// has been installed.
    pub fn show(self) -> Option<ToastId> {
        match ToastManager::shared() {
            Some(manager) => Some(manager.show(self)),
            None => {
                warn!("No default toast manager installed, dropping {}", self.id);
                None
            }
        }
    }

    pub fn show_on(self, manager: &ToastManager) -> ToastId {
        manager.show(self)
    }

    pub(crate) fn into_parts(self) -> (ToastId, ToastAttributes, Option<TapCallback>) {
        (self.id, self.attributes, self.on_tap)
    }
}

impl fmt::Debug for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toast")
            .field("id", &self.id)
            .field("message", &self.attributes.message)
            .field("has_tap_callback", &self.on_tap.is_some())
            .finish()
    }
}
