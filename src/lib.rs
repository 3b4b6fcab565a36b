//! Queued, animated toast notifications for a mobile UI host
//!
//! Toasts are shown one at a time on an overlay above the application's
//! content. The host supplies screen metrics, text measurement and
//! accessibility through [`Platform`], forwards orientation and keyboard
//! notifications through [`Runtime::publish`], and drives the main-thread
//! [`Dispatcher`].

pub mod attributes;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod geometry;
pub mod keyboard;
pub mod manager;
pub mod platform;
pub mod queue;
pub mod runtime;
pub mod settings;
pub mod task;
pub mod toast;
pub mod ui;

#[cfg(test)]
mod testing;

pub use attributes::{Color, Delay, Font, FontWeight, StyledText, ToastAttributes};
pub use dispatch::{Clock, Dispatcher, ManualClock, SystemClock};
pub use error::AttributesError;
pub use events::{EventBus, PlatformEvent, SubscriptionId};
pub use geometry::{EdgeInsets, Orientation, Point, Rect, Size};
pub use keyboard::KeyboardTracker;
pub use manager::ToastManager;
pub use platform::{DeviceClass, HeadlessPlatform, Platform, RotationTraits, WindowId, WindowInfo};
pub use queue::ToastQueue;
pub use runtime::{Runtime, RuntimeBuilder};
pub use settings::Settings;
pub use task::{Phase, TaskState, ToastTask};
pub use toast::{Toast, ToastEvent, ToastId};
pub use ui::{OverlaySurface, TapOutcome, ToastView, ViewHost};
