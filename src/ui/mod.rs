//! Toast view and the overlay hosting it

pub mod overlay;
pub mod view;

pub use overlay::{OverlaySurface, SharedView, TapOutcome, ViewHost};
pub use view::{Label, LayoutEnv, OpacityAnimation, TapCallback, ToastLayout, ToastView};
