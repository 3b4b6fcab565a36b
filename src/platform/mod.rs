//! Host platform services
//!
//! Windowing, text measurement, orientation and accessibility are provided
//! by the host toolkit. The core only talks to them through [`Platform`].

mod headless;

pub use headless::HeadlessPlatform;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attributes::Font;
use crate::geometry::{EdgeInsets, Orientation, Size};

/// Device family of the host, which picks default bottom offsets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceClass {
    #[default]
    Phone,
    Pad,
    Tv,
    CarPlay,
    Mac,
    Vision,
    Unspecified,
}

impl DeviceClass {
    /// Distance between the toast and the bottom edge when the attributes
    /// don't name one
    pub fn default_bottom_offset(&self, orientation: Orientation) -> f64 {
        let (portrait, landscape) = match self {
            DeviceClass::Phone => (39.0, 39.0),
            DeviceClass::Pad => (60.0, 40.0),
            DeviceClass::Tv => (90.0, 60.0),
            DeviceClass::CarPlay => (30.0, 20.0),
            DeviceClass::Mac => (60.0, 40.0),
            DeviceClass::Vision => (60.0, 40.0),
            DeviceClass::Unspecified => (3.0, 20.0),
        };
        if orientation.is_portrait() {
            portrait
        } else {
            landscape
        }
    }
}

/// Host application traits that decide whether the overlay must follow
/// interface rotation by itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationTraits {
    pub supports_all_orientations: bool,
    pub requires_full_screen: bool,
    pub has_launch_storyboard: bool,
}

impl RotationTraits {
    /// Multitasking-capable pad apps get automatic rotation; everything else
    /// has to be rotated by hand
    pub fn should_rotate_manually(&self, device: DeviceClass) -> bool {
        let automatic = device == DeviceClass::Pad
            && self.supports_all_orientations
            && !self.requires_full_screen
            && self.has_launch_storyboard;
        !automatic
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// A host window as seen by the overlay's top-window search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    pub id: WindowId,
    pub is_opaque: bool,
}

pub trait Platform: Send + Sync {
    fn screen_size(&self) -> Size;

    /// Bounds of the application's first window, if it has one
    fn main_window_size(&self) -> Option<Size>;

    fn device_class(&self) -> DeviceClass;

    fn interface_orientation(&self) -> Orientation;

    fn safe_area_insets(&self) -> EdgeInsets;

    /// Application windows, oldest first
    fn windows(&self) -> Vec<WindowInfo>;

    fn rotation_traits(&self) -> RotationTraits;

    /// Size of `text` laid out in `font`, wrapped at `max_width`, with
    /// unbounded height
    fn measure_text(&self, text: &str, font: &Font, max_width: f64) -> Size;

    /// Post a spoken announcement for assistive technology
    fn announce(&self, text: &str);

    /// Move the overlay's toast views onto `window`, or back onto the
    /// overlay when `None`
    fn reparent_views(&self, _window: Option<WindowId>) {}
}
