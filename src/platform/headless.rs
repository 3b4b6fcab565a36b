//! In-memory platform used by tests and the headless demo

use log::debug;
use parking_lot::Mutex;

use super::{DeviceClass, Platform, RotationTraits, WindowId, WindowInfo};
use crate::attributes::Font;
use crate::geometry::{EdgeInsets, Orientation, Size};

struct HeadlessState {
    screen_size: Size,
    device_class: DeviceClass,
    orientation: Orientation,
    safe_area: EdgeInsets,
    windows: Vec<WindowInfo>,
    rotation_traits: RotationTraits,
    announcements: Vec<String>,
    reparents: Vec<Option<WindowId>>,
}

/// A fake host with a fixed-advance text metric: every glyph is half the
/// font size wide and every line is the font size plus 4 points tall
pub struct HeadlessPlatform {
    state: Mutex<HeadlessState>,
}

impl HeadlessPlatform {
    pub fn new(screen_size: Size, device_class: DeviceClass) -> Self {
        Self {
            state: Mutex::new(HeadlessState {
                screen_size,
                device_class,
                orientation: Orientation::Portrait,
                safe_area: EdgeInsets::ZERO,
                windows: vec![WindowInfo {
                    id: WindowId(1),
                    is_opaque: true,
                }],
                rotation_traits: RotationTraits::default(),
                announcements: Vec::new(),
                reparents: Vec::new(),
            }),
        }
    }

    /// A 390x844 phone in portrait
    pub fn phone() -> Self {
        Self::new(Size::new(390.0, 844.0), DeviceClass::Phone)
    }

    /// A 1024x1366 pad in portrait
    pub fn pad() -> Self {
        Self::new(Size::new(1024.0, 1366.0), DeviceClass::Pad)
    }

    pub fn set_screen_size(&self, size: Size) {
        self.state.lock().screen_size = size;
    }

    pub fn set_device_class(&self, device_class: DeviceClass) {
        self.state.lock().device_class = device_class;
    }

    pub fn set_orientation(&self, orientation: Orientation) {
        self.state.lock().orientation = orientation;
    }

    pub fn set_safe_area(&self, insets: EdgeInsets) {
        self.state.lock().safe_area = insets;
    }

    pub fn set_rotation_traits(&self, traits: RotationTraits) {
        self.state.lock().rotation_traits = traits;
    }

    /// Add a window on top of the existing ones
    pub fn push_window(&self, window: WindowInfo) {
        self.state.lock().windows.push(window);
    }

    pub fn remove_window(&self, id: WindowId) {
        self.state.lock().windows.retain(|w| w.id != id);
    }

    pub fn announcements(&self) -> Vec<String> {
        self.state.lock().announcements.clone()
    }

    /// Every re-parent request so far; `None` means back onto the overlay
    pub fn reparents(&self) -> Vec<Option<WindowId>> {
        self.state.lock().reparents.clone()
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::phone()
    }
}

impl Platform for HeadlessPlatform {
    fn screen_size(&self) -> Size {
        self.state.lock().screen_size
    }

    fn main_window_size(&self) -> Option<Size> {
        let state = self.state.lock();
        if state.windows.is_empty() {
            None
        } else {
            Some(state.screen_size)
        }
    }

    fn device_class(&self) -> DeviceClass {
        self.state.lock().device_class
    }

    fn interface_orientation(&self) -> Orientation {
        self.state.lock().orientation
    }

    fn safe_area_insets(&self) -> EdgeInsets {
        self.state.lock().safe_area
    }

    fn windows(&self) -> Vec<WindowInfo> {
        self.state.lock().windows.clone()
    }

    fn rotation_traits(&self) -> RotationTraits {
        self.state.lock().rotation_traits
    }

    fn measure_text(&self, text: &str, font: &Font, max_width: f64) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }

        let glyph = font.size / 2.0;
        let line_height = font.size + 4.0;
        let per_line = if glyph > 0.0 {
            ((max_width / glyph).floor() as usize).max(1)
        } else {
            usize::MAX
        };

        let mut lines = 0usize;
        let mut widest = 0usize;
        for paragraph in text.split('\n') {
            let chars = paragraph.chars().count();
            lines += chars.div_ceil(per_line).max(1);
            widest = widest.max(chars.min(per_line));
        }

        Size::new(widest as f64 * glyph, lines as f64 * line_height)
    }

    fn announce(&self, text: &str) {
        debug!("Accessibility announcement: {}", text);
        self.state.lock().announcements.push(text.to_string());
    }

    fn reparent_views(&self, window: Option<WindowId>) {
        self.state.lock().reparents.push(window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_single_line() {
        let platform = HeadlessPlatform::phone();
        let size = platform.measure_text("Hello", &Font::system(10.0), 300.0);
        assert_eq!(size, Size::new(25.0, 14.0));
    }

    #[test]
    fn test_measure_wraps_at_max_width() {
        let platform = HeadlessPlatform::phone();
        // 5pt glyphs, 20 per line at 100pt, 45 chars -> 3 lines
        let text = "a".repeat(45);
        let size = platform.measure_text(&text, &Font::system(10.0), 100.0);
        assert_eq!(size, Size::new(100.0, 42.0));
    }

    #[test]
    fn test_measure_empty_is_zero() {
        let platform = HeadlessPlatform::phone();
        assert_eq!(
            platform.measure_text("", &Font::system(13.0), 100.0),
            Size::ZERO
        );
    }

    #[test]
    fn test_measure_honours_newlines() {
        let platform = HeadlessPlatform::phone();
        let size = platform.measure_text("ab\nabcd", &Font::system(10.0), 300.0);
        assert_eq!(size, Size::new(20.0, 28.0));
    }

    #[test]
    fn test_announcements_are_recorded() {
        let platform = HeadlessPlatform::phone();
        platform.announce("Saved");
        assert_eq!(platform.announcements(), vec!["Saved".to_string()]);
    }

    #[test]
    fn test_window_stack() {
        let platform = HeadlessPlatform::phone();
        platform.push_window(WindowInfo {
            id: WindowId(7),
            is_opaque: false,
        });
        assert_eq!(platform.windows().len(), 2);
        assert_eq!(platform.windows().last().map(|w| w.id), Some(WindowId(7)));

        platform.remove_window(WindowId(7));
        assert_eq!(platform.windows().len(), 1);
    }
}
