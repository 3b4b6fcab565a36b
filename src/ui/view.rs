//! The toast view: bound content, self-computed frame, opacity and
//! hit-testing

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::attributes::{Color, Font, StyledText, ToastAttributes};
use crate::geometry::{Orientation, Point, Rect, Size};
use crate::platform::{DeviceClass, Platform};

pub type TapCallback = Arc<dyn Fn() + Send + Sync>;

/// One displayed text element
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    Plain {
        text: String,
        font: Font,
        color: Color,
    },
    Styled(StyledText),
}

impl Label {
    pub fn text(&self) -> &str {
        match self {
            Label::Plain { text, .. } => text,
            Label::Styled(styled) => &styled.text,
        }
    }

    pub fn font(&self) -> &Font {
        match self {
            Label::Plain { font, .. } => font,
            Label::Styled(styled) => &styled.font,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Label::Plain { color, .. } => *color,
            Label::Styled(styled) => styled.color,
        }
    }

    pub fn is_styled(&self) -> bool {
        matches!(self, Label::Styled(_))
    }
}

/// Host conditions the layout depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEnv {
    pub screen: Size,
    pub orientation: Orientation,
    pub device_class: DeviceClass,
    pub safe_area_bottom: f64,
    pub rotate_manually: bool,
}

/// Result of a layout pass. `frame` is in the parent's coordinates, every
/// other rect is relative to the frame's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToastLayout {
    pub frame: Rect,
    pub background: Rect,
    pub title: Option<Rect>,
    pub message: Option<Rect>,
    pub button: Option<Rect>,
    /// Widest the background may grow (screen width times the width ratio)
    pub available_width: f64,
    pub bottom_offset: f64,
}

/// Linear opacity ramp on the dispatcher's clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityAnimation {
    pub from: f64,
    pub to: f64,
    pub start: Duration,
    pub duration: Duration,
}

impl OpacityAnimation {
    pub fn value_at(&self, now: Duration) -> f64 {
        if now <= self.start {
            return self.from;
        }
        let elapsed = now - self.start;
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * progress
    }

    pub fn end(&self) -> Duration {
        self.start.saturating_add(self.duration)
    }
}

pub struct ToastView {
    attributes: ToastAttributes,
    title: Option<Label>,
    message: Option<Label>,
    button: Option<Label>,
    background_color: Color,
    corner_radius: f64,
    layout: Option<ToastLayout>,
    needs_layout: bool,
    opacity: f64,
    animation: Option<OpacityAnimation>,
    on_button_tap: Option<TapCallback>,
}

impl ToastView {
    pub fn new(attributes: ToastAttributes) -> Self {
        let mut view = Self {
            attributes: ToastAttributes::default(),
            title: None,
            message: None,
            button: None,
            background_color: Color::CHARCOAL,
            corner_radius: 0.0,
            layout: None,
            needs_layout: true,
            opacity: 1.0,
            animation: None,
            on_button_tap: None,
        };
        view.bind(attributes);
        view
    }

    /// Replace the displayed content with `attributes` and request layout
    pub fn bind(&mut self, attributes: ToastAttributes) {
        self.background_color = attributes.background_color;
        self.corner_radius = attributes.corner_radius;

        if attributes.use_styled_text {
            self.title = attributes.title_styled_text().map(Label::Styled);
            self.message = attributes.message_styled_text().map(Label::Styled);
        } else {
            self.title = attributes.title.as_ref().map(|title| Label::Plain {
                text: title.clone(),
                font: attributes.title_font.clone(),
                color: attributes.foreground_color,
            });
            self.message = (!attributes.message.is_empty()).then(|| Label::Plain {
                text: attributes.message.clone(),
                font: attributes.message_font.clone(),
                color: attributes.foreground_color,
            });
        }

        self.button = if attributes.use_styled_button_title {
            attributes.button_styled_text().map(Label::Styled)
        } else {
            (!attributes.button_title.is_empty()).then(|| Label::Plain {
                text: attributes.button_title.clone(),
                font: attributes.button_font.clone(),
                color: attributes.foreground_color,
            })
        };

        self.attributes = attributes;
        self.set_needs_layout();
    }

    pub fn attributes(&self) -> &ToastAttributes {
        &self.attributes
    }

    pub fn title(&self) -> Option<&Label> {
        self.title.as_ref()
    }

    pub fn message(&self) -> Option<&Label> {
        self.message.as_ref()
    }

    pub fn button(&self) -> Option<&Label> {
        self.button.as_ref()
    }

    pub fn title_text(&self) -> Option<&str> {
        self.title.as_ref().map(Label::text)
    }

    pub fn message_text(&self) -> Option<&str> {
        self.message.as_ref().map(Label::text)
    }

    pub fn button_title(&self) -> Option<&str> {
        self.button.as_ref().map(Label::text)
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    pub fn is_button_visible(&self) -> bool {
        self.attributes.show_button && self.button.is_some()
    }

    pub fn set_on_button_tap(&mut self, callback: Option<TapCallback>) {
        self.on_button_tap = callback;
    }

    pub fn set_needs_layout(&mut self) {
        self.needs_layout = true;
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn current_layout(&self) -> Option<&ToastLayout> {
        self.layout.as_ref()
    }

    /// Frame in the parent's coordinates; zero before the first layout
    pub fn frame(&self) -> Rect {
        self.layout.map(|l| l.frame).unwrap_or(Rect::ZERO)
    }

    pub fn layout_if_needed(&mut self, platform: &dyn Platform, env: &LayoutEnv) {
        if self.needs_layout || self.layout.is_none() {
            self.layout(platform, env);
        }
    }

    /// Measure the content and place the toast centred above the bottom
    /// edge
    pub fn layout(&mut self, platform: &dyn Platform, env: &LayoutEnv) -> ToastLayout {
        let attrs = &self.attributes;
        let insets = attrs.content_insets;
        let available_width = (env.screen.width * attrs.max_width_ratio).max(0.0);
        let inner_width = (available_width - insets.horizontal()).max(0.0);

        let measure = |label: &Label, max_width: f64| {
            let size = platform.measure_text(label.text(), label.font(), max_width);
            Size::new(size.width.min(max_width), size.height)
        };

        let button_size = match (&self.button, self.attributes.show_button) {
            (Some(button), true) => measure(button, inner_width),
            _ => Size::ZERO,
        };
        let text_limit = (inner_width - button_size.width).max(0.0);

        let title_size = self.title.as_ref().map(|l| measure(l, text_limit));
        let message_size = self.message.as_ref().map(|l| measure(l, text_limit));

        let title_height = title_size.map_or(0.0, |s| s.height);
        let stack = Size::new(
            title_size
                .map_or(0.0, |s| s.width)
                .max(message_size.map_or(0.0, |s| s.width)),
            title_height + message_size.map_or(0.0, |s| s.height),
        );
        let content = Size::new(
            stack.width + button_size.width,
            stack.height.max(button_size.height),
        );

        let background = Rect::new(
            0.0,
            0.0,
            (content.width + insets.horizontal()).min(available_width),
            content.height + insets.vertical(),
        );

        let title = title_size.map(|s| Rect::new(insets.left, insets.top, s.width, s.height));
        let message = message_size
            .map(|s| Rect::new(insets.left, insets.top + title_height, s.width, s.height));
        let button = (!button_size.is_empty()).then(|| {
            Rect::new(
                background.size.width - insets.right - button_size.width,
                insets.top + (content.height - button_size.height) / 2.0,
                button_size.width,
                button_size.height,
            )
        });

        let container = if env.orientation.is_landscape() && env.rotate_manually {
            env.screen.swapped()
        } else {
            env.screen
        };

        let explicit = if env.orientation.is_portrait() {
            attrs.bottom_offset_portrait
        } else {
            attrs.bottom_offset_landscape
        };
        let mut bottom_offset = if explicit > 0.0 {
            explicit
        } else {
            env.device_class.default_bottom_offset(env.orientation)
        };
        if attrs.use_safe_area_for_bottom_offset {
            bottom_offset += env.safe_area_bottom;
        }

        let frame = Rect::new(
            (container.width - background.size.width) * 0.5,
            container.height - (background.size.height + bottom_offset),
            background.size.width,
            background.size.height,
        );

        let layout = ToastLayout {
            frame,
            background,
            title,
            message,
            button,
            available_width,
            bottom_offset,
        };
        self.layout = Some(layout);
        self.needs_layout = false;
        layout
    }

    /// Whether `point` (parent coordinates) falls on the toast
    pub fn hit_test(&self, point: Point) -> bool {
        self.layout.is_some_and(|l| l.frame.contains(point))
    }

    /// The tap callback, if `point` (parent coordinates) lands on the
    /// visible button
    pub fn button_tap_target(&self, point: Point) -> Option<TapCallback> {
        if !self.is_button_visible() {
            return None;
        }
        let layout = self.layout?;
        let button = layout.button?.offset_by(layout.frame.origin);
        if button.contains(point) {
            self.on_button_tap.clone()
        } else {
            None
        }
    }

    /// Run the button callback if `point` lands on the button. Returns
    /// whether it ran.
    pub fn tap(&self, point: Point) -> bool {
        match self.button_tap_target(point) {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn opacity_at(&self, now: Duration) -> f64 {
        self.animation.map_or(self.opacity, |a| a.value_at(now))
    }

    /// Jump to `opacity`, dropping any running animation
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
        self.animation = None;
    }

    /// Animate from the current value (sampled at `now`) to `to`
    pub fn animate_opacity(&mut self, to: f64, now: Duration, delay: Duration, duration: Duration) {
        let from = self.opacity_at(now);
        self.opacity = to;
        self.animation = Some(OpacityAnimation {
            from,
            to,
            start: now.saturating_add(delay),
            duration,
        });
    }

    pub fn animation(&self) -> Option<&OpacityAnimation> {
        self.animation.as_ref()
    }
}

impl fmt::Debug for ToastView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastView")
            .field("title", &self.title_text())
            .field("message", &self.message_text())
            .field("frame", &self.frame())
            .field("opacity", &self.opacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EdgeInsets;
    use crate::platform::HeadlessPlatform;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn env(screen: Size, orientation: Orientation, device_class: DeviceClass) -> LayoutEnv {
        LayoutEnv {
            screen,
            orientation,
            device_class,
            safe_area_bottom: 0.0,
            rotate_manually: true,
        }
    }

    fn phone_env() -> LayoutEnv {
        env(
            Size::new(400.0, 800.0),
            Orientation::Portrait,
            DeviceClass::Phone,
        )
    }

    fn simple_attributes() -> ToastAttributes {
        ToastAttributes {
            title: Some("Title".to_string()),
            message: "Message".to_string(),
            title_font: Font::system(10.0),
            message_font: Font::system(10.0),
            button_font: Font::system(10.0),
            content_insets: EdgeInsets::new(10.0, 10.0, 10.0, 10.0),
            max_width_ratio: 0.5,
            ..ToastAttributes::default()
        }
    }

    #[test]
    fn test_bind_styled_roundtrip() {
        let attrs = ToastAttributes {
            title: Some("Saved".to_string()),
            message: "All changes stored".to_string(),
            button_title: "Undo".to_string(),
            background_color: Color::rgb(1, 2, 3),
            corner_radius: 8.0,
            ..ToastAttributes::default()
        };
        let view = ToastView::new(attrs.clone());

        assert_eq!(view.title_text(), Some("Saved"));
        assert_eq!(view.message_text(), Some("All changes stored"));
        assert_eq!(view.button_title(), Some("Undo"));
        assert_eq!(view.background_color(), Color::rgb(1, 2, 3));
        assert_eq!(view.corner_radius(), 8.0);
        assert!(view.title().unwrap().is_styled());
        assert!(view.message().unwrap().is_styled());
        assert_eq!(view.title().unwrap().font(), &attrs.title_font);
        assert_eq!(view.message().unwrap().color(), attrs.foreground_color);
        assert!(matches!(view.button(), Some(Label::Styled(s)) if s.underline));
    }

    #[test]
    fn test_bind_underlined_message() {
        let view = ToastView::new(ToastAttributes {
            underline_message: true,
            ..ToastAttributes::for_message("Tap to retry")
        });
        match view.message() {
            Some(Label::Styled(text)) => assert!(text.underline),
            other => panic!("expected styled message, got {:?}", other),
        }
    }

    #[test]
    fn test_bind_plain_roundtrip() {
        let attrs = ToastAttributes {
            use_styled_text: false,
            use_styled_button_title: false,
            foreground_color: Color::BLACK,
            ..ToastAttributes::default()
        };
        let view = ToastView::new(attrs);

        let title = view.title().unwrap();
        assert!(!title.is_styled());
        assert_eq!(title.text(), "Title here");
        assert_eq!(title.color(), Color::BLACK);
        assert_eq!(view.message_text(), Some("message here"));
        assert!(matches!(view.button(), Some(Label::Plain { text, .. }) if text == "Button"));
    }

    #[test]
    fn test_bind_omits_missing_text() {
        for styled in [true, false] {
            let view = ToastView::new(ToastAttributes {
                title: None,
                message: String::new(),
                use_styled_text: styled,
                ..ToastAttributes::default()
            });
            assert!(view.title().is_none());
            assert!(view.message().is_none());
        }
    }

    #[test]
    fn test_rebind_replaces_content_and_requests_layout() {
        let platform = HeadlessPlatform::phone();
        let mut view = ToastView::new(simple_attributes());
        view.layout(&platform, &phone_env());
        assert!(!view.needs_layout());

        view.bind(ToastAttributes::for_message("Second"));
        assert!(view.needs_layout());
        assert_eq!(view.title_text(), None);
        assert_eq!(view.message_text(), Some("Second"));
    }

    #[test]
    fn test_layout_stacks_title_above_message() {
        let platform = HeadlessPlatform::phone();
        let mut view = ToastView::new(simple_attributes());
        let layout = view.layout(&platform, &phone_env());

        // 10pt font: 5pt glyphs, 14pt lines
        assert_eq!(layout.title, Some(Rect::new(10.0, 10.0, 25.0, 14.0)));
        assert_eq!(layout.message, Some(Rect::new(10.0, 24.0, 35.0, 14.0)));
        assert_eq!(layout.background, Rect::new(0.0, 0.0, 55.0, 48.0));
        assert!(layout.button.is_none());

        // centred, 39pt above the bottom of an 800pt phone screen
        assert_eq!(layout.frame, Rect::new(172.5, 800.0 - 48.0 - 39.0, 55.0, 48.0));
    }

    #[test]
    fn test_layout_never_exceeds_width_ratio() {
        let platform = HeadlessPlatform::phone();
        let mut attrs = simple_attributes();
        attrs.message = "word ".repeat(200);
        attrs.show_button = true;

        for width in [200.0, 320.0, 390.0, 1024.0] {
            for ratio in [0.3, 0.5, 405.0 / 430.0, 1.0] {
                attrs.max_width_ratio = ratio;
                let mut view = ToastView::new(attrs.clone());
                let layout = view.layout(
                    &platform,
                    &env(
                        Size::new(width, 900.0),
                        Orientation::Portrait,
                        DeviceClass::Phone,
                    ),
                );
                assert!(layout.background.size.width <= width * ratio + 1e-9);
                assert!(layout.frame.size.width <= width * ratio + 1e-9);
            }
        }
    }

    #[test]
    fn test_layout_places_button_beside_stack() {
        let platform = HeadlessPlatform::phone();
        let mut attrs = simple_attributes();
        attrs.show_button = true;
        attrs.button_title = "Undo".to_string();
        let mut view = ToastView::new(attrs);
        let layout = view.layout(&platform, &phone_env());

        let button = layout.button.unwrap();
        assert_eq!(button.size, Size::new(20.0, 14.0));
        // stack is 35 wide, button right after it, then the right inset
        assert_eq!(layout.background.size.width, 10.0 + 35.0 + 20.0 + 10.0);
        assert_eq!(button.max_x(), layout.background.size.width - 10.0);
        // vertically centred in the 28pt content
        assert_eq!(button.min_y(), 10.0 + 7.0);
    }

    #[test]
    fn test_orientation_and_device_change_only_bottom_offset() {
        let platform = HeadlessPlatform::phone();
        let screen = Size::new(400.0, 800.0);
        let base = {
            let mut view = ToastView::new(simple_attributes());
            view.layout(&platform, &env(screen, Orientation::Portrait, DeviceClass::Phone))
        };

        for device in [
            DeviceClass::Phone,
            DeviceClass::Pad,
            DeviceClass::Tv,
            DeviceClass::CarPlay,
            DeviceClass::Mac,
            DeviceClass::Vision,
            DeviceClass::Unspecified,
        ] {
            for orientation in [Orientation::Portrait, Orientation::LandscapeRight] {
                let mut e = env(screen, orientation, device);
                e.rotate_manually = false;
                let mut view = ToastView::new(simple_attributes());
                let layout = view.layout(&platform, &e);

                assert_eq!(layout.background, base.background);
                assert_eq!(layout.frame.min_x(), base.frame.min_x());
                assert_eq!(
                    layout.bottom_offset,
                    device.default_bottom_offset(orientation)
                );
                assert_eq!(layout.frame.max_y(), screen.height - layout.bottom_offset);
            }
        }
    }

    #[test]
    fn test_manual_rotation_swaps_container() {
        let platform = HeadlessPlatform::phone();
        let mut view = ToastView::new(simple_attributes());
        let layout = view.layout(
            &platform,
            &env(
                Size::new(400.0, 800.0),
                Orientation::LandscapeLeft,
                DeviceClass::Pad,
            ),
        );

        // container is 800 x 400 with the pad's 40pt landscape offset
        assert_eq!(layout.frame.min_x(), (800.0 - 55.0) / 2.0);
        assert_eq!(layout.frame.max_y(), 400.0 - 40.0);
    }

    #[test]
    fn test_explicit_offsets_and_safe_area() {
        let platform = HeadlessPlatform::phone();
        let mut attrs = simple_attributes();
        attrs.bottom_offset_portrait = 100.0;
        attrs.bottom_offset_landscape = 50.0;
        attrs.use_safe_area_for_bottom_offset = true;

        let mut e = phone_env();
        e.safe_area_bottom = 34.0;

        let mut view = ToastView::new(attrs);
        assert_eq!(view.layout(&platform, &e).bottom_offset, 134.0);

        e.orientation = Orientation::LandscapeLeft;
        assert_eq!(view.layout(&platform, &e).bottom_offset, 84.0);
    }

    #[test]
    fn test_hit_test_uses_frame() {
        let platform = HeadlessPlatform::phone();
        let mut view = ToastView::new(simple_attributes());
        assert!(!view.hit_test(Point::new(200.0, 740.0)));

        let frame = view.layout(&platform, &phone_env()).frame;
        assert!(view.hit_test(Point::new(frame.min_x() + 1.0, frame.min_y() + 1.0)));
        assert!(!view.hit_test(Point::new(frame.min_x() - 1.0, frame.min_y() + 1.0)));
        assert!(!view.hit_test(Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_button_tap_target() {
        let platform = HeadlessPlatform::phone();
        let taps = Arc::new(AtomicUsize::new(0));
        let mut attrs = simple_attributes();
        attrs.show_button = true;
        let mut view = ToastView::new(attrs);

        let t = Arc::clone(&taps);
        view.set_on_button_tap(Some(Arc::new(move || {
            t.fetch_add(1, Ordering::SeqCst);
        })));
        let layout = view.layout(&platform, &phone_env());
        let button = layout.button.unwrap().offset_by(layout.frame.origin);

        let inside = Point::new(button.min_x() + 1.0, button.min_y() + 1.0);
        assert!(view.button_tap_target(inside).is_some());
        assert!(view.tap(inside));
        assert_eq!(taps.load(Ordering::SeqCst), 1);

        let on_text = Point::new(layout.frame.min_x() + 11.0, layout.frame.min_y() + 11.0);
        assert!(view.hit_test(on_text));
        assert!(view.button_tap_target(on_text).is_none());
        assert!(!view.tap(on_text));
        assert_eq!(taps.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_opacity_animation_begins_from_current_state() {
        let mut view = ToastView::new(simple_attributes());
        view.set_opacity(0.0);

        view.animate_opacity(
            1.0,
            Duration::ZERO,
            Duration::from_millis(100),
            Duration::from_millis(500),
        );
        assert_eq!(view.opacity_at(Duration::from_millis(50)), 0.0);
        assert!((view.opacity_at(Duration::from_millis(350)) - 0.5).abs() < 1e-9);
        assert_eq!(view.opacity_at(Duration::from_millis(600)), 1.0);

        // reverse half way through a fade-in: starts from 0.5
        view.animate_opacity(
            0.0,
            Duration::from_millis(350),
            Duration::ZERO,
            Duration::from_millis(500),
        );
        assert!((view.opacity_at(Duration::from_millis(350)) - 0.5).abs() < 1e-9);
        assert_eq!(view.opacity_at(Duration::from_secs(1)), 0.0);
    }
}
