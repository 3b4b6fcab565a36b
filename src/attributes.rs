//! Toast attributes: the configuration value describing one toast's text,
//! fonts, colors, insets and timings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::AttributesError;
use crate::geometry::EdgeInsets;

/// Standard display durations
pub struct Delay;

impl Delay {
    pub const SHORT: Duration = Duration::from_millis(2000);
    pub const LONG: Duration = Duration::from_millis(3500);
}

/// RGBA color, serialized as a hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const CLEAR: Self = Self::rgba(0x00, 0x00, 0x00, 0x00);
    /// Default toast background (#3C3C3C)
    pub const CHARCOAL: Self = Self::rgb(0x3C, 0x3C, 0x3C);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional)
    pub fn from_hex(s: &str) -> Result<Self, AttributesError> {
        let digits = s.trim().trim_start_matches('#');
        let invalid = || AttributesError::InvalidColor(s.to_string());

        if !digits.is_ascii() || !(digits.len() == 6 || digits.len() == 8) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let r = channel(0)?;
        let g = channel(2)?;
        let b = channel(4)?;
        let a = if digits.len() == 8 { channel(6)? } else { 0xFF };

        Ok(Self { r, g, b, a })
    }

    pub fn to_hex(&self) -> String {
        if self.a == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = AttributesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Regular,
    Medium,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Family name; `None` means the host's system font
    #[serde(default)]
    pub family: Option<String>,
    pub size: f64,
    #[serde(default)]
    pub weight: FontWeight,
}

impl Font {
    pub fn system(size: f64) -> Self {
        Self {
            family: None,
            size,
            weight: FontWeight::Regular,
        }
    }

    pub fn bold_system(size: f64) -> Self {
        Self {
            weight: FontWeight::Bold,
            ..Self::system(size)
        }
    }
}

/// Text carrying its own styling, the counterpart of attributed text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledText {
    pub text: String,
    pub font: Font,
    pub color: Color,
    #[serde(default)]
    pub underline: bool,
}

impl StyledText {
    pub fn new(text: impl Into<String>, font: Font, color: Color) -> Self {
        Self {
            text: text.into(),
            font,
            color,
            underline: false,
        }
    }

    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }
}

/// Everything needed to render and time one toast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastAttributes {
    pub title: Option<String>,
    pub message: String,
    pub button_title: String,

    pub title_font: Font,
    pub message_font: Font,
    pub button_font: Font,

    pub foreground_color: Color,
    pub background_color: Color,

    pub corner_radius: f64,
    pub content_insets: EdgeInsets,

    pub show_button: bool,
    /// Render title and message as styled text instead of plain labels
    pub use_styled_text: bool,
    /// Render the button title as underlined styled text
    pub use_styled_button_title: bool,
    /// Underline the message when it is rendered as styled text
    pub underline_message: bool,

    /// Add the host's bottom safe-area inset to the bottom offset
    pub use_safe_area_for_bottom_offset: bool,
    /// Fraction of the screen width the toast may occupy
    pub max_width_ratio: f64,

    /// Explicit offsets from the bottom edge; 0 means "device default"
    pub bottom_offset_portrait: f64,
    pub bottom_offset_landscape: f64,

    /// Seconds before the fade-in starts
    pub delay: f64,
    /// Seconds the toast stays fully visible
    pub duration: f64,
}

impl Default for ToastAttributes {
    fn default() -> Self {
        Self {
            title: Some("Title here".to_string()),
            message: "message here".to_string(),
            button_title: "Button".to_string(),
            title_font: Font::system(15.0),
            message_font: Font::system(13.0),
            button_font: Font::system(13.0),
            foreground_color: Color::WHITE,
            background_color: Color::CHARCOAL,
            corner_radius: 16.0,
            content_insets: EdgeInsets::new(10.0, 15.0, 10.0, 15.0),
            show_button: false,
            use_styled_text: true,
            use_styled_button_title: true,
            underline_message: false,
            use_safe_area_for_bottom_offset: false,
            max_width_ratio: 405.0 / 430.0,
            bottom_offset_portrait: 0.0,
            bottom_offset_landscape: 0.0,
            delay: 0.0,
            duration: Delay::SHORT.as_secs_f64(),
        }
    }
}

impl ToastAttributes {
    /// Attributes for a message-only toast
    pub fn for_message(message: impl Into<String>) -> Self {
        Self {
            title: None,
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), AttributesError> {
        if !(self.delay >= 0.0) {
            return Err(AttributesError::NegativeDelay(self.delay));
        }
        if !(self.duration >= 0.0) {
            return Err(AttributesError::NegativeDuration(self.duration));
        }
        if !(self.max_width_ratio > 0.0 && self.max_width_ratio <= 1.0) {
            return Err(AttributesError::InvalidWidthRatio(self.max_width_ratio));
        }
        Ok(())
    }

    /// Delay as a `Duration`. Negative or NaN values become zero, values too
    /// large for a `Duration` saturate.
    pub fn delay_duration(&self) -> Duration {
        seconds(self.delay)
    }

    /// Display duration as a `Duration`, converted like `delay_duration`
    pub fn display_duration(&self) -> Duration {
        seconds(self.duration)
    }

    pub fn title_styled_text(&self) -> Option<StyledText> {
        if !self.use_styled_text {
            return None;
        }
        let title = self.title.as_ref()?;
        Some(StyledText::new(
            title.clone(),
            self.title_font.clone(),
            self.foreground_color,
        ))
    }

    pub fn message_styled_text(&self) -> Option<StyledText> {
        if !self.use_styled_text || self.message.is_empty() {
            return None;
        }
        let text = StyledText::new(
            self.message.clone(),
            self.message_font.clone(),
            self.foreground_color,
        );
        Some(if self.underline_message {
            text.underlined()
        } else {
            text
        })
    }

    pub fn button_styled_text(&self) -> Option<StyledText> {
        if !self.use_styled_button_title || self.button_title.is_empty() {
            return None;
        }
        Some(
            StyledText::new(
                self.button_title.clone(),
                self.button_font.clone(),
                self.foreground_color,
            )
            .underlined(),
        )
    }

    /// Text read out by accessibility announcements
    pub fn announcement_text(&self) -> Option<String> {
        match (&self.title, self.message.is_empty()) {
            (Some(title), false) if !title.is_empty() => {
                Some(format!("{}. {}", title, self.message))
            }
            (_, false) => Some(self.message.clone()),
            (Some(title), true) if !title.is_empty() => Some(title.clone()),
            _ => None,
        }
    }
}

fn seconds(value: f64) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    // Too large (or infinite) means "as long as possible"
    Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
}
