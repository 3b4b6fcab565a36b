//! Plain geometry values shared by the view and overlay layout code

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width and height exchanged, used when a landscape container is
    /// derived from portrait screen bounds
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Half-open containment: the leading edges are inside, the trailing
    /// edges are not
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Same rectangle shifted by `offset`, used to move child rects into the
    /// parent's coordinate space
    pub fn offset_by(&self, offset: Point) -> Self {
        Self {
            origin: Point::new(self.origin.x + offset.x, self.origin.y + offset.y),
            size: self.size,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Interface orientation reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl Orientation {
    pub fn is_portrait(&self) -> bool {
        matches!(self, Orientation::Portrait | Orientation::PortraitUpsideDown)
    }

    pub fn is_landscape(&self) -> bool {
        !self.is_portrait()
    }

    /// Rotation (radians) the overlay applies to itself when it has to
    /// follow the interface orientation by hand
    pub fn rotation_angle(&self) -> f64 {
        match self {
            Orientation::Portrait => 0.0,
            Orientation::PortraitUpsideDown => PI,
            Orientation::LandscapeLeft => -FRAC_PI_2,
            Orientation::LandscapeRight => FRAC_PI_2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);

        assert!(rect.contains(Point::new(10.0, 20.0)));
        assert!(rect.contains(Point::new(109.9, 69.9)));
        assert!(!rect.contains(Point::new(110.0, 30.0)));
        assert!(!rect.contains(Point::new(50.0, 70.0)));
        assert!(!rect.contains(Point::new(9.9, 30.0)));
    }

    #[test]
    fn test_rect_offset_by() {
        let rect = Rect::new(5.0, 5.0, 10.0, 10.0).offset_by(Point::new(100.0, 200.0));
        assert_eq!(rect, Rect::new(105.0, 205.0, 10.0, 10.0));
    }

    #[test]
    fn test_size_swapped() {
        assert_eq!(Size::new(390.0, 844.0).swapped(), Size::new(844.0, 390.0));
        assert!(Size::ZERO.is_empty());
    }

    #[test]
    fn test_orientation_angles() {
        assert_eq!(Orientation::Portrait.rotation_angle(), 0.0);
        assert_eq!(Orientation::PortraitUpsideDown.rotation_angle(), PI);
        assert_eq!(Orientation::LandscapeLeft.rotation_angle(), -FRAC_PI_2);
        assert_eq!(Orientation::LandscapeRight.rotation_angle(), FRAC_PI_2);
    }

    #[test]
    fn test_orientation_classification() {
        assert!(Orientation::Portrait.is_portrait());
        assert!(Orientation::PortraitUpsideDown.is_portrait());
        assert!(Orientation::LandscapeLeft.is_landscape());
        assert!(Orientation::LandscapeRight.is_landscape());
    }
}
