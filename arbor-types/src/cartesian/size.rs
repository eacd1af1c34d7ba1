use serde::{Deserialize, Serialize};

/// Width and height of a rectangular area, e.g. the map viewport in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Half of the width.
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// Height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Half of the height.
    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }

    /// Returns true if either of the dimensions is zero (or not a positive finite number).
    pub fn is_zero(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Returns the size shrunk by `padding` on every side, saturating at zero.
    pub fn shrink(&self, padding: f64) -> Self {
        Self {
            width: (self.width - 2.0 * padding).max(0.0),
            height: (self.height - 2.0 * padding).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sizes() {
        assert!(Size::default().is_zero());
        assert!(Size::new(100.0, 0.0).is_zero());
        assert!(Size::new(f64::NAN, 10.0).is_zero());
        assert!(!Size::new(1.0, 1.0).is_zero());
    }

    #[test]
    fn shrink_saturates() {
        assert_eq!(Size::new(100.0, 50.0).shrink(10.0), Size::new(80.0, 30.0));
        assert_eq!(Size::new(100.0, 50.0).shrink(30.0), Size::new(40.0, 0.0));
    }
}
