//! Points, rectangles and sizes in cartesian (projected or screen) coordinates.

use nalgebra::Vector2;

mod rect;
mod size;

pub use rect::Rect;
pub use size::Size;

/// Point in cartesian coordinates. Projected map positions and screen positions both use it.
pub type Point2 = nalgebra::Point2<f64>;

/// A point with `x` and `y` coordinates in some cartesian coordinate system.
pub trait CartesianPoint2d {
    /// X coordinate.
    fn x(&self) -> f64;
    /// Y coordinate.
    fn y(&self) -> f64;

    /// Vector from `other` to this point.
    fn sub(&self, other: &impl CartesianPoint2d) -> Vector2<f64> {
        Vector2::new(self.x() - other.x(), self.y() - other.y())
    }

    /// Squared euclidean distance to the `other` point.
    fn distance_sq(&self, other: &impl CartesianPoint2d) -> f64 {
        let v = self.sub(other);
        v.x * v.x + v.y * v.y
    }

    /// Euclidean distance to the `other` point.
    fn distance(&self, other: &impl CartesianPoint2d) -> f64 {
        self.distance_sq(other).sqrt()
    }
}

/// Cartesian point that can be constructed from its coordinates.
pub trait NewCartesianPoint2d: CartesianPoint2d + Sized {
    /// Creates a new point.
    fn new(x: f64, y: f64) -> Self;
}

impl CartesianPoint2d for Point2 {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl NewCartesianPoint2d for Point2 {
    fn new(x: f64, y: f64) -> Self {
        Point2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point2::new(1.0, 1.0);
        let b = Point2::new(4.0, 5.0);
        assert_eq!(a.distance_sq(&b), 25.0);
        assert_eq!(b.distance(&a), 5.0);
        assert_eq!(b.sub(&a), Vector2::new(3.0, 4.0));
    }
}
