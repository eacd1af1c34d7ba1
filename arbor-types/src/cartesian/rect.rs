use serde::{Deserialize, Serialize};

use super::{CartesianPoint2d, Point2};

/// Axis-aligned rectangle.
///
/// A rectangle built from a single point has zero width and height, which is a valid
/// rectangle (e.g. the bounds of a layer with one marker).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

impl Rect {
    /// Creates a new rectangle. Coordinates are normalized, so the order of the corners does not
    /// matter.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x_min: x1.min(x2),
            y_min: y1.min(y2),
            x_max: x1.max(x2),
            y_max: y1.max(y2),
        }
    }

    /// Minimum X.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Maximum X.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Minimum Y.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Maximum Y.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Width.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Center point.
    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Rectangle with zero size at the given point.
    pub fn from_point(p: &impl CartesianPoint2d) -> Self {
        Self {
            x_min: p.x(),
            y_min: p.y(),
            x_max: p.x(),
            y_max: p.y(),
        }
    }

    /// Smallest rectangle containing all the points. Returns `None` for an empty iterator.
    pub fn from_points<'a, P: CartesianPoint2d + 'a>(
        points: impl IntoIterator<Item = &'a P>,
    ) -> Option<Self> {
        let mut points = points.into_iter();
        let first = Self::from_point(points.next()?);
        Some(points.fold(first, |rect, p| rect.merge(Self::from_point(p))))
    }

    /// Smallest rectangle containing both rectangles.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Returns true if the point is inside the rectangle or on its border.
    pub fn contains(&self, point: &impl CartesianPoint2d) -> bool {
        self.x_min <= point.x()
            && self.x_max >= point.x()
            && self.y_min <= point.y()
            && self.y_max >= point.y()
    }

    /// Returns true if the two rectangles have at least one common point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }

    /// Scales the rectangle around its center.
    pub fn magnify(&self, factor: f64) -> Self {
        let center = self.center();
        let half_width = self.width() / 2.0 * factor;
        let half_height = self.height() / 2.0 * factor;
        Self {
            x_min: center.x - half_width,
            y_min: center.y - half_height,
            x_max: center.x + half_width,
            y_max: center.y + half_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points() {
        let points = [
            Point2::new(1.0, 5.0),
            Point2::new(-3.0, 2.0),
            Point2::new(4.0, -1.0),
        ];
        let rect = Rect::from_points(&points).expect("non-empty");
        assert_eq!(rect, Rect::new(-3.0, -1.0, 4.0, 5.0));
        assert_eq!(rect.center(), Point2::new(0.5, 2.0));
    }

    #[test]
    fn from_no_points() {
        let points: [Point2; 0] = [];
        assert!(Rect::from_points(&points).is_none());
    }

    #[test]
    fn single_point_rect_is_degenerate() {
        let rect = Rect::from_point(&Point2::new(3.0, 4.0));
        assert_eq!(rect.width(), 0.0);
        assert_eq!(rect.height(), 0.0);
        assert!(rect.contains(&Point2::new(3.0, 4.0)));
        assert_eq!(rect.magnify(10.0), rect);
    }

    #[test]
    fn normalizes_corners() {
        assert_eq!(Rect::new(5.0, 5.0, 0.0, 0.0), Rect::new(0.0, 0.0, 5.0, 5.0));
    }

    #[test]
    fn intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 15.0, 15.0)));
        assert!(a.intersects(&Rect::new(10.0, 10.0, 15.0, 15.0)));
        assert!(!a.intersects(&Rect::new(11.0, 0.0, 15.0, 15.0)));
    }
}
