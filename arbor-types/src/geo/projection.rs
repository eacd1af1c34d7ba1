use crate::cartesian::{CartesianPoint2d, Point2};
use crate::geo::{Datum, GeoPoint, GeoPoint2d, NewGeoPoint};

/// Latitude limit of the Web Mercator projection. Points closer to the poles are clamped.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Conversion between two coordinate systems.
pub trait Projection {
    /// Type of the input point.
    type InPoint;
    /// Type of the output point.
    type OutPoint;

    /// Converts a point into the target coordinate system. Returns `None` if the point cannot be
    /// projected.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Inverse of [`Projection::project`].
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

/// Spherical Mercator projection (EPSG:3857) used by OSM and most web tile services.
#[derive(Debug, Copy, Clone, Default)]
pub struct WebMercator {
    datum: Datum,
}

impl WebMercator {
    /// Creates a projection for the given datum.
    pub fn new(datum: Datum) -> Self {
        Self { datum }
    }
}

impl Projection for WebMercator {
    type InPoint = GeoPoint2d;
    type OutPoint = Point2;

    fn project(&self, input: &GeoPoint2d) -> Option<Point2> {
        let lat = input
            .lat()
            .clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT)
            .to_radians();
        let x = self.datum.semimajor() * input.lon_rad();
        let y = self.datum.semimajor() * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();

        if x.is_finite() && y.is_finite() {
            Some(Point2::new(x, y))
        } else {
            None
        }
    }

    fn unproject(&self, input: &Point2) -> Option<GeoPoint2d> {
        let r = self.datum.semimajor();
        let lat = 2.0 * (input.y() / r).exp().atan() - std::f64::consts::FRAC_PI_2;
        let lon = input.x() / r;

        if lat.is_finite() && lon.is_finite() {
            Some(GeoPoint2d::latlon(lat.to_degrees(), lon.to_degrees()))
        } else {
            None
        }
    }
}
