//! Geometries in geographic coordinates (latitude and longitude) (see [`GeoPoint`]) and their
//! projection onto the map plane (see [`Projection`]).

mod datum;
mod point;
mod projection;

pub use datum::Datum;
pub use point::{GeoPoint, GeoPoint2d, NewGeoPoint};
pub use projection::{Projection, WebMercator, MAX_MERCATOR_LAT};
