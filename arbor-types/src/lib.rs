//! Geometry primitives used by the `arbor` map client.
//!
//! * [`geo`] contains points in geographic coordinates (latitude and longitude) and the
//!   [`WebMercator`](geo::WebMercator) projection that converts them into the map plane.
//! * [`cartesian`] contains points, rectangles and sizes in projected (or screen) coordinates.
//! * [`geojson`] (feature `geojson`) extracts point sets out of GeoJSON geometries.

// Lets the exported macros refer to `::arbor_types` from inside the crate too.
extern crate self as arbor_types;

pub mod cartesian;
pub mod error;
pub mod geo;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use error::ArborTypesError;
