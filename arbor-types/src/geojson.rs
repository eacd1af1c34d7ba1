//! Conversion of GeoJSON geometries into [`GeoPoint2d`] sets.

use geojson::{Geometry, Position, Value};

use crate::error::ArborTypesError;
use crate::geo::{GeoPoint, GeoPoint2d, NewGeoPoint};

/// GeoJSON position validated to contain at least longitude and latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonPoint(Position);

impl TryFrom<Position> for GeoJsonPoint {
    type Error = ArborTypesError;

    fn try_from(value: Position) -> Result<Self, Self::Error> {
        if value.len() < 2 {
            Err(ArborTypesError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            ))
        } else if !value[0].is_finite() || !value[1].is_finite() {
            Err(ArborTypesError::Conversion(
                "point coordinates must be finite numbers".to_string(),
            ))
        } else {
            Ok(GeoJsonPoint(value))
        }
    }
}

impl GeoPoint for GeoJsonPoint {
    fn lat(&self) -> f64 {
        self.0[1]
    }

    fn lon(&self) -> f64 {
        self.0[0]
    }
}

impl NewGeoPoint for GeoJsonPoint {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self(vec![lon, lat])
    }
}

/// Shape class of a GeoJSON geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// `Point` or `MultiPoint`.
    Points,
    /// `LineString` or `MultiLineString`.
    Lines,
    /// `Polygon` or `MultiPolygon`.
    Polygons,
    /// `GeometryCollection`.
    Collection,
}

/// Returns the shape class of the geometry.
pub fn geometry_kind(geometry: &Geometry) -> GeometryKind {
    match &geometry.value {
        Value::Point(_) | Value::MultiPoint(_) => GeometryKind::Points,
        Value::LineString(_) | Value::MultiLineString(_) => GeometryKind::Lines,
        Value::Polygon(_) | Value::MultiPolygon(_) => GeometryKind::Polygons,
        Value::GeometryCollection(_) => GeometryKind::Collection,
    }
}

/// Collects all vertices of the geometry, in document order.
///
/// Fails if any position has less than two coordinates.
pub fn vertices(geometry: &Geometry) -> Result<Vec<GeoPoint2d>, ArborTypesError> {
    let mut points = vec![];
    collect_vertices(&geometry.value, &mut points)?;
    Ok(points)
}

fn collect_vertices(value: &Value, out: &mut Vec<GeoPoint2d>) -> Result<(), ArborTypesError> {
    match value {
        Value::Point(p) => push_position(p, out),
        Value::MultiPoint(points) | Value::LineString(points) => push_positions(points, out),
        Value::MultiLineString(lines) | Value::Polygon(lines) => lines
            .iter()
            .try_for_each(|line| push_positions(line, out)),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .try_for_each(|ring| push_positions(ring, out)),
        Value::GeometryCollection(geometries) => geometries
            .iter()
            .try_for_each(|g| collect_vertices(&g.value, out)),
    }
}

fn push_positions(positions: &[Position], out: &mut Vec<GeoPoint2d>) -> Result<(), ArborTypesError> {
    positions.iter().try_for_each(|p| push_position(p, out))
}

fn push_position(position: &Position, out: &mut Vec<GeoPoint2d>) -> Result<(), ArborTypesError> {
    let point = GeoJsonPoint::try_from(position.clone())?;
    out.push(GeoPoint2d::from(&point));
    Ok(())
}
