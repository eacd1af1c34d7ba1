//! Point markers with popups built from GeoJSON features.

use std::any::Any;

use arbor_types::cartesian::{CartesianPoint2d, Point2, Rect};
use arbor_types::geo::{GeoPoint2d, Projection, WebMercator};
use arbor_types::geojson::{geometry_kind, vertices, GeometryKind};
use geojson::Feature;

use super::{Attribution, Layer};
use crate::error::ArborError;

/// A marker at a geographic position with the popup text shown when the marker is clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    position: GeoPoint2d,
    projected: Point2,
    popup: String,
    feature_index: usize,
}

impl Marker {
    /// Creates a new marker. Returns `None` if the position cannot be projected.
    pub fn new(position: GeoPoint2d, popup: impl Into<String>, feature_index: usize) -> Option<Self> {
        Some(Self {
            position,
            projected: WebMercator::default().project(&position)?,
            popup: popup.into(),
            feature_index,
        })
    }

    /// Geographic position.
    pub fn position(&self) -> GeoPoint2d {
        self.position
    }

    /// Position in map coordinates.
    pub fn projected(&self) -> Point2 {
        self.projected
    }

    /// Popup text bound to the marker.
    pub fn popup(&self) -> &str {
        &self.popup
    }

    /// Index of the feature the marker was created from.
    pub fn feature_index(&self) -> usize {
        self.feature_index
    }
}

/// Layer of markers derived from a set of GeoJSON features.
///
/// Point features give one marker, multipoint features one marker per point. Other geometries
/// get a single marker at the center of their extent. The bounds of the layer cover all vertices
/// of all geometries.
#[derive(Debug, Clone, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    bounds: Option<Rect>,
}

impl MarkerLayer {
    /// Builds a layer from the features, binding the popup returned by `popup` to the markers of
    /// each feature.
    ///
    /// Features without geometry are skipped and `popup` is not called for them. The first error
    /// returned by `popup` aborts the construction.
    pub fn from_features<'a>(
        features: impl IntoIterator<Item = &'a Feature>,
        mut popup: impl FnMut(usize, &Feature) -> Result<String, ArborError>,
    ) -> Result<Self, ArborError> {
        let projection = WebMercator::default();
        let mut layer = Self::default();

        for (index, feature) in features.into_iter().enumerate() {
            let Some(geometry) = &feature.geometry else {
                log::debug!("Feature #{index} has no geometry, skipping it");
                continue;
            };

            let points = vertices(geometry)
                .map_err(|err| ArborError::invalid_feature(index, err.to_string()))?;
            let projected = points
                .iter()
                .map(|p| projection.project(p))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| ArborError::invalid_feature(index, "geometry cannot be projected"))?;

            let text = popup(index, feature)?;

            let Some(extent) = Rect::from_points(&projected) else {
                continue;
            };
            layer.bounds = Some(match layer.bounds {
                Some(bounds) => bounds.merge(extent),
                None => extent,
            });

            match geometry_kind(geometry) {
                GeometryKind::Points => {
                    for (position, projected) in points.into_iter().zip(projected) {
                        layer.markers.push(Marker {
                            position,
                            projected,
                            popup: text.clone(),
                            feature_index: index,
                        });
                    }
                }
                _ => {
                    let marker = projection
                        .unproject(&extent.center())
                        .and_then(|center| Marker::new(center, text, index))
                        .ok_or_else(|| {
                            ArborError::invalid_feature(index, "geometry cannot be projected")
                        })?;
                    layer.markers.push(marker);
                }
            }
        }

        Ok(layer)
    }

    /// Adds a marker to the layer.
    pub fn push(&mut self, marker: Marker) {
        let extent = Rect::from_point(&marker.projected);
        self.bounds = Some(match self.bounds {
            Some(bounds) => bounds.merge(extent),
            None => extent,
        });
        self.markers.push(marker);
    }

    /// Markers of the layer.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Returns true if the layer has no markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// The marker closest to `position` (in map coordinates), if it is not farther than
    /// `tolerance` map units.
    pub fn marker_at(&self, position: &Point2, tolerance: f64) -> Option<&Marker> {
        self.markers
            .iter()
            .map(|marker| (marker.projected.distance_sq(position), marker))
            .filter(|(distance_sq, _)| *distance_sq <= tolerance * tolerance)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, marker)| marker)
    }
}

impl Layer for MarkerLayer {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn attribution(&self) -> Option<Attribution> {
        None
    }

    fn bounds(&self) -> Option<Rect> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use arbor_types::latlon;
    use assert_matches::assert_matches;

    use super::*;

    fn features(json: &str) -> Vec<Feature> {
        let collection: geojson::FeatureCollection = json.parse().expect("valid collection");
        collection.features
    }

    fn index_popup(index: usize, _feature: &Feature) -> Result<String, ArborError> {
        Ok(format!("#{index}"))
    }

    #[test]
    fn point_features() {
        let features = features(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[10,20]}},
                {"type":"Feature","properties":{},"geometry":{"type":"MultiPoint","coordinates":[[0,0],[1,1]]}}
            ]}"#,
        );

        let layer = MarkerLayer::from_features(&features, index_popup).expect("valid");
        assert_eq!(layer.len(), 3);
        assert_eq!(layer.markers()[0].position(), latlon!(20.0, 10.0));
        assert_eq!(layer.markers()[0].popup(), "#0");
        assert_eq!(layer.markers()[2].popup(), "#1");
        assert_eq!(layer.markers()[2].feature_index(), 1);

        let bounds = layer.bounds().expect("bounds");
        assert_abs_diff_eq!(bounds.x_min(), 0.0);
        assert_abs_diff_eq!(bounds.x_max(), 1113194.9079327357, epsilon = 1e-6);
    }

    #[test]
    fn polygon_feature_gets_marker_in_center() {
        let features = features(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[-1,-1],[1,-1],[1,1],[-1,1],[-1,-1]]]}}
            ]}"#,
        );

        let layer = MarkerLayer::from_features(&features, index_popup).expect("valid");
        assert_eq!(layer.len(), 1);
        assert_abs_diff_eq!(layer.markers()[0].position(), latlon!(0.0, 0.0), epsilon = 1e-9);
        let bounds = layer.bounds().expect("bounds");
        assert!(bounds.width() > 0.0);
    }

    #[test]
    fn features_without_geometry_are_skipped() {
        let features = features(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":null}
            ]}"#,
        );

        let mut calls = 0;
        let layer = MarkerLayer::from_features(&features, |_, _| {
            calls += 1;
            Ok(String::new())
        })
        .expect("valid");
        assert!(layer.is_empty());
        assert!(layer.bounds().is_none());
        assert_eq!(calls, 0);
    }

    #[test]
    fn popup_error_aborts() {
        let features = features(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[10,20]}}
            ]}"#,
        );

        let result = MarkerLayer::from_features(&features, |index, _| {
            Err(ArborError::invalid_feature(index, "no popup"))
        });
        assert_matches!(result, Err(ArborError::InvalidFeature { index: 0, .. }));
    }

    #[test]
    fn marker_at_picks_closest_within_tolerance() {
        let mut layer = MarkerLayer::default();
        layer.push(Marker::new(latlon!(0.0, 0.0), "a", 0).expect("valid"));
        layer.push(Marker::new(latlon!(0.0, 0.001), "b", 1).expect("valid"));

        let b = layer.markers()[1].projected();
        let near_b = Point2::new(b.x - 10.0, b.y);
        assert_eq!(layer.marker_at(&near_b, 20.0).map(Marker::popup), Some("b"));
        assert!(layer.marker_at(&near_b, 5.0).is_none());
        assert_eq!(layer.bounds().map(|b| b.x_min()), Some(0.0));
    }
}
