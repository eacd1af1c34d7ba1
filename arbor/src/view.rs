use arbor_types::cartesian::{Point2, Rect, Size};
use arbor_types::geo::{GeoPoint, GeoPoint2d, Projection, WebMercator};

use crate::tile_schema::TileSchema;

/// The part of the map displayed on screen: its center, resolution and the size of the viewport.
///
/// Positions are in Web Mercator (EPSG:3857) meters, resolution is meters per pixel. The view is
/// an immutable value: all modifications return a new view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    position: Point2,
    resolution: f64,
    size: Size,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            position: Point2::origin(),
            resolution: 1.0,
            size: Size::default(),
        }
    }
}

impl MapView {
    /// Creates a view centered at the geographic point.
    pub fn new(center: &impl GeoPoint, resolution: f64) -> Self {
        let position = WebMercator::default()
            .project(&GeoPoint2d::from(center))
            .unwrap_or_else(|| {
                log::warn!(
                    "Cannot project view center ({}, {}), using the origin instead",
                    center.lat(),
                    center.lon()
                );
                Point2::origin()
            });

        Self::new_projected(position, resolution)
    }

    /// Creates a view centered at the point given in projected coordinates.
    pub fn new_projected(position: Point2, resolution: f64) -> Self {
        Self {
            position,
            resolution,
            ..Default::default()
        }
    }

    /// Center of the view in projected coordinates.
    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Geographic center of the view.
    pub fn center(&self) -> Option<GeoPoint2d> {
        WebMercator::default().unproject(&self.position)
    }

    /// Map units per pixel.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Size of the viewport in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Zoom level of the view in the given tile schema. Can be fractional.
    pub fn zoom(&self, schema: &TileSchema) -> Option<f64> {
        schema.zoom_for_resolution(self.resolution)
    }

    /// Copy of the view with another resolution.
    pub fn with_resolution(&self, resolution: f64) -> Self {
        Self {
            resolution,
            ..*self
        }
    }

    /// Copy of the view at the zoom level `z` of the schema.
    pub fn with_zoom(&self, schema: &TileSchema, z: u32) -> Option<Self> {
        Some(self.with_resolution(schema.lod_resolution(z)?))
    }

    /// Copy of the view with another viewport size.
    pub fn with_size(&self, size: Size) -> Self {
        Self { size, ..*self }
    }

    /// Area of the map visible in the viewport. `None` if the viewport has no size.
    pub fn get_bbox(&self) -> Option<Rect> {
        if self.size.is_zero() {
            return None;
        }

        let half_width = self.size.half_width() * self.resolution;
        let half_height = self.size.half_height() * self.resolution;
        Some(Rect::new(
            self.position.x - half_width,
            self.position.y - half_height,
            self.position.x + half_width,
            self.position.y + half_height,
        ))
    }

    /// Converts a pixel position (from the top left corner of the viewport) into map
    /// coordinates.
    pub fn screen_to_map(&self, px_position: Point2) -> Option<Point2> {
        if self.size.is_zero() {
            return None;
        }

        Some(Point2::new(
            self.position.x + (px_position.x - self.size.half_width()) * self.resolution,
            self.position.y + (self.size.half_height() - px_position.y) * self.resolution,
        ))
    }

    /// Converts map coordinates into a pixel position in the viewport.
    pub fn map_to_screen(&self, position: Point2) -> Option<Point2> {
        if self.size.is_zero() {
            return None;
        }

        Some(Point2::new(
            (position.x - self.position.x) / self.resolution + self.size.half_width(),
            self.size.half_height() - (position.y - self.position.y) / self.resolution,
        ))
    }

    /// Returns a view centered on `bbox` at the most detailed zoom level of `schema` (not above
    /// `max_z`) at which the whole `bbox` is visible with `padding` pixels left on every side.
    ///
    /// A degenerate `bbox` (a single point) gets the `max_z` zoom. Returns `None` if the `bbox`
    /// is not finite.
    pub fn fit_bounds(
        &self,
        bbox: Rect,
        schema: &TileSchema,
        max_z: u32,
        padding: f64,
    ) -> Option<Self> {
        let coordinates = [bbox.x_min(), bbox.y_min(), bbox.x_max(), bbox.y_max()];
        if !coordinates.iter().all(|c| c.is_finite()) {
            return None;
        }

        let available = self.size.shrink(padding);
        let required = if bbox.width() == 0.0 && bbox.height() == 0.0 {
            0.0
        } else if available.is_zero() {
            f64::INFINITY
        } else {
            (bbox.width() / available.width()).max(bbox.height() / available.height())
        };

        let lod = schema.fitting_lod(required, max_z)?;
        Some(Self {
            position: bbox.center(),
            resolution: lod.resolution(),
            ..*self
        })
    }
}
