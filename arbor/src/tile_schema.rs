//! [`TileSchema`] is used by tile layers to calculate [tile indices](TileIndex) needed for a given
//! [`MapView`], and by the view itself to convert between resolutions and zoom levels.

use arbor_types::cartesian::{Point2, Rect};
use arbor_types::geo::Datum;
use serde::{Deserialize, Serialize};

use crate::view::MapView;

const RESOLUTION_TOLERANCE: f64 = 0.01;
const FIT_TOLERANCE: f64 = 1e-9;
const INDEX_TOLERANCE: f64 = 1e-9;

/// Level of detail: a zoom level and the resolution (map units per pixel) of its tiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lod {
    resolution: f64,
    z_index: u32,
}

impl Lod {
    /// Creates new level of detail. Returns `None` if the resolution is not a positive finite
    /// number.
    pub fn new(resolution: f64, z_index: u32) -> Option<Lod> {
        if resolution.is_finite() && resolution > 0.0 {
            Some(Self {
                resolution,
                z_index,
            })
        } else {
            None
        }
    }

    /// Zoom level.
    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    /// Resolution of the level.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }
}

/// Tile index.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    /// X index.
    pub x: i32,
    /// Y index.
    pub y: i32,
    /// Z index.
    pub z: u32,
}

impl TileIndex {
    /// Create a new index instance.
    pub fn new(x: i32, y: i32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// Tile schema specifies how tile indices are calculated based on the map position and
/// resolution. Tile rows are counted from the top of the map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileSchema {
    /// Top left corner of the tile with `X == 0, Y == 0` index.
    pub origin: Point2,
    /// Rectangle that contains all tiles of the tile scheme.
    pub bounds: Rect,
    /// Levels of detail sorted by z-index.
    pub lods: Vec<Lod>,
    /// Width of a single tile in pixels.
    pub tile_width: u32,
    /// Height of a single tile in pixels.
    pub tile_height: u32,
}

impl TileSchema {
    /// Standard Web Mercator based tile scheme (used, for example, by OSM and Google maps) with
    /// zoom levels `0..lods_count`.
    pub fn web(lods_count: u32) -> Self {
        let half_world = std::f64::consts::PI * Datum::WGS84.semimajor();
        let top_resolution = 2.0 * half_world / 256.0;

        let lods = (0..lods_count.max(1))
            .filter_map(|z| Lod::new(top_resolution / 2f64.powi(z as i32), z))
            .collect();

        TileSchema {
            origin: Point2::new(-half_world, half_world),
            bounds: Rect::new(-half_world, -half_world, half_world, half_world),
            lods,
            tile_width: 256,
            tile_height: 256,
        }
    }

    /// Resolution of the given z-level, if exists.
    pub fn lod_resolution(&self, z: u32) -> Option<f64> {
        self.lods
            .iter()
            .find(|lod| lod.z_index() == z)
            .map(Lod::resolution)
    }

    /// The most detailed level of the schema.
    pub fn max_z(&self) -> u32 {
        self.lods.iter().map(Lod::z_index).max().unwrap_or_default()
    }

    /// Select a level of detail for the given resolution: the most detailed level which is not
    /// more detailed than the resolution.
    pub fn select_lod(&self, resolution: f64) -> Option<Lod> {
        if !resolution.is_finite() {
            return None;
        }

        let mut selected = self.lods.first()?;
        for lod in self.lods.iter().skip(1) {
            if lod.resolution() * (1.0 + RESOLUTION_TOLERANCE) < resolution {
                break;
            }
            selected = lod;
        }

        Some(*selected)
    }

    /// The most detailed level not above `max_z` with resolution at least `required`. Falls
    /// back to the least detailed level if none is coarse enough.
    pub fn fitting_lod(&self, required: f64, max_z: u32) -> Option<Lod> {
        self.lods
            .iter()
            .filter(|lod| lod.z_index() <= max_z)
            .rev()
            .find(|lod| lod.resolution() * (1.0 + FIT_TOLERANCE) >= required)
            .or_else(|| self.lods.first())
            .copied()
    }

    /// Zoom level (possibly fractional) that corresponds to the resolution.
    pub fn zoom_for_resolution(&self, resolution: f64) -> Option<f64> {
        let top = self.lods.first()?;
        let zoom = top.z_index() as f64 + (top.resolution() / resolution).log2();
        zoom.is_finite().then_some(zoom)
    }

    /// Iterate over tile indices that should be displayed for the given map view.
    ///
    /// X indices are wrapped around the antimeridian, so a view crossing it gets the tiles of
    /// the other side of the world.
    pub fn iter_tiles(&self, view: &MapView) -> Option<impl Iterator<Item = TileIndex>> {
        let lod = self.select_lod(view.resolution())?;
        let bbox = view.get_bbox()?;

        let tile_w = lod.resolution() * self.tile_width as f64;
        let tile_h = lod.resolution() * self.tile_height as f64;

        let columns = (self.bounds.width() / tile_w).round().max(1.0) as i32;
        let rows = (self.bounds.height() / tile_h).round().max(1.0) as i32;

        let x_min = floor_index((bbox.x_min() - self.origin.x) / tile_w);
        let x_max = ceil_index((bbox.x_max() - self.origin.x) / tile_w)
            .max(x_min)
            .min(x_min + columns - 1);

        let y_min = floor_index((self.origin.y - bbox.y_max()) / tile_h).max(0);
        let y_max = ceil_index((self.origin.y - bbox.y_min()) / tile_h).min(rows - 1);

        let z = lod.z_index();
        Some((x_min..=x_max).flat_map(move |display_x| {
            (y_min..=y_max).map(move |y| TileIndex::new(display_x.rem_euclid(columns), y, z))
        }))
    }

    /// Bounding rectangle of the tile in map coordinates.
    pub fn tile_bbox(&self, index: TileIndex) -> Option<Rect> {
        let resolution = self.lod_resolution(index.z)?;
        let tile_w = resolution * self.tile_width as f64;
        let tile_h = resolution * self.tile_height as f64;

        let x_min = self.origin.x + index.x as f64 * tile_w;
        let y_max = self.origin.y - index.y as f64 * tile_h;

        Some(Rect::new(x_min, y_max - tile_h, x_min + tile_w, y_max))
    }
}

fn floor_index(value: f64) -> i32 {
    (value + INDEX_TOLERANCE).floor() as i32
}

fn ceil_index(value: f64) -> i32 {
    (value - INDEX_TOLERANCE).ceil() as i32 - 1
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use arbor_types::cartesian::Size;

    use super::*;

    #[test]
    fn web_schema_resolutions() {
        let schema = TileSchema::web(19);
        assert_eq!(schema.max_z(), 18);
        assert_abs_diff_eq!(
            schema.lod_resolution(0).expect("z0"),
            156543.03392804097,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            schema.lod_resolution(18).expect("z18"),
            0.5971642834779395,
            epsilon = 1e-9
        );
        assert!(schema.lod_resolution(19).is_none());
    }

    #[test]
    fn invalid_lod_creation() {
        assert!(Lod::new(1.0, 1).is_some());
        assert!(Lod::new(0.0, 1).is_none());
        assert!(Lod::new(-1.0, 1).is_none());
        assert!(Lod::new(f64::NAN, 1).is_none());
        assert!(Lod::new(f64::INFINITY, 1).is_none());
    }

    #[test]
    fn select_lod() {
        let schema = TileSchema::web(4);
        let z1 = schema.lod_resolution(1).expect("z1");
        assert_eq!(schema.select_lod(z1).expect("lod").z_index(), 1);
        assert_eq!(schema.select_lod(z1 * 1.5).expect("lod").z_index(), 0);
        assert_eq!(schema.select_lod(z1 * 0.75).expect("lod").z_index(), 1);
        assert_eq!(schema.select_lod(z1 * 0.01).expect("lod").z_index(), 3);
        assert!(schema.select_lod(f64::NAN).is_none());
    }

    #[test]
    fn fitting_lod() {
        let schema = TileSchema::web(19);
        let z5 = schema.lod_resolution(5).expect("z5");
        assert_eq!(schema.fitting_lod(z5, 18).expect("lod").z_index(), 5);
        assert_eq!(schema.fitting_lod(z5 * 0.9, 18).expect("lod").z_index(), 5);
        assert_eq!(schema.fitting_lod(z5 * 1.5, 18).expect("lod").z_index(), 4);
        assert_eq!(schema.fitting_lod(z5 * 1.008, 18).expect("lod").z_index(), 4);
        assert_eq!(schema.fitting_lod(0.0, 18).expect("lod").z_index(), 18);
        assert_eq!(schema.fitting_lod(0.0, 12).expect("lod").z_index(), 12);
        assert_eq!(schema.fitting_lod(f64::MAX, 18).expect("lod").z_index(), 0);
    }

    #[test]
    fn zoom_for_resolution() {
        let schema = TileSchema::web(19);
        let z7 = schema.lod_resolution(7).expect("z7");
        assert_abs_diff_eq!(
            schema.zoom_for_resolution(z7).expect("zoom"),
            7.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            schema.zoom_for_resolution(z7 / 2f64.sqrt()).expect("zoom"),
            7.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn iter_tiles_center_of_world() {
        let schema = TileSchema::web(19);
        let resolution = schema.lod_resolution(2).expect("z2");
        let view = MapView::new_projected(Point2::new(0.0, 0.0), resolution)
            .with_size(Size::new(512.0, 512.0));

        let mut tiles: Vec<TileIndex> = schema.iter_tiles(&view).expect("tiles").collect();
        tiles.sort_by_key(|t| (t.x, t.y));
        assert_eq!(
            tiles,
            vec![
                TileIndex::new(1, 1, 2),
                TileIndex::new(1, 2, 2),
                TileIndex::new(2, 1, 2),
                TileIndex::new(2, 2, 2),
            ]
        );
    }

    #[test]
    fn iter_tiles_whole_world_at_zero_zoom() {
        let schema = TileSchema::web(19);
        let resolution = schema.lod_resolution(0).expect("z0");
        let view = MapView::new_projected(Point2::new(0.0, 0.0), resolution)
            .with_size(Size::new(1024.0, 768.0));

        let tiles: Vec<TileIndex> = schema.iter_tiles(&view).expect("tiles").collect();
        assert_eq!(tiles, vec![TileIndex::new(0, 0, 0)]);
    }

    #[test]
    fn iter_tiles_wraps_antimeridian() {
        let schema = TileSchema::web(19);
        let resolution = schema.lod_resolution(1).expect("z1");
        let half_world = schema.bounds.x_max();
        let view = MapView::new_projected(Point2::new(half_world, half_world / 2.0), resolution)
            .with_size(Size::new(256.0, 256.0));

        let mut xs: Vec<i32> = schema
            .iter_tiles(&view)
            .expect("tiles")
            .map(|t| t.x)
            .collect();
        xs.sort();
        xs.dedup();
        assert_eq!(xs, vec![0, 1]);
    }

    #[test]
    fn schema_from_json() {
        let schema = TileSchema::web(3);
        let json = serde_json::to_value(&schema).expect("serialized");
        assert_eq!(json["tile_width"], 256);
        assert_eq!(json["lods"].as_array().map(Vec::len), Some(3));

        let restored: TileSchema = serde_json::from_value(json).expect("deserialized");
        assert_eq!(restored, schema);
    }

    #[test]
    fn tile_bbox() {
        let schema = TileSchema::web(19);
        let bbox = schema.tile_bbox(TileIndex::new(1, 0, 1)).expect("bbox");
        assert_abs_diff_eq!(bbox.x_min(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.y_min(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.x_max(), schema.bounds.x_max(), epsilon = 1e-6);
        assert_abs_diff_eq!(bbox.y_max(), schema.bounds.y_max(), epsilon = 1e-6);
        assert!(schema.tile_bbox(TileIndex::new(0, 0, 30)).is_none());
    }
}
