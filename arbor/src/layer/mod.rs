//! [Layers](Layer) specify a data source and the way the data should be displayed on the map.

use std::any::Any;

use arbor_types::cartesian::Rect;
use maybe_sync::{MaybeSend, MaybeSync};

pub mod attribution;
pub mod marker_layer;
pub mod raster_tile_layer;

pub use attribution::Attribution;
pub use marker_layer::{Marker, MarkerLayer};
pub use raster_tile_layer::{RasterTileLayer, RasterTileLayerBuilder};

/// Layers specify a data source and the way the data should be displayed on the map.
///
/// There are currently 2 types of layers:
/// * [`RasterTileLayer`] - prerendered base map tiles loaded from an Internet source.
/// * [`MarkerLayer`] - point markers with popups, built from GeoJSON features.
pub trait Layer: MaybeSend + MaybeSync {
    /// A map stores layers as trait objects. This method can be used to convert the trait object
    /// into the concrete type.
    fn as_any(&self) -> &dyn Any;
    /// A map stores layers as trait objects. This method can be used to convert the trait object
    /// into the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Returns the attribution of the layer, if available.
    fn attribution(&self) -> Option<Attribution>;
    /// Extent of the layer data in projected coordinates. Layers covering the whole world (like
    /// base maps) return `None`.
    fn bounds(&self) -> Option<Rect> {
        None
    }
}
