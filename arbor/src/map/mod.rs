//! [`Map`] holds the current view, the layers and the redraw channel of the hosting application.

use arbor_types::cartesian::{Rect, Size};

use crate::layer::{Attribution, Layer};
use crate::messenger::Messenger;
use crate::tile_schema::TileSchema;
use crate::view::MapView;

mod layer_collection;

pub use layer_collection::LayerCollection;

/// Map specifies a set of layers, and the view that should be rendered.
pub struct Map {
    view: MapView,
    layers: LayerCollection,
    messenger: Option<Box<dyn Messenger>>,
}

impl std::fmt::Debug for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("view", &self.view)
            .field("layers", &self.layers)
            .field("has_messenger", &self.messenger.is_some())
            .finish()
    }
}

impl Map {
    /// Creates a new map.
    pub fn new(
        view: MapView,
        layers: Vec<Box<dyn Layer>>,
        messenger: Option<Box<dyn Messenger + 'static>>,
    ) -> Self {
        Self {
            view,
            layers: layers.into(),
            messenger,
        }
    }

    /// Current view of the map.
    pub fn view(&self) -> &MapView {
        &self.view
    }

    /// Returns the list of map's layers.
    pub fn layers(&self) -> &LayerCollection {
        &self.layers
    }

    /// Returns a mutable reference to the list of map's layers.
    pub fn layers_mut(&mut self) -> &mut LayerCollection {
        &mut self.layers
    }

    /// Changes the view of the map to the given one.
    pub fn set_view(&mut self, view: MapView) {
        self.view = view;
        self.redraw();
    }

    /// Request redraw of the map.
    pub fn redraw(&self) {
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw()
        }
    }

    /// Set the size of the map.
    pub fn set_size(&mut self, new_size: Size) {
        self.view = self.view.with_size(new_size);
    }

    /// Attributions of the visible layers.
    pub fn attributions(&self) -> Vec<Attribution> {
        self.layers
            .iter_visible()
            .filter_map(|layer| layer.attribution())
            .collect()
    }

    /// Fits the view to `bbox` (see [`MapView::fit_bounds`]). Returns false and leaves the view
    /// unchanged if the view cannot be fitted.
    pub fn fit_bounds(&mut self, bbox: Rect, schema: &TileSchema, max_z: u32, padding: f64) -> bool {
        match self.view.fit_bounds(bbox, schema, max_z, padding) {
            Some(view) => {
                self.set_view(view);
                true
            }
            None => {
                log::warn!("Cannot fit the map view to {bbox:?}");
                false
            }
        }
    }
}
