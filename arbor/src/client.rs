//! [`MapClient`] ties the map, the tree endpoint and the info display together.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arbor_types::cartesian::{Point2, Rect, Size};
use futures::future::{AbortHandle, Abortable};
use maybe_sync::{MaybeSend, MaybeSync};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use crate::config::{ClientConfig, LoadMode};
use crate::error::ArborError;
use crate::layer::{Attribution, Layer, MarkerLayer, RasterTileLayer, RasterTileLayerBuilder};
use crate::map::Map;
use crate::messenger::Messenger;
use crate::platform::{PlatformService, PlatformServiceImpl};
use crate::tile_schema::TileSchema;
use crate::trees::{StandSummary, TreeCollection};
use crate::view::MapView;

/// Distance in pixels from a marker within which a click opens its popup.
pub const POPUP_TOLERANCE_PX: f64 = 12.0;

/// Target of the human readable status text of the client (the `info` block of the page).
pub trait InfoDisplay: MaybeSend + MaybeSync {
    /// Replaces the displayed text.
    fn show(&self, text: &str);
}

impl<T: InfoDisplay + ?Sized> InfoDisplay for Arc<T> {
    fn show(&self, text: &str) {
        (**self).show(text)
    }
}

/// Info display that writes the text to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInfoDisplay;

impl InfoDisplay for LogInfoDisplay {
    fn show(&self, text: &str) {
        log::info!("{text}");
    }
}

/// Result of a completed load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadOutcome {
    /// Number of features in the received collection.
    pub features: usize,
    /// Number of markers added to the map.
    pub markers: usize,
    /// Extent of the added markers in projected coordinates.
    pub bounds: Option<Rect>,
    /// Whether the view was fitted to the markers.
    pub fitted: bool,
    /// Figures of the loaded trees.
    pub summary: StandSummary,
}

struct PendingLoad {
    id: u64,
    abort_handle: AbortHandle,
}

/// Map client: owns the map with the base tile layer and loads tree markers on request.
pub struct MapClient<S = PlatformServiceImpl> {
    config: ClientConfig,
    tile_schema: TileSchema,
    map: RwLock<Map>,
    info: Box<dyn InfoDisplay>,
    service: S,
    pending: Mutex<Option<PendingLoad>>,
    next_load_id: AtomicU64,
}

impl<S> std::fmt::Debug for MapClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapClient")
            .field("config", &self.config)
            .field("map", &*self.map.read())
            .finish()
    }
}

/// Constructor for a [`MapClient`].
pub struct MapClientBuilder {
    config: ClientConfig,
    info: Option<Box<dyn InfoDisplay>>,
    messenger: Option<Box<dyn Messenger>>,
}

impl Default for MapClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MapClientBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            info: None,
            messenger: None,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the target of the info text. Defaults to [`LogInfoDisplay`].
    pub fn with_info_display(mut self, info: impl InfoDisplay + 'static) -> Self {
        self.info = Some(Box::new(info));
        self
    }

    /// Sets the messenger notified when the map must be redrawn.
    pub fn with_messenger(mut self, messenger: impl Messenger + 'static) -> Self {
        self.messenger = Some(Box::new(messenger));
        self
    }

    /// Builds the client with the platform service of the current platform.
    pub fn build(self) -> Result<MapClient, ArborError> {
        let service = crate::platform::from_config(&self.config)?;
        self.build_with_service(service)
    }

    /// Builds the client with the given platform service.
    ///
    /// Creates the map view at the configured center and zoom with the base tile layer.
    pub fn build_with_service<S: PlatformService>(
        self,
        service: S,
    ) -> Result<MapClient<S>, ArborError> {
        let Self {
            config,
            info,
            messenger,
        } = self;

        let tile_layer = RasterTileLayerBuilder::new_template(config.tile_url_template.clone())
            .with_tile_schema(TileSchema::web(crate::layer::raster_tile_layer::OSM_LODS))
            .with_attribution(config.attribution())
            .build()?;
        let tile_schema = tile_layer.tile_schema().clone();

        let view = MapView::new(&config.initial_center, 1.0)
            .with_zoom(&tile_schema, config.initial_zoom)
            .ok_or_else(|| {
                ArborError::Configuration(format!(
                    "initial zoom {} is not in the tile schema (max {})",
                    config.initial_zoom,
                    tile_schema.max_z()
                ))
            })?
            .with_size(config.viewport);

        log::debug!(
            "Map initialized at {:?}, zoom {}",
            config.initial_center,
            config.initial_zoom
        );

        Ok(MapClient {
            tile_schema,
            map: RwLock::new(Map::new(
                view,
                vec![Box::new(tile_layer) as Box<dyn Layer>],
                messenger,
            )),
            info: info.unwrap_or_else(|| Box::new(LogInfoDisplay) as Box<dyn InfoDisplay>),
            service,
            pending: Mutex::new(None),
            next_load_id: AtomicU64::new(0),
            config,
        })
    }
}

impl<S: PlatformService> MapClient<S> {
    /// Requests the trees and shows them on the map.
    ///
    /// The previous load, if still waiting for the server, is cancelled and resolves with
    /// [`ArborError::Cancelled`]. Nothing is changed on the map or the info display if the
    /// request or the parsing of the response fails. If a tree cannot be displayed, the preview
    /// is already shown but the map is not changed.
    pub async fn on_load_requested(&self) -> Result<LoadOutcome, ArborError> {
        let (abort_handle, registration) = AbortHandle::new_pair();
        let load_id = self.next_load_id.fetch_add(1, Ordering::SeqCst);

        let previous = self.pending.lock().replace(PendingLoad {
            id: load_id,
            abort_handle,
        });
        if let Some(previous) = previous {
            log::debug!("Load #{} is superseded by #{load_id}", previous.id);
            previous.abort_handle.abort();
        }

        let url = self.config.trees_url();
        log::info!("Loading trees from {url}");
        let result = Abortable::new(self.fetch_trees(&url), registration).await;

        {
            let mut pending = self.pending.lock();
            if pending.as_ref().is_some_and(|p| p.id == load_id) {
                *pending = None;
            }
        }

        let collection = result??;
        self.apply(load_id, &collection)
    }

    /// Starts [`MapClient::on_load_requested`] in the background. Failures are logged.
    pub fn request_load(self: &Arc<Self>)
    where
        S: 'static,
    {
        let client = Arc::clone(self);
        crate::async_runtime::spawn(async move {
            match client.on_load_requested().await {
                Ok(outcome) => log::info!(
                    "Loaded {} trees, average height {:?}",
                    outcome.summary.num_trees,
                    outcome.summary.avg_height
                ),
                Err(ArborError::Cancelled) => log::debug!("Tree load was cancelled"),
                Err(err) => log::error!("Failed to load trees: {err}"),
            }
        });
    }

    async fn fetch_trees(&self, url: &str) -> Result<TreeCollection, ArborError> {
        let body = self.service.post(url).await?;
        TreeCollection::from_slice(&body)
    }

    fn apply(&self, load_id: u64, collection: &TreeCollection) -> Result<LoadOutcome, ArborError> {
        let mut map = self.map.write();
        if self.next_load_id.load(Ordering::SeqCst) != load_id + 1 {
            return Err(ArborError::Cancelled);
        }

        self.info.show(&collection.preview(self.config.preview_len)?);

        let (layer, summary) = collection.to_marker_layer()?;
        let markers = layer.len();
        let bounds = layer.bounds();

        if self.config.load_mode == LoadMode::Replace {
            map.layers_mut()
                .retain(|layer| layer.as_any().downcast_ref::<MarkerLayer>().is_none());
        }
        map.layers_mut().push(layer);

        let fitted = match bounds {
            Some(bounds) => map.fit_bounds(
                bounds,
                &self.tile_schema,
                self.config.max_zoom,
                self.config.fit_padding,
            ),
            None => {
                log::warn!("Loaded collection has no markers, the view is not changed");
                false
            }
        };

        if !fitted {
            map.redraw();
        }

        Ok(LoadOutcome {
            features: collection.len(),
            markers,
            bounds,
            fitted,
            summary,
        })
    }
}

impl<S> MapClient<S> {
    /// Configuration of the client.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Tile schema of the base map.
    pub fn tile_schema(&self) -> &TileSchema {
        &self.tile_schema
    }

    /// Current view of the map.
    pub fn view(&self) -> MapView {
        *self.map.read().view()
    }

    /// Zoom level of the current view.
    pub fn zoom(&self) -> Option<f64> {
        self.view().zoom(&self.tile_schema)
    }

    /// Changes the size of the viewport.
    pub fn set_size(&self, size: Size) {
        let mut map = self.map.write();
        map.set_size(size);
        map.redraw();
    }

    /// Gives access to the map.
    pub fn with_map<T>(&self, f: impl FnOnce(&Map) -> T) -> T {
        f(&self.map.read())
    }

    /// Attributions of the visible layers.
    pub fn attributions(&self) -> Vec<Attribution> {
        self.map.read().attributions()
    }

    /// Popup text of the topmost marker within [`POPUP_TOLERANCE_PX`] of the screen position.
    pub fn popup_at(&self, screen_position: Point2) -> Option<String> {
        let map = self.map.read();
        let view = map.view();
        let position = view.screen_to_map(screen_position)?;
        let tolerance = POPUP_TOLERANCE_PX * view.resolution();

        let layers: Vec<&dyn Layer> = map.layers().iter_visible().collect();
        layers.into_iter().rev().find_map(|layer| {
            layer
                .as_any()
                .downcast_ref::<MarkerLayer>()?
                .marker_at(&position, tolerance)
                .map(|marker| marker.popup().to_string())
        })
    }

    /// Urls of the base map tiles covering the current view.
    pub fn visible_tiles(&self) -> Vec<String> {
        let map = self.map.read();
        map.layers()
            .iter_visible()
            .filter_map(|layer| layer.as_any().downcast_ref::<RasterTileLayer>())
            .flat_map(|layer| layer.tile_urls(map.view()))
            .collect()
    }
}
