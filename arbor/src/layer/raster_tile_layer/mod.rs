//! Base map layer made of prerendered raster tiles.

use std::any::Any;

use bytes::Bytes;
use maybe_sync::{MaybeSend, MaybeSync};

use super::{Attribution, Layer};
use crate::error::ArborError;
use crate::platform::PlatformService;
use crate::tile_schema::{TileIndex, TileSchema};
use crate::view::MapView;

mod builder;
pub use builder::{RasterTileLayerBuilder, OSM_LODS, OSM_TILE_URL};

/// Function returning the url of a tile.
pub trait UrlSource<Key: ?Sized>: (Fn(&Key) -> String) + MaybeSend + MaybeSync {}
impl<Key: ?Sized, T: Fn(&Key) -> String> UrlSource<Key> for T where T: MaybeSend + MaybeSync {}

/// Raster tile layers reference a tile set available with one REST GET request per tile.
///
/// The layer knows which tiles cover a [`MapView`] and where to get them; decoding and drawing
/// the images is left to the renderer of the hosting application.
pub struct RasterTileLayer {
    url_source: Box<dyn UrlSource<TileIndex>>,
    tile_schema: TileSchema,
    attribution: Option<Attribution>,
}

impl std::fmt::Debug for RasterTileLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterTileLayer")
            .field("tile_schema", &self.tile_schema)
            .field("attribution", &self.attribution)
            .finish()
    }
}

impl RasterTileLayer {
    pub(crate) fn new_raw(
        url_source: Box<dyn UrlSource<TileIndex>>,
        tile_schema: TileSchema,
        attribution: Option<Attribution>,
    ) -> Self {
        Self {
            url_source,
            tile_schema,
            attribution,
        }
    }

    /// Tile schema of the layer.
    pub fn tile_schema(&self) -> &TileSchema {
        &self.tile_schema
    }

    /// Url of the tile.
    pub fn tile_url(&self, index: &TileIndex) -> String {
        (self.url_source)(index)
    }

    /// Urls of all tiles needed to cover the view. Empty if the view has no size.
    pub fn tile_urls(&self, view: &MapView) -> Vec<String> {
        let Some(tiles) = self.tile_schema.iter_tiles(view) else {
            return vec![];
        };

        tiles.map(|index| self.tile_url(&index)).collect()
    }

    /// Downloads the tile image.
    pub async fn load_tile(
        &self,
        index: TileIndex,
        platform_service: &impl PlatformService,
    ) -> Result<Bytes, ArborError> {
        let url = self.tile_url(&index);
        let bytes = platform_service.load_bytes_from_url(&url).await?;
        log::trace!("Loaded tile {index:?} ({} bytes)", bytes.len());
        Ok(bytes)
    }
}

impl Layer for RasterTileLayer {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn attribution(&self) -> Option<Attribution> {
        self.attribution.clone()
    }
}
