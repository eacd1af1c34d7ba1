use std::collections::HashMap;

use super::{RasterTileLayer, UrlSource};
use crate::error::ArborError;
use crate::layer::Attribution;
use crate::tile_schema::{TileIndex, TileSchema};

/// Url template of the standard OpenStreetMap tile server.
pub const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Zoom levels served by the OpenStreetMap tile server (`0..=18`).
pub const OSM_LODS: u32 = 19;

/// Constructor for a [`RasterTileLayer`].
///
/// ```
/// use arbor::layer::RasterTileLayerBuilder;
///
/// let layer = RasterTileLayerBuilder::new_template("https://tile.example.com/{z}/{x}/{y}.png")
///     .build()?;
/// # Ok::<(), arbor::error::ArborError>(())
/// ```
pub struct RasterTileLayerBuilder {
    source: SourceType,
    tile_schema: Option<TileSchema>,
    attribution: Option<Attribution>,
}

enum SourceType {
    Rest(Box<dyn UrlSource<TileIndex>>),
    Template(String),
}

impl RasterTileLayerBuilder {
    /// Initializes a builder for a layer that requests tiles from the given url source.
    pub fn new_rest(tile_source: impl UrlSource<TileIndex> + 'static) -> Self {
        Self {
            source: SourceType::Rest(Box::new(tile_source)),
            tile_schema: None,
            attribution: None,
        }
    }

    /// Initializes a builder for a layer with urls given by a template with `{z}`, `{x}` and
    /// `{y}` placeholders. The template is validated by [`RasterTileLayerBuilder::build`].
    pub fn new_template(template: impl Into<String>) -> Self {
        Self {
            source: SourceType::Template(template.into()),
            tile_schema: None,
            attribution: None,
        }
    }

    #[allow(rustdoc::bare_urls)]
    /// Initializes a builder for a raster tile layer with the Open Streets Map source.
    ///
    /// It uses the standard "https://tile.openstreetmap.org/{z}/{x}/{y}.png" URL pattern to
    /// retrieve the tiles.
    pub fn new_osm() -> Self {
        Self::new_template(OSM_TILE_URL)
            .with_tile_schema(TileSchema::web(OSM_LODS))
            .with_attribution(Attribution::new(
                "© OpenStreetMap",
                Some("https://www.openstreetmap.org/copyright".to_string()),
            ))
    }

    /// Sets the tile schema of the layer. Defaults to [`TileSchema::web`] with 18 levels.
    pub fn with_tile_schema(mut self, tile_schema: TileSchema) -> Self {
        self.tile_schema = Some(tile_schema);
        self
    }

    /// Sets the attribution of the layer.
    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = Some(attribution);
        self
    }

    /// Consumes the builder and constructs the layer.
    ///
    /// Fails if a url template references a placeholder other than `{z}`, `{x}` and `{y}`.
    pub fn build(self) -> Result<RasterTileLayer, ArborError> {
        let Self {
            source,
            tile_schema,
            attribution,
        } = self;

        let url_source: Box<dyn UrlSource<TileIndex>> = match source {
            SourceType::Rest(url_source) => url_source,
            SourceType::Template(template) => {
                format_tile_url(&template, &TileIndex::new(0, 0, 0))?;
                Box::new(move |index: &TileIndex| {
                    format_tile_url(&template, index).unwrap_or_else(|err| {
                        log::error!("Failed to format tile url {template}: {err}");
                        String::new()
                    })
                })
            }
        };

        Ok(RasterTileLayer::new_raw(
            url_source,
            tile_schema.unwrap_or_else(|| TileSchema::web(18)),
            attribution,
        ))
    }
}

fn format_tile_url(template: &str, index: &TileIndex) -> Result<String, ArborError> {
    let vars = HashMap::from([
        ("z".to_string(), index.z.to_string()),
        ("x".to_string(), index.x.to_string()),
        ("y".to_string(), index.y.to_string()),
    ]);

    Ok(strfmt::strfmt(template, &vars)?)
}
