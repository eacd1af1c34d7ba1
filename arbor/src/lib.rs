//! Arbor is a map client for tree inventories. It shows an OpenStreetMap base map, requests the
//! trees of a stand from a server as a GeoJSON feature collection and displays them as markers
//! with popups, fitting the view to the loaded trees.
//!
//! # Quick start
//!
//! ```no_run
//! use arbor::{ClientConfig, MapClientBuilder};
//!
//! # tokio_test::block_on(async {
//! let client = MapClientBuilder::new()
//!     .with_config(ClientConfig::default().with_base_url("http://127.0.0.1:8000"))
//!     .build()?;
//!
//! let outcome = client.on_load_requested().await?;
//! println!("{} trees, view at zoom {:?}", outcome.summary.num_trees, client.zoom());
//! # Ok::<(), arbor::error::ArborError>(())
//! # });
//! ```
//!
//! # Main components
//!
//! * [`MapClient`] owns the [`Map`] and runs the load flow: `POST` to the trees endpoint, preview
//!   of the first features in the [`InfoDisplay`], marker layer creation and bounds fitting.
//! * [`Map`] holds the current [`MapView`] and the [`layers`](layer): the
//!   [`RasterTileLayer`](layer::RasterTileLayer) base map and one
//!   [`MarkerLayer`](layer::MarkerLayer) per load.
//! * [`platform`] hides the HTTP stack: `reqwest` on native targets, `fetch` in the browser.
//!
//! Drawing is left to the hosting application. The client tells it what to draw (tile urls,
//! marker positions, popups) and asks it to redraw through a [`Messenger`].
//!
//! In the browser, call `bind_tree_page()` after the page is loaded to connect the client to the
//! `#load` button and the `#info` block.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub(crate) mod async_runtime;
pub mod client;
pub mod config;
pub mod error;
pub mod layer;
mod map;
mod messenger;
pub mod platform;
pub mod tile_schema;
pub mod trees;
mod view;

#[cfg(test)]
mod tests;

pub use client::{InfoDisplay, LoadOutcome, MapClient, MapClientBuilder};
pub use config::{ClientConfig, LoadMode};
pub use map::{LayerCollection, Map};
pub use messenger::{DummyMessenger, Messenger};
pub use tile_schema::{Lod, TileIndex, TileSchema};
pub use trees::{StandSummary, TreeCollection};
pub use view::MapView;

// Reexport arbor_types
pub use arbor_types;
