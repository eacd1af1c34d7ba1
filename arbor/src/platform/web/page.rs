//! Binds a [`MapClient`] to the tree page markup: a `#load` button, an `#info` text block and a
//! `#map` container.

use std::sync::Arc;

use arbor_types::cartesian::Size;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::client::{InfoDisplay, MapClient, MapClientBuilder};
use crate::config::ClientConfig;
use crate::error::ArborError;

/// Shows the info text as the text content of a DOM element.
#[derive(Debug, Clone)]
pub struct ElementInfoDisplay {
    element: Element,
}

impl ElementInfoDisplay {
    /// Creates a display writing into `element`.
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl InfoDisplay for ElementInfoDisplay {
    fn show(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }
}

impl From<ArborError> for JsValue {
    fn from(value: ArborError) -> Self {
        JsValue::from_str(&value.to_string())
    }
}

/// Initializes the console logger, creates the map client and makes the `#load` button load
/// the trees.
#[wasm_bindgen]
pub fn bind_tree_page() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger is already initialized");
    }

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| ArborError::Wasm(Some("Document is not available".into())))?;

    let info = element_by_id(&document, "info")?;
    let load: HtmlElement = element_by_id(&document, "load")?.dyn_into()?;

    let mut config = ClientConfig::default();
    if let Some(container) = document.get_element_by_id("map") {
        let size = Size::new(
            container.client_width() as f64,
            container.client_height() as f64,
        );
        if !size.is_zero() {
            config.viewport = size;
        }
    }

    #[allow(clippy::arc_with_non_send_sync)]
    let client: Arc<MapClient> = Arc::new(
        MapClientBuilder::new()
            .with_config(config)
            .with_info_display(ElementInfoDisplay::new(info))
            .build()?,
    );

    let on_click = Closure::<dyn FnMut()>::new(move || client.request_load());
    load.set_onclick(Some(on_click.as_ref().unchecked_ref()));
    on_click.forget();

    log::info!("Tree page is ready");
    Ok(())
}

fn element_by_id(document: &Document, id: &str) -> Result<Element, ArborError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ArborError::Configuration(format!("element #{id} is not found")))
}
