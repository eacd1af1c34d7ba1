//! Platform specific stuff for WASM32 (web) targets.

use async_trait::async_trait;
use bytes::Bytes;
use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error::ArborError;
use crate::platform::PlatformService;

pub mod page;

/// Platform service for Web target, backed by the browser `fetch` API.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebPlatformService {}

impl WebPlatformService {
    /// Creates a new service.
    pub fn new() -> Self {
        Self {}
    }

    async fn fetch(&self, method: &str, url: &str) -> Result<Bytes, ArborError> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);

        let request = Request::new_with_str_and_init(url, &opts)?;
        let window = web_sys::window()
            .ok_or_else(|| ArborError::Wasm(Some("Global window is not available".into())))?;

        let resp: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|err| ArborError::Network(format!("{err:?}")))?
            .dyn_into()?;

        if !resp.ok() {
            log::info!("Failed to load {method} {url}: {}", resp.status());
            return Err(ArborError::Http {
                url: url.to_string(),
                status: resp.status(),
            });
        }

        let bytes_val = JsFuture::from(resp.array_buffer()?).await?;
        let array = Uint8Array::new(&bytes_val);
        Ok(array.to_vec().into())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl PlatformService for WebPlatformService {
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, ArborError> {
        self.fetch("GET", url).await
    }

    async fn post(&self, url: &str) -> Result<Bytes, ArborError> {
        self.fetch("POST", url).await
    }
}
