//! Provides platform specific logic and [`PlatformService`] to access it.

use async_trait::async_trait;
use bytes::Bytes;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::config::ClientConfig;
use crate::error::ArborError;

/// Service providing HTTP access in a platform independent way.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait PlatformService: MaybeSend + MaybeSync {
    /// Loads a byte array from the given url with a `GET` request.
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, ArborError>;

    /// Sends a `POST` request without body to the url and returns the response body.
    async fn post(&self, url: &str) -> Result<Bytes, ArborError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

/// Default implementation of the [`PlatformService`] for the current platform.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformServiceImpl = native::NativePlatformService;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Default implementation of the [`PlatformService`] for the current platform.
#[cfg(target_arch = "wasm32")]
pub type PlatformServiceImpl = web::WebPlatformService;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        /// Creates the platform service for the current platform.
        pub fn from_config(_config: &ClientConfig) -> Result<PlatformServiceImpl, ArborError> {
            Ok(web::WebPlatformService::new())
        }
    } else {
        /// Creates the platform service for the current platform.
        pub fn from_config(config: &ClientConfig) -> Result<PlatformServiceImpl, ArborError> {
            native::NativePlatformService::new(&config.user_agent, config.request_timeout())
        }
    }
}
