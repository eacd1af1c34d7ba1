//! Platform specific stuff for native targets.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::info;
use reqwest::Method;

use crate::error::ArborError;
use crate::platform::PlatformService;

/// Platform service for native targets, backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct NativePlatformService {
    http_client: reqwest::Client,
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PlatformService for NativePlatformService {
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, ArborError> {
        self.send(Method::GET, url).await
    }

    async fn post(&self, url: &str) -> Result<Bytes, ArborError> {
        self.send(Method::POST, url).await
    }
}

impl NativePlatformService {
    /// Creates a new service sending the given `User-Agent` header.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, ArborError> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
        })
    }

    async fn send(&self, method: Method, url: &str) -> Result<Bytes, ArborError> {
        let response = self.http_client.request(method.clone(), url).send().await?;
        let status = response.status();
        if !status.is_success() {
            info!(
                "Failed to load {method} {url}: {status}, {:?}",
                response.text().await
            );
            return Err(ArborError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?)
    }
}
