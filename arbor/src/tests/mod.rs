//! Shared test fixtures.

use std::any::Any;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use futures::channel::oneshot;
use parking_lot::Mutex;

use crate::client::InfoDisplay;
use crate::error::ArborError;
use crate::layer::{Attribution, Layer};
use crate::messenger::Messenger;
use crate::platform::PlatformService;

/// Single tree from the end-to-end scenario.
pub const OAK_COLLECTION: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"label":"Oak1","height":9.5},"geometry":{"type":"Point","coordinates":[10,20]}}]}"#;

/// Clustered stand as produced by the segmentation server: 7 features, one without geometry.
pub const TREES_COLLECTION: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [24.9384, 60.1699]}, "properties": {"label": 3, "height": 12.345, "point_count": 120, "footprint": 4.2}},
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [24.9391, 60.1702]}, "properties": {"label": 4, "height": 18.0, "point_count": 210, "footprint": 6.8}},
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [24.9377, 60.1695]}, "properties": {"label": 5, "height": 7.25, "point_count": 64, "footprint": 2.1}},
    {"type": "Feature", "geometry": null, "properties": {"label": 6, "height": 3.0, "point_count": 12, "footprint": 0.4}},
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [24.9402, 60.1710]}, "properties": {"label": 7, "height": 21.125, "point_count": 301, "footprint": 9.9}},
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [24.9369, 60.1688]}, "properties": {"label": 8, "height": 15.5, "point_count": 150, "footprint": 5.0}},
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [24.9410, 60.1715]}, "properties": {"label": 9, "height": 11.0, "point_count": 98, "footprint": 3.7}}
  ]
}"#;

/// Response of the [`MockPlatformService`].
pub enum MockResponse {
    Ok(Bytes),
    Status(u16),
    Gated(oneshot::Receiver<()>, Box<MockResponse>),
}

impl MockResponse {
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::Ok(body.into())
    }

    pub fn status(status: u16) -> Self {
        Self::Status(status)
    }

    /// The response is returned only after the sender is used or dropped.
    pub fn gated(response: MockResponse) -> (oneshot::Sender<()>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self::Gated(receiver, Box::new(response)))
    }
}

/// Platform service returning prepared responses in order.
#[derive(Default)]
pub struct MockPlatformService {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockPlatformService {
    pub fn new(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::default(),
        }
    }

    /// Method and url of every request, in order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().clone()
    }

    async fn respond(&self, method: &str, url: &str) -> Result<Bytes, ArborError> {
        self.requests.lock().push((method.to_string(), url.to_string()));
        let mut response = self
            .responses
            .lock()
            .pop_front()
            .ok_or_else(|| ArborError::Network(format!("no response prepared for {url}")))?;

        loop {
            match response {
                MockResponse::Ok(bytes) => return Ok(bytes),
                MockResponse::Status(status) => {
                    return Err(ArborError::Http {
                        url: url.to_string(),
                        status,
                    })
                }
                MockResponse::Gated(gate, inner) => {
                    let _ = gate.await;
                    response = *inner;
                }
            }
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl PlatformService for MockPlatformService {
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, ArborError> {
        self.respond("GET", url).await
    }

    async fn post(&self, url: &str) -> Result<Bytes, ArborError> {
        self.respond("POST", url).await
    }
}

#[derive(Default)]
pub struct RecordingInfoDisplay {
    texts: Mutex<Vec<String>>,
}

impl RecordingInfoDisplay {
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().clone()
    }
}

impl InfoDisplay for RecordingInfoDisplay {
    fn show(&self, text: &str) {
        self.texts.lock().push(text.to_string());
    }
}

#[derive(Default)]
pub struct CountingMessenger {
    count: AtomicUsize,
}

impl CountingMessenger {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Messenger for CountingMessenger {
    fn request_redraw(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Layer without data, attributed with its name.
#[derive(Debug, PartialEq, Eq)]
pub struct TestLayer(pub &'static str);

impl Layer for TestLayer {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn attribution(&self) -> Option<Attribution> {
        Some(Attribution::new(self.0, None))
    }
}
