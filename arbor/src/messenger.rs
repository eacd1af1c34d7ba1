use maybe_sync::{MaybeSend, MaybeSync};

/// Notifies the hosting application that the map should be redrawn.
pub trait Messenger: MaybeSend + MaybeSync {
    /// Requests a redraw of the map.
    fn request_redraw(&self);
}

/// Messenger that ignores all requests. Useful for headless maps.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}

impl<T: Messenger + ?Sized> Messenger for std::sync::Arc<T> {
    fn request_redraw(&self) {
        (**self).request_redraw()
    }
}
