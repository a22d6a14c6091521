//! Transport-agnostic preview channel.

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use log::debug;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Stream of raw payloads delivered to one listener.
///
/// Dropping the receiver releases the subscription.
pub type PreviewReceiver = BoxStream<'static, Value>;

/// Channel carrying preview payloads from an editor to renderers.
///
/// Payloads are raw JSON so a receiver can drop malformed messages without
/// the transport knowing the message schema.
pub trait PreviewChannel: Send + Sync {
    /// Post a payload to every current listener. Returns the number of
    /// listeners it was delivered to; zero listeners is not an error.
    fn send(&self, payload: Value) -> usize;
    /// Register a new listener.
    fn subscribe(&self) -> PreviewReceiver;
}

/// In-process fan-out channel with an unbounded queue per listener.
///
/// Editors send partial updates, so a listener must see every payload in
/// send order; a slow listener queues instead of skipping messages.
#[derive(Clone, Debug, Default)]
pub struct BroadcastPreviewChannel {
    listeners: Arc<Mutex<Vec<mpsc::UnboundedSender<Value>>>>,
}

impl BroadcastPreviewChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(|sender| !sender.is_closed());
        listeners.len()
    }
}

impl PreviewChannel for BroadcastPreviewChannel {
    fn send(&self, payload: Value) -> usize {
        let mut listeners = self.listeners.lock();
        listeners.retain(|sender| sender.send(payload.clone()).is_ok());
        if listeners.is_empty() {
            debug!("preview payload dropped: no listeners");
        }
        listeners.len()
    }

    fn subscribe(&self) -> PreviewReceiver {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut listeners = self.listeners.lock();
        listeners.push(sender);
        debug!("preview listener subscribed (listeners={})", listeners.len());
        UnboundedReceiverStream::new(receiver).boxed()
    }
}
