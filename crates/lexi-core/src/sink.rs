use kanal::AsyncSender;
use lexi_types::AppEvent;

/// Write end of the interaction event channel handed to async collaborators
#[derive(Clone)]
pub struct EventSink {
    tx: AsyncSender<AppEvent>,
}

impl EventSink {
    pub fn new(tx: AsyncSender<AppEvent>) -> Self {
        Self { tx }
    }

    /// Non-blocking send, usable from recognizer and synthesizer callbacks
    pub fn emit(&self, event: AppEvent) {
        match self.tx.try_send(event) {
            Ok(true) => {}
            Ok(false) => tracing::warn!("Event channel full, dropping event"),
            Err(e) => tracing::warn!("Failed to emit event: {}", e),
        }
    }

    pub async fn send(&self, event: AppEvent) {
        if let Err(e) = self.tx.send(event).await {
            tracing::warn!("Failed to send event: {}", e);
        }
    }
}
