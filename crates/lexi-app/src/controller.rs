use kanal::{AsyncReceiver, AsyncSender};
use lexi_core::{EventSink, InteractionState};
use lexi_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::spawn_input_reader;

/// Application controller for task spawning and lifecycle
pub struct AppController {
    events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new() -> Self {
        Self {
            // Recognizer and synthesizer callbacks send without awaiting
            events: kanal::unbounded_async(),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn sink(&self) -> EventSink {
        EventSink::new(self.events.0.clone())
    }

    pub fn receiver(&self) -> AsyncReceiver<AppEvent> {
        self.events.1.clone()
    }

    pub fn spawn_tasks(&self, state: InteractionState) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop owns the state for its whole lifetime
        tasks.spawn(event_loop(
            state,
            self.receiver(),
            self.cancel_token.child_token(),
        ));

        // Stdin reader lives on its own thread so a pending read never holds up shutdown
        spawn_input_reader(self.sink());

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
