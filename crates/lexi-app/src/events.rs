use std::io::Write;

use kanal::AsyncReceiver;
use lexi_core::InteractionState;
use lexi_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::view;

/// App's main loop: applies events in arrival order and redraws on change
pub async fn event_loop(
    mut state: InteractionState,
    rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut last = state.snapshot();

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                break;
            }
            event = rx.recv() => event?,
        };

        tracing::debug!("[EVENT_LOOP] Event received: {:?}", std::mem::discriminant(&event));
        let flow = state.handle(event);

        let snapshot = state.snapshot();
        if snapshot != last {
            let mut stdout = std::io::stdout().lock();
            write!(stdout, "{}", view::render(&snapshot))?;
            stdout.flush()?;
            last = snapshot;
        }

        if flow.is_break() {
            tracing::info!("[EVENT_LOOP] Shutdown requested");
            break;
        }
    }

    state.shutdown();
    Ok(())
}

/// Apply events until `done` holds. Returns `false` if `interrupt` fires first
pub async fn run_until(
    state: &mut InteractionState,
    rx: &AsyncReceiver<AppEvent>,
    done: impl Fn(&InteractionState) -> bool,
    interrupt: impl Future<Output = ()>,
) -> anyhow::Result<bool> {
    tokio::pin!(interrupt);

    while !done(state) {
        tokio::select! {
            _ = &mut interrupt => return Ok(false),
            event = rx.recv() => {
                let _ = state.handle(event?);
            }
        }
    }
    Ok(true)
}
