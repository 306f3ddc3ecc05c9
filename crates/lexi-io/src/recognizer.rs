//! Speech recognition through an external program.
//!
//! The program records one utterance and prints the transcript on stdout.
//! The locale is passed in `LEXI_LOCALE`. Exit codes:
//! - `0`: success, stdout holds the transcript
//! - `1`: nothing recognized
//! - `77`: microphone permission denied
//! - anything else: device failure, stderr holds the detail
//!
//! The program has no graceful stop channel, so a stop kills it and reports
//! the session as ended without a result.

use std::process::{ExitStatus, Stdio};

use lexi_core::{CaptureError, CaptureHandle, CaptureOptions, EventSink, SpeechRecognizer};
use lexi_types::{AppEvent, CaptureErrorReason, CaptureEvent, CaptureEventKind, SessionId};
use tokio::process::Child;
use tokio_util::sync::CancellationToken;

use crate::process::{CommandLine, kill, read_pipe};

const EXIT_NO_MATCH: i32 = 1;
const EXIT_NO_PERMISSION: i32 = 77;

/// Used when no recognizer is configured
pub struct UnsupportedRecognizer;

impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    fn start(
        &self,
        _session: SessionId,
        _options: &CaptureOptions,
        _sink: EventSink,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        Err(CaptureError::Unavailable)
    }
}

pub struct CommandRecognizer {
    command: CommandLine,
}

impl CommandRecognizer {
    pub fn new(parts: &[String]) -> Self {
        Self {
            command: CommandLine::new(parts),
        }
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn is_available(&self) -> bool {
        !self.command.program.is_empty()
    }

    fn start(
        &self,
        session: SessionId,
        options: &CaptureOptions,
        sink: EventSink,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        let child = self
            .command
            .command()
            .env("LEXI_LOCALE", &options.locale)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CaptureError::Start(format!("{}: {}", self.command.program, e)))?;

        tracing::debug!(%session, program = %self.command.program, "Recognizer started");

        let stop = CancellationToken::new();
        let abort = CancellationToken::new();
        tokio::spawn(run_session(session, child, stop.clone(), abort.clone(), sink));

        Ok(Box::new(CommandCaptureHandle { stop, abort }))
    }
}

struct CommandCaptureHandle {
    stop: CancellationToken,
    abort: CancellationToken,
}

impl CaptureHandle for CommandCaptureHandle {
    fn stop(&mut self) {
        self.stop.cancel();
    }

    fn abort(&mut self) {
        self.abort.cancel();
    }
}

async fn run_session(
    session: SessionId,
    mut child: Child,
    stop: CancellationToken,
    abort: CancellationToken,
    sink: EventSink,
) {
    let stdout = tokio::spawn(read_pipe(child.stdout.take()));
    let stderr = tokio::spawn(read_pipe(child.stderr.take()));

    let status = tokio::select! {
        status = child.wait() => status,
        _ = abort.cancelled() => {
            kill(&mut child).await;
            tracing::debug!(%session, "Recognizer aborted");
            return;
        }
        _ = stop.cancelled() => {
            kill(&mut child).await;
            tracing::debug!(%session, "Recognizer stopped");
            sink.emit(AppEvent::Capture(CaptureEvent {
                session,
                kind: CaptureEventKind::End,
            }));
            return;
        }
    };

    let kind = match status {
        Ok(status) if status.success() => {
            CaptureEventKind::Transcript(stdout.await.unwrap_or_default())
        }
        Ok(status) => {
            let detail = stderr.await.unwrap_or_default();
            CaptureEventKind::Error(classify_exit(status, detail.trim()))
        }
        Err(e) => CaptureEventKind::Error(CaptureErrorReason::Device(e.to_string())),
    };

    sink.emit(AppEvent::Capture(CaptureEvent { session, kind }));
}

fn classify_exit(status: ExitStatus, detail: &str) -> CaptureErrorReason {
    match status.code() {
        Some(EXIT_NO_MATCH) => CaptureErrorReason::NoMatch,
        Some(EXIT_NO_PERMISSION) => CaptureErrorReason::PermissionDenied,
        _ if detail.is_empty() => CaptureErrorReason::Device(status.to_string()),
        _ => CaptureErrorReason::Device(detail.to_string()),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use kanal::AsyncReceiver;
    use tokio::time::timeout;

    use super::*;

    fn sh(script: &str) -> CommandRecognizer {
        CommandRecognizer::new(&["sh".to_string(), "-c".to_string(), script.to_string()])
    }

    fn sink() -> (EventSink, AsyncReceiver<AppEvent>) {
        let (tx, rx) = kanal::unbounded_async();
        (EventSink::new(tx), rx)
    }

    async fn capture_kind(rx: &AsyncReceiver<AppEvent>, session: SessionId) -> CaptureEventKind {
        let event = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out")
            .expect("channel closed");
        match event {
            AppEvent::Capture(event) => {
                assert_eq!(event.session, session);
                event.kind
            }
            other => panic!("Unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn transcript_comes_from_stdout() {
        let (sink, rx) = sink();
        let session = SessionId::new_v4();
        let _handle = sh("echo \"$LEXI_LOCALE hello\"")
            .start(session, &CaptureOptions::single_utterance("en-US"), sink)
            .unwrap();

        assert_eq!(
            capture_kind(&rx, session).await,
            CaptureEventKind::Transcript("en-US hello\n".to_string())
        );
    }

    #[tokio::test]
    async fn exit_codes_map_to_reasons() {
        let (sink, rx) = sink();
        let options = CaptureOptions::single_utterance("en-US");

        let session = SessionId::new_v4();
        let _a = sh("exit 1").start(session, &options, sink.clone()).unwrap();
        assert_eq!(
            capture_kind(&rx, session).await,
            CaptureEventKind::Error(CaptureErrorReason::NoMatch)
        );

        let session = SessionId::new_v4();
        let _b = sh("exit 77").start(session, &options, sink.clone()).unwrap();
        assert_eq!(
            capture_kind(&rx, session).await,
            CaptureEventKind::Error(CaptureErrorReason::PermissionDenied)
        );

        let session = SessionId::new_v4();
        let _c = sh("echo 'no input device' >&2; exit 3")
            .start(session, &options, sink)
            .unwrap();
        assert_eq!(
            capture_kind(&rx, session).await,
            CaptureEventKind::Error(CaptureErrorReason::Device("no input device".to_string()))
        );
    }

    #[tokio::test]
    async fn stop_kills_and_reports_end() {
        let (sink, rx) = sink();
        let session = SessionId::new_v4();
        let mut handle = sh("sleep 30")
            .start(session, &CaptureOptions::single_utterance("en-US"), sink)
            .unwrap();

        handle.stop();
        assert_eq!(capture_kind(&rx, session).await, CaptureEventKind::End);
    }

    #[tokio::test]
    async fn abort_is_silent() {
        let (sink, rx) = sink();
        let session = SessionId::new_v4();
        let mut handle = sh("sleep 30")
            .start(session, &CaptureOptions::single_utterance("en-US"), sink)
            .unwrap();

        handle.abort();
        // The channel closes once the session task exits; either way no event arrives
        if let Ok(Ok(event)) = timeout(Duration::from_millis(300), rx.recv()).await {
            panic!("abort must not emit events, got {event:?}");
        }
    }

    #[tokio::test]
    async fn missing_program_fails_to_start() {
        let (sink, _rx) = sink();
        let result = CommandRecognizer::new(&["lexi-no-such-recognizer".to_string()]).start(
            SessionId::new_v4(),
            &CaptureOptions::single_utterance("en-US"),
            sink,
        );
        assert!(matches!(result, Err(CaptureError::Start(_))));
    }

    #[test]
    fn unsupported_recognizer_is_unavailable() {
        assert!(!UnsupportedRecognizer.is_available());
    }
}
