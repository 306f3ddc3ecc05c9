use std::sync::Arc;

use lexi_config::Config;
use lexi_core::{
    AudioCueController, CaptureOptions, EventSink, InteractionState, LookupClient,
    SpeechPlaybackController, VoiceCaptureController,
};
use lexi_io::Engines;

/// Wire the lookup client and platform engines into a fresh interaction state
pub fn build_state(config: &Config, sink: EventSink) -> anyhow::Result<InteractionState> {
    let lookup = LookupClient::new(&config.lookup)?;
    let engines = Engines::from_config(config);

    tracing::info!("Dictionary endpoint: {}", config.lookup.endpoint);

    Ok(InteractionState::new(
        Arc::new(lookup),
        VoiceCaptureController::new(
            engines.recognizer,
            CaptureOptions::single_utterance(config.voice.locale.clone()),
            sink.clone(),
        ),
        SpeechPlaybackController::new(engines.synthesizer, sink.clone()),
        AudioCueController::new(engines.player, sink.clone()),
        sink,
    ))
}
