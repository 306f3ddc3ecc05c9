pub mod capture;
pub mod cue;
pub mod error;
pub mod lookup;
pub mod normalize;
pub mod playback;
pub mod sink;
pub mod state;


pub use capture::{
    CaptureHandle, CaptureOptions, CapturePhase, SpeechRecognizer, VoiceCaptureController,
};
pub use cue::{AudioCueController, AudioPlayer};
pub use error::{AppError, AudioError, CaptureError, ClientError, SynthesisError};
pub use lookup::{DictionaryLookup, LookupClient};
pub use playback::{PlaybackHandle, SpeechPlaybackController, SpeechSynthesizer};
pub use sink::EventSink;
pub use state::{InteractionState, StateSnapshot};
