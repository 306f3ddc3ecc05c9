pub mod events;
pub mod types;

pub use events::{
    AppEvent, CaptureErrorReason, CaptureEvent, CaptureEventKind, PlaybackEvent, SessionId,
};
pub use types::{Definition, LookupFailure, LookupOutcome, LookupResult, Meaning, Pronunciation};
