use std::pin::Pin;

use crate::errors::ClientError;
use crate::schedule::ExtractedSchedule;

/// Lazy, single-pass sequence of typed events decoded from a chunked
/// response body.
///
/// The sequence ends when the underlying body ends; controllers stop
/// consuming (and drop the stream) as soon as they observe a terminal event.
pub type EventStream<E> =
    Pin<Box<dyn futures::Stream<Item = Result<E, ClientError>> + Send + 'static>>;

/// Event produced by the streaming document analysis endpoint.
///
/// Classified at the decoder boundary from the `status` discriminator field,
/// so no downstream code inspects raw JSON again.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisEvent {
    /// The backend accepted the document and started working on it.
    Analyzing {
        #[serde(default)]
        message: String,
    },
    /// Incremental fragment of the model's raw output.
    Streaming { chunk: String },
    /// Terminal success carrying the structured result.
    Complete { data: ExtractedSchedule },
    /// Terminal server-side failure verdict.
    Error {
        #[serde(default)]
        message: String,
    },
}

impl AnalysisEvent {
    /// Whether no further events are expected after this one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

/// Event produced by the streaming chat endpoint.
///
/// The chat wire format has no discriminator; events are classified by field
/// presence, with `chunk` taking priority over `ics_data` and `done` (the
/// same precedence the backend emits them with).
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum ChatEvent {
    /// Incremental fragment of the assistant's reply text.
    Chunk { chunk: String },
    /// The assistant produced a generable calendar payload.
    Calendar { ics_data: ExtractedSchedule },
    /// Terminal marker with no payload.
    Done { done: bool },
    /// Mid-stream failure reported by the backend.
    Error { error: String },
}
