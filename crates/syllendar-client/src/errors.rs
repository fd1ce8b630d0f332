/// Errors surfaced by the Syllendar client API.
///
/// Per-line decode failures inside an active stream are never represented
/// here; they are logged and skipped at the decoder boundary. Stream-level
/// failures in the document flow trigger the one-shot fallback first, so
/// callers only ever see `AnalysisFailed` after both attempts are exhausted
/// (or after the server returned an explicit error verdict).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Invalid client configuration or request construction input.
    #[error("config error: {0}")]
    Config(String),
    /// Network or stream I/O failed.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// The backend answered with a non-success HTTP status.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// A streaming endpoint produced a response without a readable event body.
    #[error("response stream unavailable")]
    StreamUnavailable,
    /// The uploaded file's content type is not handled by any analysis flow.
    #[error("unsupported file type: {content_type}")]
    UnsupportedFile { content_type: String },
    /// Terminal failure of the document analysis flow.
    #[error("analysis failed: {message}")]
    AnalysisFailed { message: String },
}

impl ClientError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a transport-level error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an API-status error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a terminal analysis failure.
    pub fn analysis_failed(message: impl Into<String>) -> Self {
        Self::AnalysisFailed {
            message: message.into(),
        }
    }

    /// Returns the human-readable message for this error.
    pub fn message(&self) -> &str {
        match self {
            Self::Config(message) => message,
            Self::Transport { message }
            | Self::Api { message, .. }
            | Self::AnalysisFailed { message } => message,
            Self::StreamUnavailable => "response stream unavailable",
            Self::UnsupportedFile { content_type } => content_type,
        }
    }
}
