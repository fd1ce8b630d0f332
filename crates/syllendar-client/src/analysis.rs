use futures::StreamExt as _;
use tracing::warn;

use crate::backend::{DocumentFile, SyllabusBackend};
use crate::errors::ClientError;
use crate::schedule::ExtractedSchedule;
use crate::stream::AnalysisEvent;

/// Optional per-invocation progress callbacks for the document flow.
///
/// One producer per consumer: each invocation gets its own pair of callbacks
/// rather than an emitter with unbounded listeners.
#[derive(Default)]
pub struct ProgressHooks {
    on_status: Option<Box<dyn FnMut(&str) + Send>>,
    on_progress: Option<Box<dyn FnMut(&str) + Send>>,
}

impl ProgressHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with backend status messages (`Analyzing PDF content...`) and
    /// with a notice when the controller falls back to a one-shot request,
    /// so the caller can clear any partial output already shown.
    pub fn on_status(mut self, hook: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_status = Some(Box::new(hook));
        self
    }

    /// Called with each incremental fragment of raw model output.
    pub fn on_progress(mut self, hook: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(hook));
        self
    }

    fn status(&mut self, message: &str) {
        if let Some(hook) = &mut self.on_status {
            hook(message);
        }
    }

    fn progress(&mut self, chunk: &str) {
        if let Some(hook) = &mut self.on_progress {
            hook(chunk);
        }
    }
}

/// Why a streaming attempt did not produce a schedule.
enum StreamFailure {
    /// The server delivered an explicit error verdict. Retrying the same
    /// document would reach the same verdict, so no fallback is attempted.
    Verdict(String),
    /// The attempt itself broke down (connection, missing body, truncation).
    Attempt(ClientError),
}

/// Drives one file through streaming analysis with a one-shot fallback.
///
/// Exactly one of a schedule or an `AnalysisFailed` error is produced per
/// invocation; no partial state is retained after return.
pub(crate) async fn analyze_document(
    backend: &dyn SyllabusBackend,
    file: &DocumentFile,
    mut hooks: ProgressHooks,
) -> Result<ExtractedSchedule, ClientError> {
    match stream_analysis(backend, file, &mut hooks).await {
        Ok(schedule) => Ok(schedule),
        Err(StreamFailure::Verdict(message)) => Err(ClientError::AnalysisFailed { message }),
        Err(StreamFailure::Attempt(err)) => {
            warn!(%err, "streaming analysis failed, retrying with one-shot request");
            hooks.status("Retrying analysis without streaming...");
            backend
                .analyze_once(file)
                .await
                .map_err(|fallback_err| ClientError::analysis_failed(fallback_err.to_string()))
        }
    }
}

async fn stream_analysis(
    backend: &dyn SyllabusBackend,
    file: &DocumentFile,
    hooks: &mut ProgressHooks,
) -> Result<ExtractedSchedule, StreamFailure> {
    let mut events = backend
        .open_analysis_stream(file)
        .await
        .map_err(StreamFailure::Attempt)?;

    while let Some(event) = events.next().await {
        match event {
            Ok(AnalysisEvent::Analyzing { message }) => hooks.status(&message),
            Ok(AnalysisEvent::Streaming { chunk }) => hooks.progress(&chunk),
            Ok(AnalysisEvent::Complete { data }) => return Ok(data),
            Ok(AnalysisEvent::Error { message }) => return Err(StreamFailure::Verdict(message)),
            Err(err) => return Err(StreamFailure::Attempt(err)),
        }
    }
    Err(StreamFailure::Attempt(ClientError::transport(
        "analysis stream ended without a complete event",
    )))
}

/// Routes a file to the analysis flow matching its content type.
pub(crate) async fn analyze_file(
    backend: &dyn SyllabusBackend,
    file: &DocumentFile,
    hooks: ProgressHooks,
) -> Result<ExtractedSchedule, ClientError> {
    if file.is_image() {
        backend
            .analyze_image_once(file)
            .await
            .map_err(|err| ClientError::analysis_failed(err.to_string()))
    } else if file.is_pdf() {
        analyze_document(backend, file, hooks).await
    } else {
        Err(ClientError::UnsupportedFile {
            content_type: file.content_type.clone(),
        })
    }
}
