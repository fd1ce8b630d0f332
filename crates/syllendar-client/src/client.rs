use std::sync::Arc;

use crate::analysis::{self, ProgressHooks};
use crate::backend::{DocumentFile, SyllabusBackend};
use crate::calendar::{CalendarFile, CalendarRequest};
use crate::chat::ChatSession;
use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::http::HttpBackend;
use crate::schedule::{EventRecord, ExtractedSchedule};

/// Entry point for the Syllendar backend client.
#[derive(Clone)]
pub struct SyllabusClient {
    backend: Arc<dyn SyllabusBackend>,
}

impl SyllabusClient {
    /// Creates a client from explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            backend: Arc::new(HttpBackend::new(config)?),
        })
    }

    /// Creates a client configured from the environment.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env())
    }

    /// Creates a client over a custom transport (used by tests).
    pub fn with_backend(backend: Arc<dyn SyllabusBackend>) -> Self {
        Self { backend }
    }

    /// Analyzes a syllabus file, routing by content type: images go to the
    /// one-shot vision endpoint, PDFs through the streaming flow with its
    /// one-shot fallback.
    pub async fn analyze_file(
        &self,
        file: &DocumentFile,
        hooks: ProgressHooks,
    ) -> Result<ExtractedSchedule, ClientError> {
        analysis::analyze_file(self.backend.as_ref(), file, hooks).await
    }

    /// Streams a PDF through analysis, reporting progress through `hooks`
    /// and falling back to the one-shot endpoint on stream failure.
    pub async fn analyze_document(
        &self,
        file: &DocumentFile,
        hooks: ProgressHooks,
    ) -> Result<ExtractedSchedule, ClientError> {
        analysis::analyze_document(self.backend.as_ref(), file, hooks).await
    }

    /// Starts a new assistant conversation.
    pub fn chat_session(&self) -> ChatSession {
        ChatSession::new(self.backend.clone())
    }

    /// Generates a calendar file from a full extracted schedule.
    pub async fn generate_calendar(
        &self,
        schedule: &ExtractedSchedule,
    ) -> Result<CalendarFile, ClientError> {
        let request = CalendarRequest::Full(schedule.clone());
        let bytes = self.backend.generate_calendar(&request).await?;
        Ok(CalendarFile::new(request.file_name(), bytes))
    }

    /// Generates a calendar file from the events the user kept during
    /// review.
    pub async fn generate_calendar_selected(
        &self,
        course_name: &str,
        course_code: &str,
        selected_events: &[EventRecord],
    ) -> Result<CalendarFile, ClientError> {
        let request = CalendarRequest::Selected {
            course_name: course_name.to_string(),
            course_code: course_code.to_string(),
            selected_events: selected_events.to_vec(),
        };
        let bytes = self.backend.generate_calendar(&request).await?;
        Ok(CalendarFile::new(request.file_name(), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ChatReply, HistoryEntry};
    use crate::stream::{AnalysisEvent, ChatEvent, EventStream};
    use std::sync::Mutex;

    struct RecordingBackend {
        calendar_requests: Mutex<Vec<CalendarRequest>>,
    }

    #[async_trait::async_trait]
    impl SyllabusBackend for RecordingBackend {
        async fn open_analysis_stream(
            &self,
            _file: &DocumentFile,
        ) -> Result<EventStream<AnalysisEvent>, ClientError> {
            unreachable!("not used in client tests")
        }

        async fn analyze_once(
            &self,
            _file: &DocumentFile,
        ) -> Result<ExtractedSchedule, ClientError> {
            unreachable!("not used in client tests")
        }

        async fn analyze_image_once(
            &self,
            _file: &DocumentFile,
        ) -> Result<ExtractedSchedule, ClientError> {
            unreachable!("not used in client tests")
        }

        async fn open_chat_stream(
            &self,
            _message: &str,
            _history: &[HistoryEntry],
        ) -> Result<EventStream<ChatEvent>, ClientError> {
            unreachable!("not used in client tests")
        }

        async fn chat_once(
            &self,
            _message: &str,
            _history: &[HistoryEntry],
        ) -> Result<ChatReply, ClientError> {
            unreachable!("not used in client tests")
        }

        async fn generate_calendar(
            &self,
            request: &CalendarRequest,
        ) -> Result<bytes::Bytes, ClientError> {
            self.calendar_requests
                .lock()
                .expect("lock")
                .push(request.clone());
            Ok(bytes::Bytes::from_static(b"BEGIN:VCALENDAR"))
        }
    }

    #[tokio::test]
    async fn calendar_variants_target_their_file_names() {
        let backend = Arc::new(RecordingBackend {
            calendar_requests: Mutex::new(Vec::new()),
        });
        let client = SyllabusClient::with_backend(backend.clone());

        let schedule = ExtractedSchedule {
            course_name: "OS".into(),
            course_code: "CS-350".into(),
            events: vec![],
        };
        let full = client.generate_calendar(&schedule).await.expect("full");
        assert_eq!(full.file_name, "schedule.ics");

        let selected = client
            .generate_calendar_selected("OS", "CS-350", &[])
            .await
            .expect("selected");
        assert_eq!(selected.file_name, "selected_events.ics");

        let requests = backend.calendar_requests.lock().expect("lock");
        assert!(matches!(requests[0], CalendarRequest::Full(_)));
        assert!(matches!(requests[1], CalendarRequest::Selected { .. }));
    }
}
