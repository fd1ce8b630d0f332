use crate::calendar::CalendarRequest;
use crate::errors::ClientError;
use crate::schedule::ExtractedSchedule;
use crate::stream::{AnalysisEvent, ChatEvent, EventStream};

/// A file handed to the analysis flow.
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentFile {
    /// Original file name, forwarded in the multipart upload.
    pub file_name: String,
    /// MIME content type used to route the file to an analysis flow.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    /// Creates a file with an explicit content type.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Creates a PDF document.
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(file_name, "application/pdf", bytes)
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == "application/pdf"
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Prior conversation turn as serialized for the chat endpoints.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    #[serde(rename = "isUser")]
    pub is_user: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// What the assistant decided to do with a message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatAction {
    #[default]
    Chat,
    GenerateIcs,
}

/// Response of the one-shot (non-streaming) chat endpoint.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub action: ChatAction,
    pub response: String,
    #[serde(default)]
    pub ics_data: Option<ExtractedSchedule>,
}

/// Transport boundary between the ingestion controllers and the backend.
///
/// The production implementation is `http::HttpBackend`; tests substitute
/// in-memory fakes so controller sequencing can be exercised without a
/// network.
#[async_trait::async_trait]
pub trait SyllabusBackend: Send + Sync {
    /// Opens the streaming document analysis request.
    async fn open_analysis_stream(
        &self,
        file: &DocumentFile,
    ) -> Result<EventStream<AnalysisEvent>, ClientError>;

    /// One-shot document analysis, used as the streaming fallback.
    async fn analyze_once(&self, file: &DocumentFile) -> Result<ExtractedSchedule, ClientError>;

    /// One-shot image analysis via the vision endpoint.
    async fn analyze_image_once(
        &self,
        file: &DocumentFile,
    ) -> Result<ExtractedSchedule, ClientError>;

    /// Opens the streaming chat request.
    async fn open_chat_stream(
        &self,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<EventStream<ChatEvent>, ClientError>;

    /// One-shot chat, used as the streaming fallback.
    async fn chat_once(
        &self,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<ChatReply, ClientError>;

    /// Generates a calendar file and returns its raw bytes.
    async fn generate_calendar(
        &self,
        request: &CalendarRequest,
    ) -> Result<bytes::Bytes, ClientError>;
}
