//! reqwest implementation of the backend transport boundary.

mod transport;

use futures::TryStreamExt as _;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::backend::{ChatReply, DocumentFile, HistoryEntry, SyllabusBackend};
use crate::calendar::CalendarRequest;
use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::schedule::ExtractedSchedule;
use crate::stream::{AnalysisEvent, ChatEvent, EventStream};
use transport::{ByteStream, typed_event_stream};

/// HTTP transport for the Syllendar backend.
pub struct HttpBackend {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    /// Creates a transport from explicit client configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    async fn open_event_stream<E>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<EventStream<E>, ClientError>
    where
        E: DeserializeOwned + Send + 'static,
    {
        let response = check_status(send(request).await?).await?;
        if !has_event_body(&response) {
            return Err(ClientError::StreamUnavailable);
        }
        let bytes: ByteStream = Box::pin(
            response
                .bytes_stream()
                .map_err(|e| ClientError::transport(format!("stream read failed: {e}"))),
        );
        Ok(typed_event_stream(bytes))
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = check_status(send(request).await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::transport(format!("invalid response body: {e}")))
    }
}

fn chat_form(
    message: &str,
    history: &[HistoryEntry],
) -> Result<reqwest::multipart::Form, ClientError> {
    let mut form = reqwest::multipart::Form::new().text("message", message.to_string());
    if !history.is_empty() {
        let serialized = serde_json::to_string(history)
            .map_err(|e| ClientError::transport(format!("history serialization: {e}")))?;
        form = form.text("conversation_history", serialized);
    }
    Ok(form)
}

fn file_form(file: &DocumentFile) -> Result<reqwest::multipart::Form, ClientError> {
    let part = reqwest::multipart::Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.content_type)
        .map_err(|e| {
            ClientError::config(format!("invalid content type {}: {e}", file.content_type))
        })?;
    Ok(reqwest::multipart::Form::new().part("file", part))
}

async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
    request
        .send()
        .await
        .map_err(|e| ClientError::transport(format!("request failed: {e}")))
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(ClientError::api(status.as_u16(), body))
}

fn has_event_body(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/event-stream"))
}

#[async_trait::async_trait]
impl SyllabusBackend for HttpBackend {
    async fn open_analysis_stream(
        &self,
        file: &DocumentFile,
    ) -> Result<EventStream<AnalysisEvent>, ClientError> {
        debug!(file_name = %file.file_name, "opening streaming analysis request");
        let request = self
            .http
            .post(self.config.analyze_stream_url())
            .multipart(file_form(file)?);
        self.open_event_stream(request).await
    }

    async fn analyze_once(&self, file: &DocumentFile) -> Result<ExtractedSchedule, ClientError> {
        debug!(file_name = %file.file_name, "sending one-shot analysis request");
        let request = self
            .http
            .post(self.config.analyze_url())
            .multipart(file_form(file)?);
        self.fetch_json(request).await
    }

    async fn analyze_image_once(
        &self,
        file: &DocumentFile,
    ) -> Result<ExtractedSchedule, ClientError> {
        debug!(file_name = %file.file_name, "sending image analysis request");
        let request = self
            .http
            .post(self.config.analyze_image_url())
            .multipart(file_form(file)?);
        self.fetch_json(request).await
    }

    async fn open_chat_stream(
        &self,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<EventStream<ChatEvent>, ClientError> {
        debug!(history_len = history.len(), "opening streaming chat request");
        let request = self
            .http
            .post(self.config.chat_stream_url())
            .multipart(chat_form(message, history)?);
        self.open_event_stream(request).await
    }

    async fn chat_once(
        &self,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<ChatReply, ClientError> {
        debug!(history_len = history.len(), "sending one-shot chat request");
        let request = self
            .http
            .post(self.config.chat_url())
            .multipart(chat_form(message, history)?);
        self.fetch_json(request).await
    }

    async fn generate_calendar(
        &self,
        request: &CalendarRequest,
    ) -> Result<bytes::Bytes, ClientError> {
        let url = match request {
            CalendarRequest::Full(_) => self.config.calendar_url(),
            CalendarRequest::Selected { .. } => self.config.calendar_selected_url(),
        };
        let response = check_status(send(self.http.post(url).json(request)).await?).await?;
        response
            .bytes()
            .await
            .map_err(|e| ClientError::transport(format!("calendar download failed: {e}")))
    }
}
