use std::sync::Arc;

use futures::StreamExt as _;
use tracing::{debug, warn};

use crate::backend::{ChatAction, HistoryEntry, SyllabusBackend};
use crate::calendar::{CalendarFile, CalendarRequest};
use crate::errors::ClientError;
use crate::schedule::ExtractedSchedule;
use crate::stream::ChatEvent;

/// Opening assistant turn seeded into every new session.
pub const GREETING: &str = "Hi! I'm your schedule assistant. You can talk to me naturally \
about any schedule changes you need. For example, you can say 'My exam got moved to \
September 12 at 3pm' or 'Add a study session on Friday at 6pm'. What would you like to do?";

const CALENDAR_READY: &str = "Your calendar file is ready! You can download it below.";
const APOLOGY: &str = "Sorry, I'm having trouble processing your message. Please try again.";

/// Most recent turns forwarded as conversation history; the transport caps
/// the context rather than growing without bound.
const HISTORY_LIMIT: usize = 50;

/// One transcript entry.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatTurn {
    pub id: uuid::Uuid,
    pub text: String,
    pub is_user: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ChatTurn {
    fn new(text: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            text: text.into(),
            is_user,
            created_at: chrono::Utc::now(),
        }
    }

    fn user(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }
}

/// Conversational ingestion controller.
///
/// Owns its transcript and pending calendar payload; `&mut self` on
/// `send_message` keeps at most one streaming ingestion in flight per
/// session. This flow never surfaces a hard error: failures degrade to a
/// visible transcript entry instead.
pub struct ChatSession {
    backend: Arc<dyn SyllabusBackend>,
    transcript: Vec<ChatTurn>,
    pending_calendar: Option<ExtractedSchedule>,
}

impl ChatSession {
    pub(crate) fn new(backend: Arc<dyn SyllabusBackend>) -> Self {
        Self {
            backend,
            transcript: vec![ChatTurn::assistant(GREETING)],
            pending_calendar: None,
        }
    }

    /// The conversation so far, oldest turn first.
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Calendar payload produced by the assistant, if one is awaiting
    /// download.
    pub fn pending_calendar(&self) -> Option<&ExtractedSchedule> {
        self.pending_calendar.as_ref()
    }

    /// Sends one user message and updates the transcript as the reply
    /// streams in.
    ///
    /// The user turn is appended synchronously before any network call; an
    /// empty placeholder assistant turn follows it and is progressively
    /// filled with the streamed reply. On stream failure the one-shot chat
    /// endpoint is tried, and if that fails too the placeholder becomes a
    /// fixed apology turn.
    pub async fn send_message(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.pending_calendar = None;
        let history = self.history_entries();
        self.transcript.push(ChatTurn::user(text));
        let placeholder = self.transcript.len();
        self.transcript.push(ChatTurn::assistant(""));

        if let Err(err) = self.stream_reply(text, &history, placeholder).await {
            warn!(%err, "streaming chat failed, retrying with one-shot request");
            match self.backend.chat_once(text, &history).await {
                Ok(reply) => {
                    // Replace, not append: the placeholder may hold a partial
                    // fragment from the failed stream.
                    self.transcript[placeholder].text = reply.response;
                    if reply.action == ChatAction::GenerateIcs
                        && let Some(payload) = reply.ics_data
                    {
                        self.store_pending(payload);
                    }
                }
                Err(fallback_err) => {
                    warn!(%fallback_err, "one-shot chat failed, degrading to apology turn");
                    self.transcript[placeholder].text = APOLOGY.to_string();
                }
            }
        }
    }

    /// Generates the pending calendar file and clears the payload on
    /// success. Returns `Ok(None)` when nothing is pending.
    pub async fn download_pending_calendar(&mut self) -> Result<Option<CalendarFile>, ClientError> {
        let Some(payload) = self.pending_calendar.clone() else {
            return Ok(None);
        };
        let request = CalendarRequest::Full(payload);
        let bytes = self.backend.generate_calendar(&request).await?;
        self.pending_calendar = None;
        Ok(Some(CalendarFile::new(request.file_name(), bytes)))
    }

    async fn stream_reply(
        &mut self,
        message: &str,
        history: &[HistoryEntry],
        placeholder: usize,
    ) -> Result<(), ClientError> {
        let mut events = self.backend.open_chat_stream(message, history).await?;
        let mut accumulated = String::new();
        while let Some(event) = events.next().await {
            match event? {
                ChatEvent::Chunk { chunk } => {
                    accumulated.push_str(&chunk);
                    self.transcript[placeholder].text.clone_from(&accumulated);
                }
                ChatEvent::Calendar { ics_data } => self.store_pending(ics_data),
                ChatEvent::Done { .. } => {
                    debug!(reply_len = accumulated.len(), "chat stream completed");
                    return Ok(());
                }
                ChatEvent::Error { error } => {
                    return Err(ClientError::transport(format!("chat stream error: {error}")));
                }
            }
        }
        // A clean end-of-body without a `done` marker is treated as normal
        // completion; the accumulated reply stands.
        Ok(())
    }

    fn store_pending(&mut self, payload: ExtractedSchedule) {
        self.pending_calendar = Some(payload);
        self.transcript.push(ChatTurn::assistant(CALENDAR_READY));
    }

    fn history_entries(&self) -> Vec<HistoryEntry> {
        let skip = self.transcript.len().saturating_sub(HISTORY_LIMIT);
        self.transcript[skip..]
            .iter()
            .map(|turn| HistoryEntry {
                text: turn.text.clone(),
                is_user: turn.is_user,
                timestamp: turn.created_at,
            })
            .collect()
    }
}
