//! Client for the Syllendar academic-planning backend.
//!
//! Uploads a syllabus, streams the AI analysis of it into a structured
//! schedule, converses with the schedule assistant, and turns either result
//! into a downloadable `.ics` calendar file. Streaming endpoints deliver
//! `data: <json>`-prefixed lines over a chunked body; both flows fall back
//! to one-shot requests when a stream breaks down.
//!
//! # Analyzing a syllabus
//!
//! ```no_run
//! use syllendar_client::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ClientError> {
//! let client = SyllabusClient::from_env()?;
//! let file = DocumentFile::pdf("syllabus.pdf", std::fs::read("syllabus.pdf").unwrap());
//!
//! let schedule = client
//!     .analyze_file(
//!         &file,
//!         ProgressHooks::new().on_status(|message| println!("{message}")),
//!     )
//!     .await?;
//!
//! let calendar = client.generate_calendar(&schedule).await?;
//! std::fs::write(&calendar.file_name, &calendar.bytes).unwrap();
//! # Ok(())
//! # }
//! ```

/// Document analysis ingestion controller and progress hooks.
pub mod analysis;
/// Transport boundary trait and request/response shapes.
pub mod backend;
/// Calendar-file request and payload types.
pub mod calendar;
/// Conversational ingestion controller and transcript types.
pub mod chat;
/// Client entry point.
pub mod client;
/// Explicitly injected client configuration.
pub mod config;
/// Public error types.
pub mod errors;
/// reqwest transport implementation.
pub mod http;
/// Once-per-process tracing setup.
pub mod observability;
/// Common imports for typical usage.
pub mod prelude;
/// Structured schedule data model.
pub mod schedule;
/// Typed stream events decoded from chunked responses.
pub mod stream;

pub use analysis::ProgressHooks;
pub use backend::{ChatAction, ChatReply, DocumentFile, HistoryEntry, SyllabusBackend};
pub use calendar::{CalendarFile, CalendarRequest};
pub use chat::{ChatSession, ChatTurn, GREETING};
pub use client::SyllabusClient;
pub use config::ClientConfig;
pub use errors::ClientError;
pub use http::HttpBackend;
pub use observability::init_observability;
pub use schedule::{EventRecord, ExtractedSchedule, Weekday};
pub use stream::{AnalysisEvent, ChatEvent, EventStream};
