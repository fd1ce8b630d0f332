//! Common imports for typical client usage.
//!
//! This module intentionally exports the most frequently used types so
//! examples and application code need fewer import lines.
pub use crate::{
    CalendarFile, ChatSession, ChatTurn, ClientConfig, ClientError, DocumentFile, EventRecord,
    ExtractedSchedule, ProgressHooks, SyllabusClient,
};
