use crate::schedule::{EventRecord, ExtractedSchedule};

pub(crate) const SCHEDULE_FILE_NAME: &str = "schedule.ics";
pub(crate) const SELECTED_FILE_NAME: &str = "selected_events.ics";

/// Body of a calendar-generation request.
///
/// The two variants target different endpoints: a full schedule goes to the
/// plain generator, a user-curated selection to the selected-events one.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CalendarRequest {
    /// Every extracted event.
    Full(ExtractedSchedule),
    /// Only the events the user kept during review.
    Selected {
        course_name: String,
        course_code: String,
        selected_events: Vec<EventRecord>,
    },
}

impl CalendarRequest {
    /// Suggested download name for the generated file.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Full(_) => SCHEDULE_FILE_NAME,
            Self::Selected { .. } => SELECTED_FILE_NAME,
        }
    }
}

/// An opaque `.ics` payload ready to be offered to the user as a download.
#[derive(Clone, Debug, PartialEq)]
pub struct CalendarFile {
    /// Suggested file name (`schedule.ics` or `selected_events.ics`).
    pub file_name: String,
    pub bytes: bytes::Bytes,
}

impl CalendarFile {
    pub(crate) fn new(file_name: &str, bytes: bytes::Bytes) -> Self {
        Self {
            file_name: file_name.to_string(),
            bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_request_serializes_as_the_schedule_itself() {
        let schedule = ExtractedSchedule {
            course_name: "OS".into(),
            course_code: "CS-350".into(),
            events: vec![],
        };
        let value = serde_json::to_value(CalendarRequest::Full(schedule)).expect("serialize");
        assert_eq!(value.get("course_name"), Some(&serde_json::json!("OS")));
        assert!(value.get("events").is_some());
        assert!(value.get("selected_events").is_none());
    }

    #[test]
    fn selected_request_uses_selected_events_key_and_name() {
        let request = CalendarRequest::Selected {
            course_name: "OS".into(),
            course_code: "CS-350".into(),
            selected_events: vec![EventRecord {
                title: "Midterm".into(),
                start_time: "2026-10-12T14:00:00".into(),
                end_time: "2026-10-12T16:00:00".into(),
                ..EventRecord::default()
            }],
        };
        assert_eq!(request.file_name(), "selected_events.ics");
        let value = serde_json::to_value(&request).expect("serialize");
        assert!(value.get("selected_events").is_some());
        assert!(value.get("events").is_none());
    }
}
