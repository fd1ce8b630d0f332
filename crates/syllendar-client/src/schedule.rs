/// Structured schedule extracted from a syllabus by the analysis backend.
///
/// Immutable once received; the caller owns it for the duration of the
/// review step.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtractedSchedule {
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub course_code: String,
    /// Course events in the order the backend produced them.
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// A single course event (lecture, exam, assignment deadline, ...).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventRecord {
    pub title: String,
    /// ISO 8601 local datetime, as produced by the backend.
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Recurrence keyword understood by the calendar generator (`weekly`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<String>,
    /// Weekdays a recurring event falls on, in schedule order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<Weekday>>,
}

/// Weekday names as exchanged with the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_deserializes_with_optional_fields_missing() {
        let json = serde_json::json!({
            "course_name": "Operating Systems",
            "course_code": "CS-350",
            "events": [
                {
                    "title": "Midterm",
                    "start_time": "2026-10-12T14:00:00",
                    "end_time": "2026-10-12T16:00:00"
                }
            ]
        });
        let schedule: ExtractedSchedule = serde_json::from_value(json).expect("schedule");
        assert_eq!(schedule.events.len(), 1);
        assert_eq!(schedule.events[0].title, "Midterm");
        assert!(schedule.events[0].location.is_none());
    }

    #[test]
    fn weekdays_round_trip_with_full_names() {
        let record = EventRecord {
            title: "Lecture".into(),
            start_time: "2026-09-01T10:00:00".into(),
            end_time: "2026-09-01T11:30:00".into(),
            recurrence: Some("weekly".into()),
            days: Some(vec![Weekday::Monday, Weekday::Wednesday]),
            ..EventRecord::default()
        };
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(
            value.get("days"),
            Some(&serde_json::json!(["Monday", "Wednesday"]))
        );
        assert!(value.get("location").is_none());
    }
}
