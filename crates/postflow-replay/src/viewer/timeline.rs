//! Viewer Timeline - Timeline building and event summarization

use super::types::truncate;
use crate::event::{AuditEvent, TimelineEntry};
use chrono::{DateTime, Utc};

pub(super) fn build_timeline(events: &[AuditEvent]) -> Vec<TimelineEntry> {
    let mut previous: Option<DateTime<Utc>> = None;
    events
        .iter()
        .map(|event| {
            let elapsed_ms = previous.map(|prev| (event.timestamp - prev).num_milliseconds());
            previous = Some(event.timestamp);

            TimelineEntry {
                event_id: event.id,
                sequence_num: event.sequence_num,
                timestamp: event.timestamp,
                event_type: event.event_type,
                summary: summarize_event(event),
                elapsed_ms,
            }
        })
        .collect()
}

fn summarize_event(event: &AuditEvent) -> String {
    let stage = event
        .metadata
        .as_ref()
        .and_then(|m| m.get("stage"))
        .and_then(|v| v.as_str());

    match stage {
        Some(stage) if event.is_error() => format!("[{}] {}", stage, truncate(&event.content, 80)),
        _ => truncate(&event.content, 80),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AuditEventType;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn test_elapsed_between_events() {
        let session_id = Uuid::new_v4();
        let first = AuditEvent::new(session_id, 1, AuditEventType::UserAction, "Input received");
        let mut second = AuditEvent::new(session_id, 2, AuditEventType::System, "Articles fetched");
        second.timestamp = first.timestamp + Duration::milliseconds(250);

        let timeline = build_timeline(&[first, second]);
        assert_eq!(timeline[0].elapsed_ms, None);
        assert_eq!(timeline[1].elapsed_ms, Some(250));
        assert_eq!(timeline[1].sequence_num, 2);
    }
}
