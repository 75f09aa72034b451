//! Per-event derived attributes.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use crate::emoji::{EmojiLexicon, describe_all, extract_emojis};
use crate::event::Event;
use crate::reconstruct::Message;

/// Placeholder the export writes in place of attachments.
pub const MEDIA_MARKER: &str = "<Media omitted>";

const LINK_PREFIXES: [&str; 2] = ["http://", "https://"];

/// English weekday names, independent of the host locale.
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn has_media(text: &str) -> bool {
    text.contains(MEDIA_MARKER)
}

pub fn has_link(text: &str) -> bool {
    LINK_PREFIXES.iter().any(|prefix| text.contains(prefix))
}

/// Whole minutes between two timestamps, truncated toward zero.
pub fn gap_minutes(previous: NaiveDateTime, current: NaiveDateTime) -> i64 {
    (current - previous).num_minutes()
}

/// Attaches content, calendar and gap fields to every message.
///
/// Messages must already be in `id` order. Session ids are left at zero.
pub fn annotate<L: EmojiLexicon + ?Sized>(messages: Vec<Message>, lexicon: &L) -> Vec<Event> {
    let mut previous: Option<NaiveDateTime> = None;
    messages
        .into_iter()
        .map(|message| {
            let gap = previous.map(|prev| gap_minutes(prev, message.timestamp));
            previous = Some(message.timestamp);
            annotate_one(message, gap, lexicon)
        })
        .collect()
}

fn annotate_one<L: EmojiLexicon + ?Sized>(
    message: Message,
    gap_minutes: Option<i64>,
    lexicon: &L,
) -> Event {
    let emoji_glyphs = extract_emojis(&message.text, lexicon);
    let emoji_labels = describe_all(&emoji_glyphs, lexicon);
    Event {
        id: message.id,
        timestamp: message.timestamp,
        has_media: has_media(&message.text),
        has_link: has_link(&message.text),
        emoji_glyphs,
        emoji_labels,
        date: message.timestamp.date(),
        hour: message.timestamp.hour(),
        weekday: weekday_name(message.timestamp.weekday()).to_string(),
        gap_minutes,
        session_id_short: 0,
        session_id_long: 0,
        author: message.author,
        text: message.text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    use crate::emoji::UnicodeLexicon;
    use crate::types::EventId;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid test timestamp")
    }

    fn message(id: u32, timestamp: NaiveDateTime, text: &str) -> Message {
        Message {
            id: EventId::new(id),
            timestamp,
            author: "Alice".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn media_marker_is_case_sensitive() {
        assert!(has_media("<Media omitted>"));
        assert!(has_media("look <Media omitted> here"));
        assert!(!has_media("<media omitted>"));
    }

    #[test]
    fn link_detection_requires_scheme() {
        assert!(has_link("see https://example.com"));
        assert!(has_link("http://example.com"));
        assert!(!has_link("www.example.com"));
        assert!(!has_link("HTTPS://EXAMPLE.COM"));
    }

    #[test]
    fn first_event_has_no_gap() {
        let events = annotate(
            vec![message(0, at(2, 9, 0), "hi"), message(1, at(2, 13, 5), "yo")],
            &UnicodeLexicon,
        );
        assert_eq!(events[0].gap_minutes, None);
        assert_eq!(events[1].gap_minutes, Some(245));
    }

    #[test]
    fn gap_can_be_negative_for_out_of_order_exports() {
        let events = annotate(
            vec![message(0, at(2, 10, 0), "a"), message(1, at(2, 9, 30), "b")],
            &UnicodeLexicon,
        );
        assert_eq!(events[1].gap_minutes, Some(-30));
    }

    #[test]
    fn calendar_fields_project_timestamp() {
        let events = annotate(vec![message(0, at(4, 23, 59), "late")], &UnicodeLexicon);
        let event = &events[0];
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2020, 1, 4).unwrap());
        assert_eq!(event.hour, 23);
        assert_eq!(event.weekday, "Saturday");
    }

    #[test]
    fn emoji_fields_are_parallel() {
        let events = annotate(
            vec![message(0, at(2, 9, 0), "yo 😀 🎉 😀")],
            &UnicodeLexicon,
        );
        let event = &events[0];
        assert_eq!(event.emoji_glyphs, vec!["😀", "🎉", "😀"]);
        assert_eq!(event.emoji_labels.len(), 3);
        assert_eq!(event.emoji_labels[0], ":grinning_face:");
        assert_eq!(event.emoji_labels[0], event.emoji_labels[2]);
    }

    #[test]
    fn session_ids_start_unassigned() {
        let events = annotate(vec![message(0, at(2, 9, 0), "hi")], &UnicodeLexicon);
        assert_eq!(events[0].session_id_short, 0);
        assert_eq!(events[0].session_id_long, 0);
    }

    #[test]
    fn weekday_names_are_english() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }
}
