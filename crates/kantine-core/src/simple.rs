//! Deterministic menu extraction.
//!
//! Announcement bodies are written as paragraphs separated by blank lines: a
//! paragraph holding only a day name starts that day, and each following
//! paragraph is one dish. This extractor never fails; it is the safety net
//! behind the AI-assisted parser.

use crate::menu::{DayMenu, Weekday};

/// Paragraph separator in announcement bodies.
const PARAGRAPH: &str = "\n\n";

/// Split an announcement body into dishes per day.
///
/// Paragraphs before the first day marker (opening hours, greetings) are
/// dropped. A day heading that appears again starts that day over. Dishes
/// are trimmed at both ends; inner whitespace is kept as-is.
pub fn parse_simple(text: &str) -> DayMenu {
    let mut menu = DayMenu::empty();
    let mut current: Option<Weekday> = None;

    for segment in text.split(PARAGRAPH) {
        let segment = segment.trim();
        if let Some(day) = Weekday::from_name(segment) {
            menu.reset(day);
            current = Some(day);
        } else if let Some(day) = current
            && !segment.is_empty()
        {
            menu.push(day, segment);
        }
    }

    menu
}
