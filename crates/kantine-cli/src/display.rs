//! Console rendering of today's menus.

use std::fmt::Write;

use kantine_core::{Cantina, ExtractionResult, Weekday};

/// Console order: the ground floor first.
const CONSOLE_ORDER: [Cantina; 2] = [Cantina::Transit, Cantina::Expedisjon];

// ── Public API ──

/// Print today's dishes for every cantina.
pub fn print_today(result: &ExtractionResult, today: Weekday) {
    print!("{}", render_today(result, today));
}

/// Today's dishes as plain text, one block per cantina.
pub fn render_today(result: &ExtractionResult, today: Weekday) -> String {
    let mut out = String::new();
    for cantina in CONSOLE_ORDER {
        let Some(menu) = result.get(cantina) else {
            let _ = writeln!(out, "No menu for {cantina}");
            continue;
        };
        let _ = writeln!(out, "{} {}", capitalize(cantina.as_str()), today.title());
        for dish in menu.dishes(today) {
            let _ = writeln!(out, " - {dish}");
        }
    }
    if result.ai_assisted() {
        out.push_str("Powered by AI\n");
    }
    out
}

// ── Helpers ──

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
