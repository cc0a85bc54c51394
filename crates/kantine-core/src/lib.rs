//! Core types for Kantine: weekday menus, cantina announcements, the deterministic
//! menu extractor, and the per-run statistics collector.

pub mod announcement;
pub mod extraction;
pub mod menu;
pub mod simple;
pub mod stats;

pub use announcement::{Announcement, Cantina, MessageRecord, parse_title, select_announcements};
pub use extraction::{CantinaMenu, ExtractionResult, Provenance, PublishedMenu};
pub use menu::{DayMenu, MenuShapeError, Weekday, verify_menu_structure};
pub use simple::parse_simple;
pub use stats::Stats;
