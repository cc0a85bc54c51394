//! Cantina menu announcements as published by the building's message backend.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Menu announcement titles look like `Meny uke 12, Transit 2.etg`.
static MENU_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Meny uke (?P<week>\d+), (?P<cantina>Expedisjon|Transit) \d\.etg")
        .expect("menu title pattern is valid")
});

/// One of the two cantinas in the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cantina {
    Expedisjon,
    Transit,
}

impl Cantina {
    pub const ALL: [Cantina; 2] = [Cantina::Expedisjon, Cantina::Transit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expedisjon => "expedisjon",
            Self::Transit => "transit",
        }
    }

    /// Friendly name with an arrow showing which floor it is on relative to the other.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Expedisjon => "Expedisjon ⬆️",
            Self::Transit => "Transit ⬇️",
        }
    }

    fn from_title(name: &str) -> Option<Self> {
        match name {
            "Expedisjon" => Some(Self::Expedisjon),
            "Transit" => Some(Self::Transit),
            _ => None,
        }
    }
}

impl fmt::Display for Cantina {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date wrapper used by the backend (`{"__type": "Date", "iso": "..."}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendDate {
    pub iso: String,
}

/// A raw message record from the backend.
///
/// Only the fields Kantine reads are modelled; everything else is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "tekst", default)]
    pub title: String,
    #[serde(rename = "langBeskrivelse", default)]
    pub body: String,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<BackendDate>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

/// One cantina's weekly menu notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub cantina: Cantina,
    pub week: u32,
    pub title: String,
    /// Free-text body holding the day-by-day content.
    pub body: String,
    /// ISO 8601 timestamp strings, as delivered by the backend.
    pub published_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Announcement {
    /// Build an announcement from a record whose title matches the menu pattern.
    pub fn from_record(record: MessageRecord) -> Option<Self> {
        let (cantina, week) = parse_title(&record.title)?;
        Some(Self {
            cantina,
            week,
            title: record.title,
            body: record.body,
            published_at: record.published_at.map(|d| d.iso),
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Extract cantina and week number from a menu announcement title.
pub fn parse_title(title: &str) -> Option<(Cantina, u32)> {
    let caps = MENU_TITLE.captures(title)?;
    let cantina = Cantina::from_title(&caps["cantina"])?;
    let week = caps["week"].parse().ok()?;
    Some((cantina, week))
}

/// Keep the first menu announcement per cantina.
///
/// The backend returns records newest first, so the first match is the
/// current week's menu.
pub fn select_announcements(
    records: impl IntoIterator<Item = MessageRecord>,
) -> BTreeMap<Cantina, Announcement> {
    let mut selected = BTreeMap::new();
    for record in records {
        let Some(announcement) = Announcement::from_record(record) else {
            continue;
        };
        if selected.contains_key(&announcement.cantina) {
            continue;
        }
        debug!(
            cantina = %announcement.cantina,
            week = announcement.week,
            title = %announcement.title,
            "selected menu announcement"
        );
        selected.insert(announcement.cantina, announcement);
    }
    selected
}
