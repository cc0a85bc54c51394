//! The outcome of one extraction run across all cantinas.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::announcement::{Announcement, Cantina};
use crate::menu::{DayMenu, Weekday};

/// Which extractor produced the menu that is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// The AI-assisted parser produced a validated menu.
    Ai,
    /// The AI path failed and the deterministic extractor was used.
    Deterministic { reason: String },
}

/// Extracted menus for one cantina.
#[derive(Debug, Clone)]
pub struct CantinaMenu {
    pub announcement: Announcement,
    /// Deterministic extraction, always present.
    pub simple: DayMenu,
    /// AI-assisted extraction, when it succeeded.
    pub ai: Option<DayMenu>,
    pub provenance: Provenance,
}

impl CantinaMenu {
    /// The menu to show: the AI result when available, else the deterministic one.
    pub fn menu(&self) -> &DayMenu {
        self.ai.as_ref().unwrap_or(&self.simple)
    }

    pub fn is_ai_assisted(&self) -> bool {
        matches!(self.provenance, Provenance::Ai)
    }

    pub fn dishes(&self, day: Weekday) -> &[String] {
        self.menu().dishes(day)
    }
}

/// Serialized form published to the public bucket.
#[derive(Debug, Serialize)]
pub struct PublishedMenu<'a> {
    pub title: &'a str,
    pub raw_description: &'a str,
    pub published_at: Option<&'a str>,
    pub created_at: Option<&'a str>,
    pub updated_at: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpt: Option<&'a DayMenu>,
    pub simple: &'a DayMenu,
}

impl<'a> From<&'a CantinaMenu> for PublishedMenu<'a> {
    fn from(menu: &'a CantinaMenu) -> Self {
        let a = &menu.announcement;
        Self {
            title: &a.title,
            raw_description: &a.body,
            published_at: a.published_at.as_deref(),
            created_at: a.created_at.as_deref(),
            updated_at: a.updated_at.as_deref(),
            gpt: menu.ai.as_ref(),
            simple: &menu.simple,
        }
    }
}

/// Menus for every cantina that had an announcement this run.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub menus: BTreeMap<Cantina, CantinaMenu>,
}

impl ExtractionResult {
    /// True if at least one cantina's menu was AI-parsed.
    pub fn ai_assisted(&self) -> bool {
        self.menus.values().any(CantinaMenu::is_ai_assisted)
    }

    pub fn get(&self, cantina: Cantina) -> Option<&CantinaMenu> {
        self.menus.get(&cantina)
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    /// The document uploaded to the public bucket, keyed by cantina name.
    pub fn published(&self) -> BTreeMap<Cantina, PublishedMenu<'_>> {
        self.menus
            .iter()
            .map(|(cantina, menu)| (*cantina, PublishedMenu::from(menu)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cantina_menu(cantina: Cantina, ai: Option<DayMenu>) -> CantinaMenu {
        let mut simple = DayMenu::empty();
        simple.push(Weekday::Mandag, "simple");
        let provenance = match ai {
            Some(_) => Provenance::Ai,
            None => Provenance::Deterministic {
                reason: "not configured".into(),
            },
        };
        CantinaMenu {
            announcement: Announcement {
                cantina,
                week: 1,
                title: "Meny uke 1, Transit 2.etg".into(),
                body: "Mandag\n\nsimple".into(),
                published_at: Some("2026-01-05T07:00:00.000Z".into()),
                created_at: None,
                updated_at: None,
            },
            simple,
            ai,
            provenance,
        }
    }

    #[test]
    fn menu_prefers_ai_result() {
        let mut ai = DayMenu::empty();
        ai.push(Weekday::Mandag, "ai");
        let menu = cantina_menu(Cantina::Transit, Some(ai));
        assert_eq!(menu.dishes(Weekday::Mandag), ["ai"]);

        let fallback = cantina_menu(Cantina::Transit, None);
        assert_eq!(fallback.dishes(Weekday::Mandag), ["simple"]);
    }

    #[test]
    fn ai_assisted_if_any_cantina_was() {
        let mut result = ExtractionResult::default();
        assert!(!result.ai_assisted());

        result
            .menus
            .insert(Cantina::Transit, cantina_menu(Cantina::Transit, None));
        assert!(!result.ai_assisted());

        result.menus.insert(
            Cantina::Expedisjon,
            cantina_menu(Cantina::Expedisjon, Some(DayMenu::empty())),
        );
        assert!(result.ai_assisted());
    }

    #[test]
    fn published_document_shape() {
        let mut result = ExtractionResult::default();
        result
            .menus
            .insert(Cantina::Transit, cantina_menu(Cantina::Transit, None));
        let json = serde_json::to_value(result.published()).unwrap();
        let transit = &json["transit"];
        assert_eq!(transit["title"], "Meny uke 1, Transit 2.etg");
        assert_eq!(transit["raw_description"], "Mandag\n\nsimple");
        assert_eq!(transit["published_at"], "2026-01-05T07:00:00.000Z");
        assert!(transit.get("gpt").is_none());
        assert_eq!(transit["simple"]["mandag"][0], "simple");
    }
}
