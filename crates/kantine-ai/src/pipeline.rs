//! Extraction orchestrator: the one place the AI and deterministic
//! extractors are combined.
//!
//! Every announcement gets a deterministic parse. The AI parser is tried as
//! well; whatever goes wrong there (missing settings, transport errors,
//! unusable replies, a cached earlier failure) is logged and the
//! deterministic menu is shown instead. A menu is never lost to an AI failure.

use std::collections::BTreeMap;

use async_trait::async_trait;
use kantine_core::{
    Announcement, Cantina, CantinaMenu, DayMenu, ExtractionResult, Provenance, Stats, parse_simple,
};
use tracing::{info, warn};

use crate::ExtractError;

/// A fallible menu parser; in production the cached AI extractor.
#[async_trait]
pub trait MenuParser: Send + Sync {
    async fn parse(&self, text: &str) -> Result<DayMenu, ExtractError>;
}

pub struct Orchestrator<P> {
    ai: P,
}

impl<P: MenuParser> Orchestrator<P> {
    pub fn new(ai: P) -> Self {
        Self { ai }
    }

    /// Extract menus for every announcement, one cantina at a time.
    ///
    /// Fails only when there is nothing to extract; per-cantina AI failures
    /// are recorded as [`Provenance::Deterministic`].
    pub async fn extract(
        &self,
        announcements: &BTreeMap<Cantina, Announcement>,
        stats: &mut Stats,
    ) -> Result<ExtractionResult, ExtractError> {
        if announcements.is_empty() {
            return Err(ExtractError::NoAnnouncements);
        }

        let mut result = ExtractionResult::default();
        for (cantina, announcement) in announcements {
            let simple = parse_simple(&announcement.body);

            let (ai, provenance) = match self.ai.parse(&announcement.body).await {
                Ok(menu) => {
                    stats.incr("ai_parsed");
                    info!(cantina = %cantina, week = announcement.week, "menu parsed with AI assistance");
                    (Some(menu), Provenance::Ai)
                }
                Err(e) => {
                    stats.incr("ai_failed");
                    warn!(
                        cantina = %cantina,
                        week = announcement.week,
                        error = %e,
                        "AI-assisted parsing failed, using deterministic extractor"
                    );
                    (
                        None,
                        Provenance::Deterministic {
                            reason: e.to_string(),
                        },
                    )
                }
            };

            stats.incr("menus_extracted");
            result.menus.insert(
                *cantina,
                CantinaMenu {
                    announcement: announcement.clone(),
                    simple,
                    ai,
                    provenance,
                },
            );
        }

        info!(
            cantinas = result.menus.len(),
            ai_assisted = result.ai_assisted(),
            "extraction complete"
        );
        Ok(result)
    }
}
