//! The AI path as the orchestrator sees it: parser plus result cache.

use async_trait::async_trait;
use kantine_core::DayMenu;
use kantine_store::{CacheConfig, ContentCache};
use tracing::warn;

use crate::ExtractError;
use crate::completion::{CompletionClient, OpenAiClient, OpenAiConfig};
use crate::parser::AiParser;
use crate::pipeline::MenuParser;

/// Cache key prefix for parsed menus. Bump it when prompts or validation change.
pub const CACHE_PREFIX: &str = "v1";

/// AI-assisted parser whose outcomes are cached by announcement text.
pub struct AiExtractor<C> {
    parser: AiParser<C>,
    cache: Option<ContentCache>,
}

impl AiExtractor<OpenAiClient> {
    /// Build from settings. Missing settings are logged here and reported
    /// as [`ExtractError::Configuration`] on every parse.
    pub fn from_config(openai: &OpenAiConfig, cache: &CacheConfig) -> Self {
        let client = OpenAiClient::from_config(openai)
            .inspect_err(|e| warn!(error = %e, "AI-assisted parsing unavailable"))
            .ok();
        let cache = ContentCache::from_config(cache, CACHE_PREFIX)
            .inspect_err(|e| warn!(error = %e, "parse cache unavailable"))
            .ok();
        Self::new(AiParser::new(client), cache)
    }
}

impl<C: CompletionClient> AiExtractor<C> {
    pub fn new(parser: AiParser<C>, cache: Option<ContentCache>) -> Self {
        Self { parser, cache }
    }

    /// Parse `text`, serving a cached outcome when one exists.
    ///
    /// Credentials are checked before the cache, so a run without them
    /// never writes an entry.
    pub async fn extract(&self, text: &str) -> Result<DayMenu, ExtractError> {
        self.parser.client()?;
        let cache = self.cache.as_ref().ok_or_else(|| {
            ExtractError::Configuration("parse cache storage is not configured".into())
        })?;

        cache
            .get_or_compute(text.as_bytes(), || self.parser.parse(text))
            .await
    }
}

#[async_trait]
impl<C: CompletionClient> MenuParser for AiExtractor<C> {
    async fn parse(&self, text: &str) -> Result<DayMenu, ExtractError> {
        self.extract(text).await
    }
}
