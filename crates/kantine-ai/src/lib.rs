//! AI-assisted menu parsing and the extraction pipeline.
//!
//! The completion service is asked for a JSON menu with an escalating list
//! of prompts; results (and failures) are cached by input text; the
//! orchestrator falls back to the deterministic extractor whenever the AI
//! path does not deliver.

mod error;
pub use error::ExtractError;

pub mod completion;
pub mod extractor;
pub mod parser;
pub mod pipeline;
pub mod prompts;

#[cfg(test)]
mod testing;

pub use completion::{CompletionClient, OpenAiClient, OpenAiConfig, Role, Turn};
pub use extractor::{AiExtractor, CACHE_PREFIX};
pub use parser::{AiParser, decode_reply};
pub use pipeline::{MenuParser, Orchestrator};
