//! Scripted completion client for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::ExtractError;
use crate::completion::{CompletionClient, Turn};

pub const VALID_REPLY: &str =
    r#"{"mandag": [], "tirsdag": ["x"], "onsdag": [], "torsdag": [], "fredag": []}"#;

/// Replies from a fixed script, recording every prompt it was sent.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, ExtractError>>>,
    prompts: Mutex<Vec<Vec<Turn>>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String, ExtractError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<Vec<Turn>> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &[Turn], _text: &str) -> Result<String, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("script exhausted".to_string()))
    }
}
