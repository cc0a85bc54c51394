//! Today's menu as a Slack Block Kit message.

use std::time::Duration;

use kantine_core::{Cantina, ExtractionResult, Weekday};
use serde_json::{Value, json};
use tracing::info;

use crate::SyncError;

/// Message blocks for `today`: a header, then one section per cantina that
/// had an announcement, and an AI footer when any menu was AI-parsed.
pub fn build_blocks(result: &ExtractionResult, today: Weekday) -> Vec<Value> {
    let mut blocks = vec![
        json!({
            "type": "header",
            "text": {"type": "plain_text", "text": "Dagens Meny :fork_and_knife:", "emoji": true}
        }),
        json!({"type": "divider"}),
    ];

    for cantina in Cantina::ALL {
        let Some(menu) = result.get(cantina) else {
            continue;
        };
        let fields: Vec<Value> = menu
            .dishes(today)
            .iter()
            .map(|dish| json!({"type": "mrkdwn", "text": format!("- {dish}")}))
            .collect();
        blocks.push(json!({
            "type": "section",
            "text": {"type": "mrkdwn", "text": format!("*{}*\n", cantina.display_name())}
        }));
        blocks.push(json!({"type": "section", "fields": fields}));
        blocks.push(json!({"type": "divider"}));
    }

    if result.ai_assisted() {
        blocks.push(json!({
            "type": "section",
            "text": {"type": "mrkdwn", "text": "Powered by AI :robot_face:"}
        }));
    }
    blocks
}

/// Posts messages to an incoming-webhook URL.
pub struct SlackClient {
    client: reqwest::Client,
    hook_url: String,
}

impl SlackClient {
    pub fn new(hook_url: impl Into<String>) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            hook_url: hook_url.into(),
        })
    }

    pub async fn post(&self, blocks: &[Value]) -> Result<(), SyncError> {
        info!(blocks = blocks.len(), "posting menu to Slack");
        let resp = self
            .client
            .post(&self.hook_url)
            .json(&json!({"blocks": blocks}))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
