//! Client for the building's message backend (a Parse server).
//!
//! The backend is queried the way the tenant app does it: a POST with
//! `_method: GET` against the `Melding` class, newest first. The raw response
//! is kept as JSON so it can be saved and replayed with `--messages-file`.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, SecondsFormat, TimeDelta, Utc};
use kantine_core::MessageRecord;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::SyncError;

pub const DEFAULT_BASE_URL: &str = "https://technopolis1.herokuapp.com/parse";

/// Headers identifying the client as the tenant app.
const APP_HEADERS: [(&str, &str); 4] = [
    ("User-Agent", "Parse Android SDK API Level 33"),
    ("X-Parse-App-Build-Version", "152"),
    ("X-Parse-App-Display-Version", "1.11.2"),
    ("X-Parse-Os-Version", "13"),
];

#[derive(Debug, Clone)]
pub struct ParseConfig {
    pub application_id: Option<String>,
    pub client_key: Option<String>,
    pub installation_id: Option<String>,
    /// Without trailing slash, e.g. `https://example.herokuapp.com/parse`.
    pub base_url: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            application_id: None,
            client_key: None,
            installation_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

pub struct ParseClient {
    client: reqwest::Client,
    base_url: String,
    application_id: String,
    client_key: String,
    installation_id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<MessageRecord>,
}

impl ParseClient {
    /// Build a client. All three app identifiers are required.
    pub fn from_config(config: &ParseConfig) -> Result<Self, SyncError> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("application id", &config.application_id),
            ("client key", &config.client_key),
            ("installation id", &config.installation_id),
        ] {
            if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                missing.push(name);
            }
        }
        if !missing.is_empty() {
            return Err(SyncError::Configuration(format!(
                "message backend {} missing",
                missing.join(", ")
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            application_id: config.application_id.clone().unwrap_or_default(),
            client_key: config.client_key.clone().unwrap_or_default(),
            installation_id: config.installation_id.clone().unwrap_or_default(),
        })
    }

    /// Fetch the messages that are valid now, as the raw backend response.
    pub async fn fetch_messages(&self, now: DateTime<Utc>) -> Result<Value, SyncError> {
        let url = format!("{}/classes/Melding", self.base_url);

        info!(url = %url, "querying message backend");
        let mut req = self.client.post(&url);
        for (name, value) in APP_HEADERS {
            req = req.header(name, value);
        }
        let resp = req
            .header("X-Parse-Application-Id", &self.application_id)
            .header("X-Parse-Client-Key", &self.client_key)
            .header("X-Parse-Installation-Id", &self.installation_id)
            .json(&query_payload(now))
            .send()
            .await?;
        let status = resp.status();
        info!(status = status.as_u16(), "message backend responded");
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json().await?)
    }
}

/// Query body for messages that are published and still valid at `now`.
///
/// Validity is measured against 23:00 UTC the day before, matching the app.
pub fn query_payload(now: DateTime<Utc>) -> Value {
    let valid_until = now.date_naive().and_time(NaiveTime::MIN).and_utc() - TimeDelta::hours(1);
    json!({
        "limit": "100",
        "where": {
            "gyldig_til": {"$gte": backend_date(valid_until)},
            "$or": [
                {"publisert": true},
                {
                    "publisertFraDatoTid": {"$lte": backend_date(now)},
                    "publisert": false,
                    "publisertStatus": {"$in": ["2", "3"]}
                }
            ]
        },
        "order": "-publishedAt",
        "_method": "GET"
    })
}

fn backend_date(at: DateTime<Utc>) -> Value {
    json!({"__type": "Date", "iso": at.to_rfc3339_opts(SecondsFormat::Millis, true)})
}

/// The message records in a backend response, newest first.
pub fn messages_from_response(response: Value) -> Result<Vec<MessageRecord>, SyncError> {
    let parsed: QueryResponse = serde_json::from_value(response)?;
    info!(count = parsed.results.len(), "received messages");
    Ok(parsed.results)
}

/// Read a previously saved backend response.
pub fn load_messages_file(path: &Path) -> Result<Value, SyncError> {
    let io_err = |source: std::io::Error| SyncError::Io {
        path: path.display().to_string(),
        source,
    };
    let text = std::fs::read_to_string(path).map_err(io_err)?;
    info!(path = %path.display(), "loaded messages from file");
    Ok(serde_json::from_str(&text)?)
}
