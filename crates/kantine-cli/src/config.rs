//! Command-line flags with environment fallbacks, and the library config
//! structs built from them.

use std::path::PathBuf;

use clap::Parser;
use kantine_ai::OpenAiConfig;
use kantine_ai::completion::{DEFAULT_MODEL, OPENAI_BASE_URL};
use kantine_store::{CacheConfig, S3Config};
use kantine_sync::ParseConfig;
use kantine_sync::source::DEFAULT_BASE_URL;

use crate::schedule::PostWindow;

/// Fetch this week's cantina menus, extract them, publish them and post today's to Slack.
#[derive(Debug, Parser)]
#[command(name = "kantine", version, about, long_about = None)]
pub struct Cli {
    // ── Message backend ──
    #[arg(long, env = "PARSE_APPLICATION_ID", hide_env_values = true)]
    pub parse_application_id: Option<String>,

    #[arg(long, env = "PARSE_CLIENT_KEY", hide_env_values = true)]
    pub parse_client_key: Option<String>,

    #[arg(long, env = "PARSE_INSTALLATION_ID", hide_env_values = true)]
    pub parse_installation_id: Option<String>,

    #[arg(long, env = "PARSE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub parse_base_url: String,

    /// Read a saved backend response instead of querying the backend.
    #[arg(long, env = "TEST_FILE")]
    pub messages_file: Option<PathBuf>,

    /// Save the live backend response to this path.
    #[arg(long, conflicts_with = "messages_file")]
    pub dump_messages: Option<PathBuf>,

    // ── Completion service ──
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_ORGANIZATION", hide_env_values = true)]
    pub openai_organization: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = OPENAI_BASE_URL)]
    pub openai_base_url: String,

    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub openai_model: String,

    // ── Object storage ──
    /// Bucket for cached parse results.
    #[arg(long, env = "CACHE_BUCKET")]
    pub cache_bucket: Option<String>,

    /// Bucket the weekly menu is published to; publishing is skipped when unset.
    #[arg(long, env = "PUBLIC_BUCKET")]
    pub public_bucket: Option<String>,

    #[arg(long, env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    #[arg(long, env = "S3_ACCESS_KEY_ID", hide_env_values = true)]
    pub s3_access_key_id: Option<String>,

    #[arg(long, env = "S3_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub s3_secret_access_key: Option<String>,

    #[arg(long, env = "S3_REGION", default_value = "nl-ams")]
    pub s3_region: String,

    // ── Slack ──
    /// Incoming-webhook URL; posting is skipped when unset.
    #[arg(long, env = "SLACK_HOOK", hide_env_values = true)]
    pub slack_hook: Option<String>,

    /// Local time of day to post at, `HH:MM`.
    #[arg(long, env = "SLACK_POST_TIME", default_value = "10:00")]
    pub slack_post_time: String,

    /// IANA time zone `--slack-post-time` is given in.
    #[arg(long, env = "SLACK_POST_TZ", default_value = "Europe/Oslo")]
    pub slack_post_tz: String,

    /// Minutes either side of the post time in which a run posts.
    #[arg(long, env = "SLACK_POST_WINDOW", default_value_t = 15)]
    pub slack_post_window: u32,

    /// Post regardless of the time window (still never at weekends).
    #[arg(long)]
    pub force_post: bool,
}

impl Cli {
    pub fn parse_config(&self) -> ParseConfig {
        ParseConfig {
            application_id: self.parse_application_id.clone(),
            client_key: self.parse_client_key.clone(),
            installation_id: self.parse_installation_id.clone(),
            base_url: self.parse_base_url.clone(),
        }
    }

    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_key: self.openai_api_key.clone(),
            organization: self.openai_organization.clone(),
            base_url: self.openai_base_url.clone(),
            model: self.openai_model.clone(),
            ..OpenAiConfig::default()
        }
    }

    pub fn s3_config(&self) -> S3Config {
        S3Config {
            endpoint: self.s3_endpoint.clone(),
            access_key_id: self.s3_access_key_id.clone(),
            secret_access_key: self.s3_secret_access_key.clone(),
            region: Some(self.s3_region.clone()),
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            bucket: self.cache_bucket.clone(),
            s3: self.s3_config(),
        }
    }

    pub fn post_window(&self) -> anyhow::Result<PostWindow> {
        PostWindow::parse(
            &self.slack_post_time,
            &self.slack_post_tz,
            self.slack_post_window,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Values are passed as flags so the tests do not depend on the environment
    // the test runner happens to have.
    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["kantine"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_flow_into_library_configs() {
        let cli = cli(&[
            "--cache-bucket",
            "kantine-cache",
            "--s3-endpoint",
            "http://localhost:9000",
            "--s3-region",
            "nl-ams",
            "--openai-model",
            "gpt-4o-mini",
            "--parse-base-url",
            "http://localhost:1337/parse",
        ]);

        let cache = cli.cache_config();
        assert_eq!(cache.bucket.as_deref(), Some("kantine-cache"));
        assert_eq!(cache.s3.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cache.s3.region.as_deref(), Some("nl-ams"));
        assert_eq!(cli.openai_config().model, "gpt-4o-mini");
        assert_eq!(cli.openai_config().max_tokens, 2048);
        assert_eq!(cli.parse_config().base_url, "http://localhost:1337/parse");
    }

    #[test]
    fn post_window_from_flags() {
        let cli = cli(&[
            "--slack-post-time",
            "11:30",
            "--slack-post-tz",
            "UTC",
            "--slack-post-window",
            "5",
        ]);
        let window = cli.post_window().unwrap();
        assert_eq!(window.window_minutes, 5);
        assert_eq!(window.tz, chrono_tz::UTC);
    }

    #[test]
    fn dump_and_file_are_exclusive() {
        let argv = [
            "kantine",
            "--messages-file",
            "a.json",
            "--dump-messages",
            "b.json",
        ];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
