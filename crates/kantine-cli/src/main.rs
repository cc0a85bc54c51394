mod config;
mod display;
mod schedule;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use kantine_ai::{AiExtractor, ExtractError, Orchestrator};
use kantine_core::{ExtractionResult, Stats, select_announcements};
use kantine_store::Publisher;
use kantine_sync::{
    ParseClient, SlackClient, build_blocks, load_messages_file, messages_from_response,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Neither file overrides variables that are already set.
    dotenv::dotenv().ok();
    dotenv::from_filename(".env.local").ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("kantine v{}", env!("CARGO_PKG_VERSION"));

    let mut stats = Stats::new();
    let outcome = run(&cli, Utc::now(), &mut stats).await;
    info!(stats = %stats, "run finished");
    outcome
}

async fn run(cli: &Cli, now: DateTime<Utc>, stats: &mut Stats) -> anyhow::Result<()> {
    let window = cli.post_window()?;

    // ── Fetch ──
    let response = match &cli.messages_file {
        Some(path) => load_messages_file(path)?,
        None => {
            let client = ParseClient::from_config(&cli.parse_config())?;
            let response = client
                .fetch_messages(now)
                .await
                .context("fetching messages from the backend")?;
            if let Some(path) = &cli.dump_messages {
                std::fs::write(path, serde_json::to_vec_pretty(&response)?)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "saved backend response");
            }
            response
        }
    };
    let announcements = select_announcements(messages_from_response(response)?);
    stats.set("announcements", announcements.len() as u64);

    // ── Extract ──
    let extractor = AiExtractor::from_config(&cli.openai_config(), &cli.cache_config());
    let result = match Orchestrator::new(extractor).extract(&announcements, stats).await {
        Ok(result) => result,
        Err(ExtractError::NoAnnouncements) => ExtractionResult::default(),
        Err(e) => return Err(e.into()),
    };

    // ── Publish ──
    if let Some(bucket) = &cli.public_bucket
        && !result.is_empty()
    {
        let publisher = Publisher::from_config(bucket, &cli.s3_config())?;
        publisher
            .publish_week(window.iso_week(now), &result.published())
            .await
            .context("publishing the weekly menu")?;
        stats.incr("upload_menu");
    }

    // ── Show and post ──
    let Some(today) = window.weekday(now) else {
        info!("weekend, nothing to show");
        return Ok(());
    };
    display::print_today(&result, today);

    if result.is_empty() {
        warn!("no menu found, skipping");
        return Ok(());
    }
    if !cli.force_post && !window.contains(now) {
        info!(time = %window.time, tz = window.tz.name(), "outside the post window, not posting");
        return Ok(());
    }
    match &cli.slack_hook {
        Some(hook) => {
            SlackClient::new(hook.as_str())?
                .post(&build_blocks(&result, today))
                .await
                .context("posting to Slack")?;
            stats.incr("slack_post");
        }
        None => warn!("no Slack hook configured, skipping"),
    }
    Ok(())
}
