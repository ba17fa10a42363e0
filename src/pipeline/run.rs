// src/pipeline/run.rs

//! Full pipeline run.
//!
//! One invocation = one run. The external scheduler guarantees runs never
//! overlap, so the checkpoint file is only ever touched by one process.
//! Any error that escapes this function leaves the checkpoint unchanged;
//! the next run re-derives the same diff and retries the unpublished
//! range.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;

use crate::config::Secrets;
use crate::error::Result;
use crate::models::{Config, RoutingMode};
use crate::pipeline::publish::{Outbound, Publisher};
use crate::pipeline::route::Routing;
use crate::pipeline::{caption, diff};
use crate::services::{parse_feed, FeedFetcher, TelegramClient};
use crate::storage::{topics, CheckpointStore};
use crate::utils::http;

/// Execute one fetch → parse → diff → route → publish → checkpoint run.
pub async fn run(config: &Config, secrets: &Secrets, storage_dir: &Path) -> Result<()> {
    let started = Utc::now();
    log::info!("Fetching listing feed from {}", config.feed.url);

    let fetcher = FeedFetcher::new(&config.feed, storage_dir)?;
    let text = fetcher.fetch().await?;

    let outcomes = parse_feed(&text, &config.contacts)?;
    let total_records = outcomes.len();

    let mut listings = Vec::new();
    let mut dropped = 0usize;
    for outcome in outcomes {
        match outcome {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                dropped += 1;
                log::warn!("Record dropped: {e}");
            }
        }
    }
    log::info!(
        "Parsed {} of {} records ({} dropped)",
        listings.len(),
        total_records,
        dropped
    );

    let Some(max_id) = diff::normalize(&mut listings) else {
        log::warn!("Feed produced no listings; checkpoint left unchanged");
        return Ok(());
    };

    let store = CheckpointStore::new(storage_dir.join(&config.checkpoint.file));
    let checkpoint = store.load(max_id).await?;

    let fresh = diff::filter_new(listings, &checkpoint);
    log::info!(
        "{} listing(s) newer than checkpoint {}",
        fresh.len(),
        checkpoint.last_id
    );

    let routing = build_routing(config, storage_dir).await?;

    let mut batch = Vec::new();
    for mut listing in fresh {
        let destinations = routing.route(&mut listing);
        if destinations.is_empty() {
            log::warn!("offer {}: no destinations matched", listing.internal_id);
            continue;
        }
        batch.push(Outbound {
            internal_id: listing.internal_id,
            image: listing.image.clone(),
            caption: caption::format_caption(&listing, &config.caption),
            destinations,
        });
    }

    if !batch.is_empty() {
        let sender = TelegramClient::new(
            http::create_api_client(config.publisher.timeout_secs)?,
            secrets.bot_token.clone(),
            secrets.target_chat_id,
        );
        let publisher = Publisher::new(&sender, Duration::from_millis(config.publisher.pace_ms));
        let stats = publisher.publish(&batch).await?;

        log::info!(
            "Publish phase complete: {} attempted, {} failed, {} skipped (no image)",
            stats.attempted,
            stats.failed,
            stats.skipped_no_image
        );
    }

    // The publish phase reported success (all sends attempted), so the
    // watermark may advance. On a first run this seeds the file with the
    // batch max without publishing anything.
    store.save(max_id).await?;

    let elapsed = Utc::now() - started;
    log::info!("Run complete in {}s", elapsed.num_seconds());
    Ok(())
}

/// Build the routing strategy for this run.
///
/// In topic mode a missing or empty table aborts the run before anything
/// is sent, leaving the checkpoint unchanged.
async fn build_routing(config: &Config, storage_dir: &Path) -> Result<Routing> {
    match config.publisher.routing {
        RoutingMode::Broadcast => Ok(Routing::Broadcast),
        RoutingMode::Topics => {
            let table = topics::load(&storage_dir.join(&config.publisher.topics_file)).await?;
            let price_band_topic = config.publisher.price_band_topic.ok_or_else(|| {
                crate::error::AppError::config(
                    "publisher.price_band_topic is required when routing = \"topics\"",
                )
            })?;
            Ok(Routing::Topics {
                table,
                price_band_topic,
            })
        }
    }
}
