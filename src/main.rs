// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Social-feed CLI
//!
//! Fetches the feed for the configured user and filter and prints each post
//! as a JSON line.

use anyhow::Context;
use social_feed::{
    config::Config,
    db::{DocumentClient, FirestoreDb},
    repositories::PostsRepository,
    services::FirebaseStorage,
};
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    let filter = config.parse_filter().context("Invalid FEED_FILTER")?;
    tracing::info!(
        project = %config.gcp_project_id,
        filter = %filter.title(),
        "Starting social-feed"
    );

    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .context("Failed to connect to Firestore")?;
    let storage = FirebaseStorage::from_config(&config);

    let repository = PostsRepository::new(
        config.acting_user(),
        DocumentClient::new(Arc::new(db)),
        Arc::new(storage),
    );

    let posts = repository.fetch(&filter).await?;
    tracing::info!(count = posts.len(), "Feed fetched");

    let mut out = std::io::stdout().lock();
    for post in &posts {
        serde_json::to_writer(&mut out, post)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("social_feed=debug".parse().expect("valid directive"))
                .add_directive("info".parse().expect("valid directive")),
        )
        .with(format)
        .init();
}
