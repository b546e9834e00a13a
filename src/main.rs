use std::sync::Arc;

mod config;
mod db;
mod directory;
mod error;
mod feed;
mod migrations;
mod models;
mod web;

use config::Config;
use db::Repository;
use error::{AppError, Result};
use feed::{update_podcasts, FeedFetcher, FeedUpdater, PodcastUpdater};
use migrations::{run_pending, MigrationContext, MIGRATIONS};
use models::{NewPodcast, NewSubscription};
use web::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG overrides the info default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Load configuration
    let config = Config::load()?;

    let repository = Arc::new(Repository::new(&config.db_path).await?);
    let fetcher = FeedFetcher::new(&config)?;
    let updater: Arc<dyn PodcastUpdater> =
        Arc::new(FeedUpdater::new(fetcher, Arc::clone(&repository)));

    // --migrate: apply pending data migrations and exit
    if args.get(1).map(String::as_str) == Some("--migrate") {
        let ctx = MigrationContext {
            repository: &repository,
            updater: updater.as_ref(),
            concurrency: config.update_concurrency,
        };
        let applied = run_pending(&ctx, MIGRATIONS).await?;
        println!("Applied {} migrations", applied.len());
        for name in applied {
            println!("  {}", name);
        }
        return Ok(());
    }

    // --update URL...: refresh the given feeds and exit
    if args.get(1).map(String::as_str) == Some("--update") {
        if args.len() < 3 {
            return Err(AppError::Config("--update needs at least one feed URL".to_string()));
        }
        let urls = args[2..]
            .iter()
            .map(|url| {
                models::normalize_url(Some(url.as_str()))
                    .ok_or_else(|| AppError::InvalidUrl(url.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        let summary = update_podcasts(updater.as_ref(), &urls, config.update_concurrency).await;
        println!(
            "Updated {} podcasts, {} failed",
            summary.updated, summary.failed
        );
        return Ok(());
    }

    // --subscribe USER_ID URL: record a subscription, creating a placeholder
    // podcast when the feed is unknown
    if args.get(1).map(String::as_str) == Some("--subscribe") {
        let (Some(user_id), Some(url)) = (args.get(2), args.get(3)) else {
            return Err(AppError::Config("usage: --subscribe USER_ID URL".to_string()));
        };
        let user_id: i64 = user_id
            .parse()
            .map_err(|_| AppError::Config(format!("invalid user id: {}", user_id)))?;
        let url = models::normalize_url(Some(url.as_str()))
            .ok_or_else(|| AppError::InvalidUrl(url.clone()))?;

        let podcast = match repository.find_podcast_by_url(&url).await? {
            Some(podcast) => podcast,
            None => {
                repository
                    .insert_podcast(NewPodcast {
                        url: Some(url.clone()),
                        ..Default::default()
                    })
                    .await?
            }
        };
        repository
            .insert_subscription(NewSubscription {
                user_id,
                podcast_id: podcast.id.clone(),
                ref_url: url.clone(),
            })
            .await?;
        println!("User {} subscribed to {}", user_id, url);
        return Ok(());
    }

    // --subscriptions USER_ID: list a user's subscriptions
    if args.get(1).map(String::as_str) == Some("--subscriptions") {
        let user_id: i64 = args
            .get(2)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| AppError::Config("usage: --subscriptions USER_ID".to_string()))?;
        for subscription in repository.get_subscriptions(user_id).await? {
            println!(
                "{}  {}  (since {})",
                subscription.podcast_id,
                subscription.ref_url,
                subscription.created.format("%Y-%m-%d")
            );
        }
        return Ok(());
    }

    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(repository, updater, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!("Listening on {}", listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
