use std::collections::BTreeSet;

use crate::error::Result;
use crate::feed::{update_podcasts, UpdateSummary};

use super::MigrationContext;

/// Collects the reference URLs of subscriptions whose podcast lacks a
/// canonical link and hands them to the bulk updater in a single call.
/// Subscriptions sharing a URL are updated once.
pub async fn backfill_unlinked_podcasts(ctx: &MigrationContext<'_>) -> Result<UpdateSummary> {
    let urls: Vec<String> = ctx
        .repository
        .unlinked_subscription_urls()
        .await?
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if urls.is_empty() {
        tracing::info!("No unlinked podcasts to backfill");
        return Ok(UpdateSummary::default());
    }

    Ok(update_podcasts(ctx.updater, &urls, ctx.concurrency).await)
}
