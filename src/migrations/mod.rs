//! One-off data migrations applied after the schema is in place.
//!
//! Each migration runs at most once per database. They are not wrapped in a
//! transaction: a backfill talks to the network for every podcast it touches
//! and partial progress is kept. Nothing records how to undo a backfill, so
//! migrations only run forwards.

mod backfill;

use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::feed::PodcastUpdater;

pub use backfill::backfill_unlinked_podcasts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Re-fetch every subscribed podcast that has no canonical link.
    BackfillUnlinkedPodcasts,
}

#[derive(Debug, Clone, Copy)]
pub struct DataMigration {
    pub name: &'static str,
    pub depends_on: Option<&'static str>,
    pub operation: Operation,
}

/// Applied in this order.
pub const MIGRATIONS: &[DataMigration] = &[
    DataMigration {
        name: "podcasts.0001_backfill_unlinked",
        depends_on: None,
        operation: Operation::BackfillUnlinkedPodcasts,
    },
    DataMigration {
        name: "subscriptions.0001_backfill_unlinked",
        depends_on: Some("podcasts.0001_backfill_unlinked"),
        operation: Operation::BackfillUnlinkedPodcasts,
    },
];

pub struct MigrationContext<'a> {
    pub repository: &'a Repository,
    pub updater: &'a dyn PodcastUpdater,
    pub concurrency: usize,
}

impl DataMigration {
    pub async fn forwards(&self, ctx: &MigrationContext<'_>) -> Result<()> {
        match self.operation {
            Operation::BackfillUnlinkedPodcasts => {
                backfill_unlinked_podcasts(ctx).await?;
            }
        }
        Ok(())
    }
}

/// Applies every migration not yet recorded in the database and returns the
/// names of those that ran.
pub async fn run_pending(
    ctx: &MigrationContext<'_>,
    migrations: &[DataMigration],
) -> Result<Vec<&'static str>> {
    let mut applied = Vec::new();

    for migration in migrations {
        if ctx.repository.is_migration_applied(migration.name).await? {
            tracing::debug!("{} already applied", migration.name);
            continue;
        }

        if let Some(dependency) = migration.depends_on {
            if !ctx.repository.is_migration_applied(dependency).await? {
                return Err(AppError::Migration(format!(
                    "{} depends on {}, which has not been applied",
                    migration.name, dependency
                )));
            }
        }

        tracing::info!("Applying {}", migration.name);
        migration.forwards(ctx).await?;
        ctx.repository.record_migration(migration.name).await?;
        applied.push(migration.name);
    }

    Ok(applied)
}
