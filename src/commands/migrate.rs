use std::{cmp, error::Error};

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use crate::{
    cli::MigrateAction, config::Config, database::migrations::Migrator,
    database::setup_database_connection,
};

/// # Errors
/// Returns the connection or migration error.
pub async fn handle_migrate_command(
    config: &Config,
    action: MigrateAction,
) -> Result<(), Box<dyn Error>> {
    let db = setup_database_connection(&config.database).await?;

    run_migration_action(&db, action).await
}

/// # Errors
/// Returns the first migration error.
pub async fn run_migration_action(
    db: &DatabaseConnection,
    action: MigrateAction,
) -> Result<(), Box<dyn Error>> {
    match action {
        MigrateAction::Up { steps } => {
            let pending = Migrator::get_pending_migrations(db).await?;

            if pending.is_empty() {
                println!("✅ All migrations are already up to date");
                return Ok(());
            }

            let count = steps.map_or(pending.len(), |steps| {
                cmp::min(steps as usize, pending.len())
            });

            println!("Applying {count} migration(s):");
            for migration in &pending[..count] {
                println!("  📄 {}", migration.name());
            }

            Migrator::up(db, steps).await?;
            println!("✅ Migrations applied");
        }
        MigrateAction::Down { steps } => {
            let applied = Migrator::get_applied_migrations(db).await?;

            if applied.is_empty() {
                println!("❌ No migrations to roll back");
                return Ok(());
            }

            let count = cmp::min(steps as usize, applied.len());

            println!("Rolling back {count} migration(s):");
            for migration in applied[applied.len() - count..].iter().rev() {
                println!("  📄 {}", migration.name());
            }

            Migrator::down(db, Some(steps)).await?;
            println!("✅ Rollback completed");
        }
        MigrateAction::Status => {
            let applied = Migrator::get_applied_migrations(db).await?;
            let pending = Migrator::get_pending_migrations(db).await?;

            println!("📋 Applied migrations:");
            for migration in &applied {
                println!("  ✓ {}", migration.name());
            }

            if pending.is_empty() {
                println!("✅ Nothing pending");
            } else {
                println!("📋 Pending migrations:");
                for migration in &pending {
                    println!("  - {}", migration.name());
                }
            }
        }
        MigrateAction::Fresh => {
            println!("🔄 Dropping all tables and re-applying every migration...");
            Migrator::fresh(db).await?;
            println!("✅ Database rebuilt");
        }
    }

    Ok(())
}
