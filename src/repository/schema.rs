use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};
use tracing::info;

use crate::entity::{comment, post, post_status};

/// Create any missing tables from the entity definitions.
///
/// Existing tables are left untouched; there is no versioned migration.
///
/// # Errors
///
/// Returns the first [`DbErr`] raised while creating a table.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, post_status::Entity).await?;
    create_table(db, post::Entity).await?;
    create_table(db, comment::Entity).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let table = entity.table_name().to_owned();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    info!(table = %table, "Ensured table exists");
    Ok(())
}
