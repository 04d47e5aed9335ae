//! Joined-row query layer.
//!
//! Every read is a single `SELECT` over the entity table (alias `e`) left-joined
//! to its related table, with columns projected as `alias_column` and mapped
//! back through [`RowMapper`]. Criteria are compiled by
//! [`build_conditions`](crate::filtering::build_conditions) against the
//! entity's column map, so filters may target joined columns.

mod comment;
mod post;
mod post_status;
pub mod query;
pub mod rowmapper;
pub mod schema;

use async_trait::async_trait;
use futures::{TryStreamExt, future, stream::BoxStream};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryResult,
    sea_query::{Alias, Expr},
};
use tracing::debug;

use crate::filtering::{ColumnRef, Criteria, Page, build_conditions};
pub use query::{JoinSpec, TableSpec, create_query, fetch};
pub use rowmapper::{RowMapper, RowReader};

/// Alias of the primary table in every generated query.
pub const ENTITY_ALIAS: &str = "e";

#[async_trait]
pub trait CrudRepository: RowMapper + std::fmt::Debug + Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model> + Sync;
    type Model: IntoActiveModel<Self::ActiveModel> + Send + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + Sync;
    type Criteria: Criteria;

    /// Name used in logs and alert headers, e.g. `postStatus`.
    const ENTITY_NAME: &'static str;
    const TABLE: TableSpec;
    const JOIN: Option<JoinSpec> = None;

    fn id(&self) -> Option<i64>;
    fn set_id(&mut self, id: Option<i64>);

    /// Active model for insert (`id` not set) or update (`id` unchanged).
    fn to_active_model(&self) -> Self::ActiveModel;

    fn model_id(model: &Self::Model) -> i64;

    /// Criteria field name to qualified column.
    fn column_map() -> Vec<(&'static str, ColumnRef)>;

    /// Map a joined row: primary side, then the related side when present.
    ///
    /// # Errors
    ///
    /// Propagates row mapping failures.
    fn process(row: &QueryResult) -> Result<Self, DbErr>;

    /// Named list filters such as `post-is-null`; `None` when unknown.
    fn named_filter<'a>(
        _db: &'a DatabaseConnection,
        _name: &str,
    ) -> Option<BoxStream<'a, Result<Self, DbErr>>> {
        None
    }

    fn find_all_by<'a>(
        db: &'a DatabaseConnection,
        page: Option<&Page>,
    ) -> BoxStream<'a, Result<Self, DbErr>> {
        fetch(db, &create_query::<Self>(page, Condition::all()))
    }

    fn find_by_criteria<'a>(
        db: &'a DatabaseConnection,
        criteria: Option<&Self::Criteria>,
        page: Option<&Page>,
    ) -> BoxStream<'a, Result<Self, DbErr>> {
        let condition = build_conditions(criteria, &Self::column_map(), db.get_database_backend());
        fetch(db, &create_query::<Self>(page, condition))
    }

    /// Number of rows [`find_by_criteria`](Self::find_by_criteria) yields without paging.
    async fn count_by_criteria(
        db: &DatabaseConnection,
        criteria: Option<&Self::Criteria>,
    ) -> Result<u64, DbErr> {
        Self::find_by_criteria(db, criteria, None)
            .try_fold(0_u64, |count, _| future::ready(Ok(count + 1)))
            .await
    }

    async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        let condition = Condition::all().add(Self::TABLE.column("id").expr().eq(id));
        fetch::<Self>(db, &create_query::<Self>(None, condition))
            .try_next()
            .await
    }

    async fn exists_by_id(db: &DatabaseConnection, id: i64) -> Result<bool, DbErr> {
        let condition = Condition::all().add(Self::TABLE.column("id").expr().eq(id));
        Ok(query::count_rows(db, &Self::TABLE, condition).await? > 0)
    }

    async fn count_all(db: &DatabaseConnection) -> Result<u64, DbErr> {
        query::count_rows(db, &Self::TABLE, Condition::all()).await
    }

    /// Insert when `id` is `None` and assign the generated id, otherwise update in place.
    ///
    /// Updating an id with no row fails with [`DbErr::RecordNotUpdated`].
    async fn save(db: &DatabaseConnection, mut entity: Self) -> Result<Self, DbErr> {
        let active = entity.to_active_model();
        let model = if entity.id().is_some() {
            active.update(db).await?
        } else {
            active.insert(db).await?
        };
        entity.set_id(Some(Self::model_id(&model)));
        debug!(entity = Self::ENTITY_NAME, id = ?entity.id(), "Saved");
        Ok(entity)
    }

    /// Delete by id. Deleting an absent id is a no-op.
    async fn delete_by_id(db: &DatabaseConnection, id: i64) -> Result<(), DbErr> {
        let result = Self::Entity::delete_many()
            .filter(Expr::col(Alias::new("id")).eq(id))
            .exec(db)
            .await?;
        debug!(entity = Self::ENTITY_NAME, id, rows = result.rows_affected, "Deleted");
        Ok(())
    }
}
