use futures::stream::BoxStream;
use sea_orm::{
    ActiveValue, Condition, DatabaseConnection, DbErr, QueryResult,
    sea_query::{Alias, Expr, Query},
};

use super::{CrudRepository, ENTITY_ALIAS, RowMapper, RowReader, TableSpec, create_query, fetch};
use crate::domain::{PostStatus, PostStatusCriteria};
use crate::entity::post_status;
use crate::filtering::ColumnRef;

pub(crate) const POST_STATUS_COLUMNS: &[&str] = &["id", "status"];

impl RowMapper for PostStatus {
    fn map_row(row: &RowReader<'_>) -> Result<Self, DbErr> {
        Ok(PostStatus::new(row.get::<String>("status")?).with_id(row.get("id")?))
    }
}

#[async_trait::async_trait]
impl CrudRepository for PostStatus {
    type Entity = post_status::Entity;
    type Model = post_status::Model;
    type ActiveModel = post_status::ActiveModel;
    type Criteria = PostStatusCriteria;

    const ENTITY_NAME: &'static str = "postStatus";
    const TABLE: TableSpec = TableSpec {
        name: "post_status",
        alias: ENTITY_ALIAS,
        columns: POST_STATUS_COLUMNS,
    };

    fn id(&self) -> Option<i64> {
        PostStatus::id(self)
    }

    fn set_id(&mut self, id: Option<i64>) {
        PostStatus::set_id(self, id);
    }

    fn to_active_model(&self) -> post_status::ActiveModel {
        post_status::ActiveModel {
            id: PostStatus::id(self).map_or(ActiveValue::NotSet, ActiveValue::Unchanged),
            status: ActiveValue::Set(self.status.clone()),
        }
    }

    fn model_id(model: &post_status::Model) -> i64 {
        model.id
    }

    fn column_map() -> Vec<(&'static str, ColumnRef)> {
        vec![
            ("id", Self::TABLE.column("id")),
            ("status", Self::TABLE.column("status")),
        ]
    }

    fn process(row: &QueryResult) -> Result<Self, DbErr> {
        PostStatus::map_prefixed(row, ENTITY_ALIAS)
    }

    fn named_filter<'a>(
        db: &'a DatabaseConnection,
        name: &str,
    ) -> Option<BoxStream<'a, Result<Self, DbErr>>> {
        match name {
            "post-is-null" => Some(PostStatus::find_all_where_post_is_null(db)),
            _ => None,
        }
    }
}

impl PostStatus {
    /// Statuses no post refers to through `post.post_status_id`.
    pub fn find_all_where_post_is_null(
        db: &DatabaseConnection,
    ) -> BoxStream<'_, Result<PostStatus, DbErr>> {
        let referenced = Query::select()
            .column(Alias::new("post_status_id"))
            .from(Alias::new("post"))
            .and_where(Expr::col(Alias::new("post_status_id")).is_not_null())
            .to_owned();
        let condition =
            Condition::all().add(Self::TABLE.column("id").expr().not_in_subquery(referenced));
        fetch(db, &create_query::<Self>(None, condition))
    }
}
