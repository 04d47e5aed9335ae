use futures::stream::BoxStream;
use sea_orm::{ActiveValue, Condition, DatabaseConnection, DbErr, QueryResult};

use super::{CrudRepository, ENTITY_ALIAS, JoinSpec, RowMapper, RowReader, TableSpec, create_query, fetch};
use crate::domain::{Post, PostCriteria, PostStatus};
use crate::entity::post;
use crate::filtering::{ColumnRef, to_utc};

pub(crate) const POST_COLUMNS: &[&str] = &[
    "id",
    "title",
    "content",
    "create_time",
    "update_time",
    "post_status_id",
];

const POST_STATUS_JOIN: JoinSpec = JoinSpec {
    table: TableSpec {
        name: "post_status",
        alias: "postStatus",
        columns: super::post_status::POST_STATUS_COLUMNS,
    },
    local_column: "post_status_id",
};

impl RowMapper for Post {
    fn map_row(row: &RowReader<'_>) -> Result<Self, DbErr> {
        let mut post = Post::new(
            row.get::<String>("title")?,
            row.get("create_time")?,
            row.get("update_time")?,
        )
        .with_id(row.get("id")?);
        post.content = row.get("content")?;
        post.set_post_status_id(row.get("post_status_id")?);
        Ok(post)
    }
}

#[async_trait::async_trait]
impl CrudRepository for Post {
    type Entity = post::Entity;
    type Model = post::Model;
    type ActiveModel = post::ActiveModel;
    type Criteria = PostCriteria;

    const ENTITY_NAME: &'static str = "post";
    const TABLE: TableSpec = TableSpec {
        name: "post",
        alias: ENTITY_ALIAS,
        columns: POST_COLUMNS,
    };
    const JOIN: Option<JoinSpec> = Some(POST_STATUS_JOIN);

    fn id(&self) -> Option<i64> {
        Post::id(self)
    }

    fn set_id(&mut self, id: Option<i64>) {
        Post::set_id(self, id);
    }

    fn to_active_model(&self) -> post::ActiveModel {
        post::ActiveModel {
            id: Post::id(self).map_or(ActiveValue::NotSet, ActiveValue::Unchanged),
            title: ActiveValue::Set(self.title.clone()),
            content: ActiveValue::Set(self.content.clone()),
            create_time: ActiveValue::Set(to_utc(&self.create_time)),
            update_time: ActiveValue::Set(to_utc(&self.update_time)),
            post_status_id: ActiveValue::Set(self.post_status_id()),
        }
    }

    fn model_id(model: &post::Model) -> i64 {
        model.id
    }

    fn column_map() -> Vec<(&'static str, ColumnRef)> {
        vec![
            ("id", Self::TABLE.column("id")),
            ("title", Self::TABLE.column("title")),
            ("content", Self::TABLE.column("content")),
            ("createTime", Self::TABLE.column("create_time")),
            ("updateTime", Self::TABLE.column("update_time")),
            ("postStatusId", POST_STATUS_JOIN.table.column("id")),
        ]
    }

    fn process(row: &QueryResult) -> Result<Self, DbErr> {
        let mut post = Post::map_prefixed(row, ENTITY_ALIAS)?;
        if let Some(status) = PostStatus::map_joined(row, POST_STATUS_JOIN.table.alias)? {
            post.set_post_status(Some(status));
        }
        Ok(post)
    }

    fn named_filter<'a>(
        db: &'a DatabaseConnection,
        name: &str,
    ) -> Option<BoxStream<'a, Result<Self, DbErr>>> {
        match name {
            "post-status-is-null" => Some(Post::find_all_where_post_status_is_null(db)),
            _ => None,
        }
    }
}

impl Post {
    /// Posts whose `post_status_id` is `status_id`.
    pub fn find_by_post_status(
        db: &DatabaseConnection,
        status_id: i64,
    ) -> BoxStream<'_, Result<Post, DbErr>> {
        let condition =
            Condition::all().add(Self::TABLE.column("post_status_id").expr().eq(status_id));
        fetch(db, &create_query::<Self>(None, condition))
    }

    pub fn find_all_where_post_status_is_null(
        db: &DatabaseConnection,
    ) -> BoxStream<'_, Result<Post, DbErr>> {
        let condition =
            Condition::all().add(Self::TABLE.column("post_status_id").expr().is_null());
        fetch(db, &create_query::<Self>(None, condition))
    }
}
