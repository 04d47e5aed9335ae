use futures::stream::BoxStream;
use sea_orm::{ActiveValue, Condition, DatabaseConnection, DbErr, QueryResult};

use super::{CrudRepository, ENTITY_ALIAS, JoinSpec, RowMapper, RowReader, TableSpec, create_query, fetch};
use crate::domain::{Comment, CommentCriteria, Post};
use crate::entity::comment;
use crate::filtering::{ColumnRef, to_utc};

const COMMENT_COLUMNS: &[&str] = &["id", "content", "create_time", "post_id"];

const POST_JOIN: JoinSpec = JoinSpec {
    table: TableSpec {
        name: "post",
        alias: "post",
        columns: super::post::POST_COLUMNS,
    },
    local_column: "post_id",
};

impl RowMapper for Comment {
    fn map_row(row: &RowReader<'_>) -> Result<Self, DbErr> {
        let mut comment = Comment::new(row.get::<String>("content")?, row.get("create_time")?)
            .with_id(row.get("id")?);
        comment.set_post_id(row.get("post_id")?);
        Ok(comment)
    }
}

#[async_trait::async_trait]
impl CrudRepository for Comment {
    type Entity = comment::Entity;
    type Model = comment::Model;
    type ActiveModel = comment::ActiveModel;
    type Criteria = CommentCriteria;

    const ENTITY_NAME: &'static str = "comment";
    const TABLE: TableSpec = TableSpec {
        name: "comment",
        alias: ENTITY_ALIAS,
        columns: COMMENT_COLUMNS,
    };
    const JOIN: Option<JoinSpec> = Some(POST_JOIN);

    fn id(&self) -> Option<i64> {
        Comment::id(self)
    }

    fn set_id(&mut self, id: Option<i64>) {
        Comment::set_id(self, id);
    }

    fn to_active_model(&self) -> comment::ActiveModel {
        comment::ActiveModel {
            id: Comment::id(self).map_or(ActiveValue::NotSet, ActiveValue::Unchanged),
            content: ActiveValue::Set(self.content.clone()),
            create_time: ActiveValue::Set(to_utc(&self.create_time)),
            post_id: ActiveValue::Set(self.post_id()),
        }
    }

    fn model_id(model: &comment::Model) -> i64 {
        model.id
    }

    fn column_map() -> Vec<(&'static str, ColumnRef)> {
        vec![
            ("id", Self::TABLE.column("id")),
            ("content", Self::TABLE.column("content")),
            ("createTime", Self::TABLE.column("create_time")),
            ("postId", POST_JOIN.table.column("id")),
        ]
    }

    fn process(row: &QueryResult) -> Result<Self, DbErr> {
        let mut comment = Comment::map_prefixed(row, ENTITY_ALIAS)?;
        if let Some(post) = Post::map_joined(row, POST_JOIN.table.alias)? {
            comment.set_post(Some(post));
        }
        Ok(comment)
    }

    fn named_filter<'a>(
        db: &'a DatabaseConnection,
        name: &str,
    ) -> Option<BoxStream<'a, Result<Self, DbErr>>> {
        match name {
            "post-is-null" => Some(Comment::find_all_where_post_is_null(db)),
            _ => None,
        }
    }
}

impl Comment {
    /// Comments whose `post_id` is `post_id`, whether or not that post still exists.
    pub fn find_by_post(db: &DatabaseConnection, post_id: i64) -> BoxStream<'_, Result<Comment, DbErr>> {
        let condition = Condition::all().add(Self::TABLE.column("post_id").expr().eq(post_id));
        fetch(db, &create_query::<Self>(None, condition))
    }

    pub fn find_all_where_post_is_null(db: &DatabaseConnection) -> BoxStream<'_, Result<Comment, DbErr>> {
        let condition = Condition::all().add(Self::TABLE.column("post_id").expr().is_null());
        fetch(db, &create_query::<Self>(None, condition))
    }
}
